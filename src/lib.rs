#![warn(non_snake_case)]

pub mod config;
pub mod options;
pub mod tree;
