use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::tree::{DEFAULT_PARALLEL_THRESHOLD, DocumentFormat};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LcaConfig {
    /// Root used when neither the command line nor the tree document names one.
    #[serde(default = "default_root")]
    pub root: u32,
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
    #[serde(default)]
    pub format: Option<DocumentFormat>,
}

impl Default for LcaConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            parallel_threshold: default_parallel_threshold(),
            format: None,
        }
    }
}

impl LcaConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

fn default_root() -> u32 {
    0
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = LcaConfig::load_from_file("does/not/exist/lca.toml").unwrap();
        assert_eq!(config, LcaConfig::default());
        assert_eq!(config.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config = LcaConfig::from_toml_str("root = 3\nformat = \"ron\"\n").unwrap();
        assert_eq!(config.root, 3);
        assert_eq!(config.format, Some(DocumentFormat::Ron));
        assert_eq!(config.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(LcaConfig::from_toml_str("parallel_threshold = \"many\"").is_err());
    }
}
