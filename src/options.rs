//! Parsing Options.
//! `--input {file}` or `-i`, plus any number of `--query u,v` pairs.

use clap::{Arg, ArgAction, Command};
use std::error::Error;

use crate::tree::DocumentFormat;

fn make_options_parser() -> clap::Command {
    let parser = Command::new("lca")
        .no_binary_name(true)
        .args_override_self(true)
        .version("v0.1.0")
        .about("Answers lowest common ancestor queries over a rooted tree")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .help("Tree document (.json or .ron)"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .help("Document format, overrides the file extension")
                .value_parser(["json", "ron"]),
        )
        .arg(
            Arg::new("root")
                .short('r')
                .long("root")
                .value_name("NODE")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new("query")
                .short('q')
                .long("query")
                .value_name("U,V")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("queries")
                .long("queries")
                .value_name("FILE")
                .help("Query batch document"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Path to file where answers will be stored as JSON"),
        )
        .arg(Arg::new("dot").long("dot").value_name("FILE"))
        .arg(
            Arg::new("tour")
                .long("tour")
                .value_name("FILE")
                .help("Dump the Euler tour, depths and first occurrences as JSON"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .default_value("lca.toml"),
        );
    parser
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub input: Option<String>,
    pub format: Option<DocumentFormat>,
    pub root: Option<u32>,
    pub queries: Vec<(u32, u32)>,
    pub queries_file: Option<String>,
    pub output: Option<String>,
    pub dot: Option<String>,
    pub tour: Option<String>,
    pub config: String,
}

impl Options {
    pub fn parse_from_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let flags = shellwords::split(s)?;
        Self::parse_from_args(&flags)
    }

    pub fn parse_from_args(flags: &[String]) -> Result<Self, Box<dyn Error>> {
        let app = make_options_parser();
        let matches = app.try_get_matches_from(flags.iter())?;

        let format = match matches.get_one::<String>("format") {
            Some(format) => Some(format.parse::<DocumentFormat>()?),
            None => None,
        };
        let queries = matches
            .get_many::<String>("query")
            .into_iter()
            .flatten()
            .map(|pair| parse_pair(pair))
            .collect::<Result<Vec<_>, _>>()?;
        let owned = |name: &str| matches.get_one::<String>(name).cloned();

        Ok(Options {
            input: owned("input"),
            format,
            root: matches.get_one::<u32>("root").copied(),
            queries,
            queries_file: owned("queries"),
            output: owned("output"),
            dot: owned("dot"),
            tour: owned("tour"),
            config: owned("config").unwrap_or_default(),
        })
    }
}

fn parse_pair(pair: &str) -> Result<(u32, u32), Box<dyn Error>> {
    let (u, v) = pair
        .split_once(',')
        .ok_or_else(|| format!("query `{pair}` is not of the form U,V"))?;
    Ok((u.trim().parse()?, v.trim().parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_from_str() {
        let options = Options::parse_from_str(
            "-i 'trees/my tree.ron' -r 2 -q 3,4 --query '5, 6' --dot out.dot --tour tour.json",
        )
        .unwrap();
        assert_eq!(options.input.as_deref(), Some("trees/my tree.ron"));
        assert_eq!(options.root, Some(2));
        assert_eq!(options.queries, vec![(3, 4), (5, 6)]);
        assert_eq!(options.dot.as_deref(), Some("out.dot"));
        assert_eq!(options.tour.as_deref(), Some("tour.json"));
        assert_eq!(options.config, "lca.toml");
        assert_eq!(options.format, None);
    }

    #[test]
    fn test_later_flags_override_earlier_ones() {
        let options = Options::parse_from_str("-r 1 -f json -r 4 -f ron").unwrap();
        assert_eq!(options.root, Some(4));
        assert_eq!(options.format, Some(DocumentFormat::Ron));
    }

    #[test]
    fn test_parse_from_str_err() {
        assert!(Options::parse_from_str("-q 3-4").is_err());
        assert!(Options::parse_from_str("-q 3,x").is_err());
        assert!(Options::parse_from_str("-f yaml").is_err());
        assert!(Options::parse_from_str("-r -1").is_err());
    }

    #[test]
    fn test_parse_from_args_err() {
        let options = Options::parse_from_args(&["--unknown".to_owned()]);
        assert!(options.is_err());
    }
}
