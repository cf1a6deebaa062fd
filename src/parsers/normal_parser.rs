use crate::config::Configuration;
use crate::parsers::{Parser, Replacement};
use regex::Regex;

pub struct NormalParser;

impl Parser for NormalParser {
    // Always a literal `v`, whatever prefix the configuration carries.
    fn version_match_regex() -> anyhow::Result<Regex> {
        Ok(Regex::new(r"(v[0-9]+\.[0-9]+\.[0-9]+)")?)
    }

    fn expected_token(configuration: &Configuration) -> String {
        format!("{}{}", configuration.version_prefix, configuration.current_version)
    }

    fn replacement_token(new_version: &str) -> String {
        format!("v{new_version}")
    }

    fn replace(line: &str, version_prefix: &str, old_version: &str, new_version: &str) -> Replacement {
        let needle = format!("{version_prefix}{old_version}");
        if !line.contains(&needle) {
            return Replacement::Skipped;
        }
        Replacement::Applied {
            line: line.replace(&needle, &Self::replacement_token(new_version)),
            stop: false,
        }
    }
}
