use anyhow::Result;
use log::debug;
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::Configuration;

pub mod normal_parser;
pub mod package_parser;

use normal_parser::NormalParser;
use package_parser::PackageParser;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown file type '{0}', expected 'normal' or 'package'")]
pub struct UnknownFileTypeError(pub String);

/// How version numbers are laid out inside a tracked file.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum FileType {
    /// Plain text: `<prefix><major>.<minor>.<patch>` anywhere on any line.
    #[default]
    Normal,
    /// Manifest with a single `"version": "<major>.<minor>.<patch>"` field.
    Package,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Normal => "normal",
            FileType::Package => "package",
        }
    }

    /// Type to assume for a file added without an explicit one.
    pub fn from_extension(file_name: &str) -> FileType {
        match file_name.rsplit_once('.') {
            Some((_, ext)) if ext.eq_ignore_ascii_case("json") => FileType::Package,
            _ => FileType::Normal,
        }
    }

    /// Every version-shaped token on `line`, left to right.
    pub fn find_versions(self, line: &str) -> Result<Vec<String>> {
        let regex = match self {
            FileType::Normal => NormalParser::version_match_regex()?,
            FileType::Package => PackageParser::version_match_regex()?,
        };
        Ok(match self {
            FileType::Normal => NormalParser::find_versions(&regex, line),
            FileType::Package => PackageParser::find_versions(&regex, line),
        })
    }

    pub fn expected_token(self, configuration: &Configuration) -> String {
        match self {
            FileType::Normal => NormalParser::expected_token(configuration),
            FileType::Package => PackageParser::expected_token(configuration),
        }
    }

    pub fn replacement_token(self, new_version: &str) -> String {
        match self {
            FileType::Normal => NormalParser::replacement_token(new_version),
            FileType::Package => PackageParser::replacement_token(new_version),
        }
    }
}

impl FromStr for FileType {
    type Err = UnknownFileTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(FileType::Normal),
            "package" => Ok(FileType::Package),
            other => Err(UnknownFileTypeError(other.to_string())),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running a replacement rule over one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// The rule does not apply to this line.
    Skipped,
    /// The rule applied. `stop` asks the caller to leave the rest of the file alone.
    Applied { line: String, stop: bool },
}

pub trait Parser {
    /// Pattern used by the analysis scan; capture group 1 is the token
    /// compared against [`Parser::expected_token`].
    fn version_match_regex() -> Result<Regex>;

    /// Literal the primary replacement searches each line for.
    fn expected_token(configuration: &Configuration) -> String;

    /// Token written into the file for `new_version`.
    fn replacement_token(new_version: &str) -> String;

    /// Rewrites `old_version` (never prefixed) to `new_version` on `line`.
    fn replace(line: &str, version_prefix: &str, old_version: &str, new_version: &str) -> Replacement;

    fn find_versions(regex: &Regex, line: &str) -> Vec<String> {
        let found: Vec<String> = regex
            .captures_iter(line)
            .filter_map(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
            .collect();
        if !found.is_empty() {
            debug!("Found version tokens {:?} in line '{}'", found, line);
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        assert_eq!("normal".parse::<FileType>().unwrap(), FileType::Normal);
        assert_eq!("package".parse::<FileType>().unwrap(), FileType::Package);
    }

    #[test]
    fn test_parse_unknown_type_fails() {
        let err = "yaml".parse::<FileType>().unwrap_err();
        assert_eq!(err, UnknownFileTypeError("yaml".to_string()));
        assert!("Package".parse::<FileType>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for file_type in [FileType::Normal, FileType::Package] {
            assert_eq!(file_type.to_string().parse::<FileType>().unwrap(), file_type);
        }
    }

    #[test]
    fn test_from_extension() {
        assert_eq!(FileType::from_extension("package.json"), FileType::Package);
        assert_eq!(FileType::from_extension("conf/App.JSON"), FileType::Package);
        assert_eq!(FileType::from_extension("README.md"), FileType::Normal);
        assert_eq!(FileType::from_extension("LICENSE"), FileType::Normal);
    }

    #[test]
    fn test_find_versions_dispatches_by_type() {
        let line = r#""version": "1.0.0", see v2.0.0"#;
        assert_eq!(FileType::Normal.find_versions(line).unwrap(), vec!["v2.0.0"]);
        assert_eq!(FileType::Package.find_versions(line).unwrap(), vec!["1.0.0"]);
    }

    #[test]
    fn test_find_versions_empty_line() {
        assert!(FileType::Normal.find_versions("").unwrap().is_empty());
        assert!(FileType::Package.find_versions("no versions here").unwrap().is_empty());
    }
}
