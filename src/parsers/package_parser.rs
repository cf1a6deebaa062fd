use crate::config::Configuration;
use crate::parsers::{Parser, Replacement};
use regex::Regex;

pub struct PackageParser;

impl Parser for PackageParser {
    fn version_match_regex() -> anyhow::Result<Regex> {
        Ok(Regex::new(r#""version": "([0-9]+\.[0-9]+\.[0-9]+)""#)?)
    }

    fn expected_token(configuration: &Configuration) -> String {
        configuration.current_version.clone()
    }

    fn replacement_token(new_version: &str) -> String {
        new_version.to_string()
    }

    /// Only a line naming `version` is touched, and only its first match.
    /// That covers `"version": "x"` in JSON manifests as well as
    /// `version: 'x',` in a `package.js`. Applying always asks the caller to
    /// stop: a manifest declares its version once, and later numeric fields
    /// must not be rewritten.
    fn replace(line: &str, _version_prefix: &str, old_version: &str, new_version: &str) -> Replacement {
        if !line.contains("version") {
            return Replacement::Skipped;
        }
        Replacement::Applied {
            line: line.replacen(old_version, new_version, 1),
            stop: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regex() -> Regex {
        PackageParser::version_match_regex().unwrap()
    }

    #[test]
    fn test_version_regex_extracts_bare_version() {
        let regex = regex();
        let found = PackageParser::find_versions(&regex, r#"  "version": "1.2.3","#);
        assert_eq!(found, vec!["1.2.3"]);
    }

    #[test]
    fn test_version_regex_requires_exact_spacing() {
        let regex = regex();
        assert!(PackageParser::find_versions(&regex, r#""version":"1.2.3""#).is_empty());
        assert!(PackageParser::find_versions(&regex, r#""version" : "1.2.3""#).is_empty());
    }

    #[test]
    fn test_version_regex_ignores_other_fields() {
        let regex = regex();
        assert!(PackageParser::find_versions(&regex, r#""other": "2.0.0""#).is_empty());
    }

    #[test]
    fn test_expected_token_has_no_prefix() {
        let configuration = Configuration::new("demo", "2.0.0");
        assert_eq!(PackageParser::expected_token(&configuration), "2.0.0");
    }

    #[test]
    fn test_replace_version_line_and_stop() {
        let replaced = PackageParser::replace(r#"  "version": "2.0.0","#, "v", "2.0.0", "2.0.1");
        assert_eq!(
            replaced,
            Replacement::Applied { line: r#"  "version": "2.0.1","#.to_string(), stop: true }
        );
    }

    #[test]
    fn test_replace_only_first_occurrence() {
        let replaced = PackageParser::replace(r#""version": "1.0.0", "was": "1.0.0""#, "v", "1.0.0", "1.1.0");
        assert_eq!(
            replaced,
            Replacement::Applied {
                line: r#""version": "1.1.0", "was": "1.0.0""#.to_string(),
                stop: true
            }
        );
    }

    #[test]
    fn test_replace_skips_lines_without_version_field() {
        assert_eq!(
            PackageParser::replace(r#"  "other": "2.0.0""#, "v", "2.0.0", "2.0.1"),
            Replacement::Skipped
        );
    }

    #[test]
    fn test_replace_js_manifest_version_field() {
        let replaced = PackageParser::replace("  version: '0.4.2',", "v", "0.4.2", "0.5.0");
        assert_eq!(
            replaced,
            Replacement::Applied { line: "  version: '0.5.0',".to_string(), stop: true }
        );
    }
}
