//! Rendering of the analysis scan results for one file.

use owo_colors::OwoColorize;

use crate::output::{SPACER, plural};
use crate::processor::{FileReport, WrongVersionFinding};
use crate::propagation::PropagateOptions;

/// How wrong tokens (and their replacements) stand out in verbose output.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Highlight {
    /// `[-0.9.9-]` for a wrong token, `{+1.0.0+}` for what replaced it.
    #[default]
    Plain,
    /// White on red for a wrong token, white on green for its replacement.
    Ansi,
}

/// Lines to show for `report`, empty when nothing wrong was found.
///
/// Verbose output lists every offending line before the per-file count.
pub fn render_findings(
    report: &FileReport,
    options: &PropagateOptions,
    new_version: &str,
    highlight: Highlight,
) -> Vec<String> {
    let wrong_versions = report.wrong_version_count();
    if wrong_versions == 0 {
        return vec![];
    }

    let replacement = options
        .fix
        .then(|| report.file_type.replacement_token(new_version));

    let mut lines = vec![];
    if options.verbose {
        for finding in &report.findings {
            let content = mark_tokens(
                finding.line_content.trim_end_matches('\r'),
                finding,
                replacement.as_deref(),
                highlight,
            );
            lines.push(format!("{SPACER}[Line: {}]   {}", finding.line_number, content));
        }
    }

    let verb = if options.fix { "fixed" } else { "found" };
    lines.push(format!(
        "{SPACER}{verb} {wrong_versions} wrong version {} in this file",
        plural(wrong_versions, "number", "numbers")
    ));
    lines
}

/// Marks each token at its next occurrence after the previous one. Only
/// tokens the fix rewrote are followed by `replacement`.
fn mark_tokens(
    line: &str,
    finding: &WrongVersionFinding,
    replacement: Option<&str>,
    highlight: Highlight,
) -> String {
    let mut rendered = String::with_capacity(line.len());
    let mut cursor = 0;
    for token in &finding.wrong_versions {
        let Some(offset) = line[cursor..].find(token.as_str()) else {
            continue;
        };
        let start = cursor + offset;
        let replacement = replacement.filter(|_| finding.fixed_versions.contains(token));
        rendered.push_str(&line[cursor..start]);
        rendered.push_str(&mark(token, replacement, highlight));
        cursor = start + token.len();
    }
    rendered.push_str(&line[cursor..]);
    rendered
}

fn mark(token: &str, replacement: Option<&str>, highlight: Highlight) -> String {
    match highlight {
        Highlight::Plain => match replacement {
            Some(replacement) => format!("[-{token}-]{{+{replacement}+}}"),
            None => format!("[-{token}-]"),
        },
        Highlight::Ansi => {
            let wrong = token.white().bold().on_red().to_string();
            match replacement {
                Some(replacement) => format!("{wrong}{}", replacement.white().bold().on_green()),
                None => wrong,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::FileType;

    fn report(file_type: FileType, findings: Vec<WrongVersionFinding>) -> FileReport {
        FileReport { name: "README.md".to_string(), file_type, occurrences: 0, findings }
    }

    fn finding(line_number: usize, content: &str, wrong: &[&str]) -> WrongVersionFinding {
        WrongVersionFinding {
            line_number,
            line_content: content.to_string(),
            wrong_versions: wrong.iter().map(|s| s.to_string()).collect(),
            fixed_versions: vec![],
        }
    }

    fn fixed(mut finding: WrongVersionFinding) -> WrongVersionFinding {
        finding.fixed_versions = finding.wrong_versions.clone();
        finding
    }

    fn options(verbose: bool, fix: bool) -> PropagateOptions {
        PropagateOptions { analyze: true, verbose, fix, ..PropagateOptions::default() }
    }

    #[test]
    fn test_no_findings_renders_nothing() {
        let report = report(FileType::Normal, vec![]);
        assert!(render_findings(&report, &options(true, true), "1.0.0", Highlight::Plain).is_empty());
    }

    #[test]
    fn test_count_only_when_not_verbose() {
        let report = report(FileType::Normal, vec![finding(3, "v0.9.9 legacy", &["v0.9.9"])]);
        let lines = render_findings(&report, &options(false, false), "1.0.0", Highlight::Plain);
        assert_eq!(lines, vec![format!("{SPACER}found 1 wrong version number in this file")]);
    }

    #[test]
    fn test_fix_changes_wording() {
        let report = report(
            FileType::Normal,
            vec![finding(1, "v0.1.0", &["v0.1.0"]), finding(2, "v0.2.0 v0.3.0", &["v0.2.0", "v0.3.0"])],
        );
        let lines = render_findings(&report, &options(false, true), "1.0.0", Highlight::Plain);
        assert_eq!(lines, vec![format!("{SPACER}fixed 3 wrong version numbers in this file")]);
    }

    #[test]
    fn test_verbose_marks_wrong_tokens() {
        let report = report(FileType::Normal, vec![finding(7, "from v0.9.9 to v0.9.9", &["v0.9.9", "v0.9.9"])]);
        let lines = render_findings(&report, &options(true, false), "1.0.0", Highlight::Plain);
        assert_eq!(lines[0], format!("{SPACER}[Line: 7]   from [-v0.9.9-] to [-v0.9.9-]"));
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_verbose_fix_shows_replacement() {
        let report = report(FileType::Normal, vec![fixed(finding(1, "v0.9.9 legacy", &["v0.9.9"]))]);
        let lines = render_findings(&report, &options(true, true), "1.0.0", Highlight::Plain);
        assert_eq!(lines[0], format!("{SPACER}[Line: 1]   [-v0.9.9-]{{+v1.0.0+}} legacy"));
    }

    #[test]
    fn test_verbose_fix_skips_marker_for_untouched_tokens() {
        let mut partly_fixed = finding(4, "v0.9.9 and v0.8.0", &["v0.9.9", "v0.8.0"]);
        partly_fixed.fixed_versions = vec!["v0.8.0".to_string()];
        let report = report(FileType::Normal, vec![partly_fixed, finding(9, "old v0.7.0", &["v0.7.0"])]);
        let lines = render_findings(&report, &options(true, true), "1.0.0", Highlight::Plain);
        assert_eq!(lines[0], format!("{SPACER}[Line: 4]   [-v0.9.9-] and [-v0.8.0-]{{+v1.0.0+}}"));
        assert_eq!(lines[1], format!("{SPACER}[Line: 9]   old [-v0.7.0-]"));
    }

    #[test]
    fn test_package_replacement_has_no_prefix() {
        let report = report(FileType::Package, vec![fixed(finding(2, r#"  "version": "0.9.9","#, &["0.9.9"]))]);
        let lines = render_findings(&report, &options(true, true), "1.0.0", Highlight::Plain);
        assert_eq!(lines[0], format!(r#"{SPACER}[Line: 2]     "version": "[-0.9.9-]{{+1.0.0+}}","#));
    }

    #[test]
    fn test_ansi_highlight_keeps_text() {
        let report = report(FileType::Normal, vec![finding(1, "v0.9.9 legacy", &["v0.9.9"])]);
        let lines = render_findings(&report, &options(true, false), "1.0.0", Highlight::Ansi);
        assert!(lines[0].contains("v0.9.9"));
        assert!(lines[0].contains("\u{1b}["));
        assert!(lines[0].ends_with(" legacy"));
    }
}
