//! Per-file update: read, rewrite matching lines, scan for wrong versions,
//! write back.
//!
//! Files are split on `\n` and joined back with `\n`. With
//! [`LineEndings::Normalize`] (the default) a trailing `\r` is dropped from
//! every line, so CRLF files come back as LF. [`LineEndings::Preserve`]
//! keeps the `\r` on each line and round-trips CRLF files byte for byte.

use anyhow::Result;
use clap::ValueEnum;
use log::debug;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{Configuration, TrackedFile};
use crate::parsers::normal_parser::NormalParser;
use crate::parsers::package_parser::PackageParser;
use crate::parsers::{FileType, Parser, Replacement};
use crate::propagation::PropagateOptions;

#[derive(Debug, Error)]
pub enum PropagationError {
    #[error("Tracked file {path:?} does not exist")]
    FileNotFound { path: PathBuf },
    #[error("Failed to read tracked file {path:?}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write tracked file {path:?}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Default)]
pub enum LineEndings {
    /// Rewrite CRLF line endings as LF.
    #[default]
    Normalize,
    /// Keep each line's original ending.
    Preserve,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Overwrite the file directly.
    #[default]
    InPlace,
    /// Write a temporary file next to the target and rename it over the target.
    /// The target's permissions carry over.
    Staged,
}

/// A line holding version-shaped tokens that differ from the expected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrongVersionFinding {
    /// 1-based.
    pub line_number: usize,
    /// The line as it was before any replacement.
    pub line_content: String,
    pub wrong_versions: Vec<String>,
    /// Tokens of `wrong_versions` the fix actually rewrote.
    pub fixed_versions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub name: String,
    pub file_type: FileType,
    pub occurrences: usize,
    pub findings: Vec<WrongVersionFinding>,
}

impl FileReport {
    pub fn wrong_version_count(&self) -> usize {
        self.findings.iter().map(|finding| finding.wrong_versions.len()).sum()
    }
}

/// Updates one tracked file, picking the rules that match its type.
pub fn process_tracked_file(
    root: &Path,
    file: &TrackedFile,
    configuration: &Configuration,
    new_version: &str,
    options: &PropagateOptions,
) -> Result<FileReport> {
    let path = root.join(&file.name);
    let file_type = file.file_type();
    let (occurrences, findings) = match file_type {
        FileType::Normal => process_file::<NormalParser>(&path, configuration, new_version, options)?,
        FileType::Package => process_file::<PackageParser>(&path, configuration, new_version, options)?,
    };
    Ok(FileReport {
        name: file.name.clone(),
        file_type,
        occurrences,
        findings,
    })
}

/// Rewrites `path` in full and returns the number of replacements made
/// along with any wrong versions found by the analysis scan.
pub fn process_file<P: Parser>(
    path: &Path,
    configuration: &Configuration,
    new_version: &str,
    options: &PropagateOptions,
) -> Result<(usize, Vec<WrongVersionFinding>)> {
    if !path.exists() {
        return Err(PropagationError::FileNotFound { path: path.to_path_buf() }.into());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| PropagationError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let (updated, occurrences, findings) = update_contents::<P>(&contents, configuration, new_version, options)?;
    write_file(path, &updated, options.write_mode)?;
    Ok((occurrences, findings))
}

/// The text half of [`process_file`].
pub fn update_contents<P: Parser>(
    contents: &str,
    configuration: &Configuration,
    new_version: &str,
    options: &PropagateOptions,
) -> Result<(String, usize, Vec<WrongVersionFinding>)> {
    let expected = P::expected_token(configuration);
    let analysis_regex = if options.analyze { Some(P::version_match_regex()?) } else { None };
    let prefix = configuration.version_prefix.as_str();

    let mut lines = split_lines(contents, options.line_endings);
    let mut occurrences = 0;
    let mut findings = vec![];

    for (index, line) in lines.iter_mut().enumerate() {
        let mut queued = vec![];

        if let Some(regex) = &analysis_regex {
            let wrong_versions: Vec<String> = P::find_versions(regex, line)
                .into_iter()
                .filter(|token| *token != expected)
                .collect();
            if !wrong_versions.is_empty() {
                if options.fix {
                    queued = wrong_versions.clone();
                }
                findings.push(WrongVersionFinding {
                    line_number: index + 1,
                    line_content: line.clone(),
                    wrong_versions,
                    fixed_versions: vec![],
                });
            }
        }

        if line.contains(&expected)
            && apply::<P>(line, prefix, &configuration.current_version, new_version, &mut occurrences).stop
        {
            break;
        }

        let mut stop = false;
        let mut fixed = vec![];
        for token in &queued {
            // analysis tokens carry a literal `v` that the rules add back themselves
            let old_version = token.strip_prefix('v').unwrap_or(token);
            let applied = apply::<P>(line, prefix, old_version, new_version, &mut occurrences);
            if applied.changed || fixed.contains(token) {
                fixed.push(token.clone());
            }
            if applied.stop {
                stop = true;
                break;
            }
        }
        if let Some(finding) = findings.last_mut().filter(|_| !queued.is_empty()) {
            finding.fixed_versions = fixed;
        }
        if stop {
            break;
        }
    }

    Ok((lines.join("\n"), occurrences, findings))
}

#[derive(Debug, Default)]
struct Applied {
    changed: bool,
    /// The rule asked to stop scanning the file.
    stop: bool,
}

/// Runs one replacement on `line`, counting it only when the text changed.
fn apply<P: Parser>(
    line: &mut String,
    prefix: &str,
    old_version: &str,
    new_version: &str,
    occurrences: &mut usize,
) -> Applied {
    match P::replace(line, prefix, old_version, new_version) {
        Replacement::Skipped => Applied::default(),
        Replacement::Applied { line: replaced, stop } => {
            let changed = replaced != *line;
            if changed {
                *occurrences += 1;
                *line = replaced;
            }
            Applied { changed, stop }
        }
    }
}

pub fn split_lines(contents: &str, line_endings: LineEndings) -> Vec<String> {
    contents
        .split('\n')
        .map(|line| match line_endings {
            LineEndings::Normalize => line.strip_suffix('\r').unwrap_or(line).to_string(),
            LineEndings::Preserve => line.to_string(),
        })
        .collect()
}

fn write_file(path: &Path, contents: &str, write_mode: WriteMode) -> Result<()> {
    let write_error = |source| PropagationError::FileWrite { path: path.to_path_buf(), source };
    match write_mode {
        WriteMode::InPlace => std::fs::write(path, contents).map_err(write_error)?,
        WriteMode::Staged => {
            let directory = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let permissions = std::fs::metadata(path).map_err(write_error)?.permissions();
            let mut staged = tempfile::NamedTempFile::new_in(directory).map_err(write_error)?;
            staged.write_all(contents.as_bytes()).map_err(write_error)?;
            staged.as_file().set_permissions(permissions).map_err(write_error)?;
            staged.persist(path).map_err(|e| write_error(e.error))?;
        }
    }
    debug!("Wrote '{}' ({:?})", path.display(), write_mode);
    Ok(())
}
