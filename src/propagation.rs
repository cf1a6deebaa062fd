use anyhow::Result;
use log::{debug, info};
use std::path::Path;

use crate::config::Configuration;
use crate::output::plural;
use crate::processor::{FileReport, LineEndings, WriteMode, process_tracked_file};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct PropagateOptions {
    /// Scan every line for version numbers that disagree with the current one.
    pub analyze: bool,
    /// Show the offending lines, not only how many were found.
    pub verbose: bool,
    /// Rewrite what the analysis finds to the new version as well.
    pub fix: bool,
    pub line_endings: LineEndings,
    pub write_mode: WriteMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total_occurrences: usize,
    pub file_count: usize,
    pub files: Vec<FileReport>,
}

pub fn propagate(
    root: impl AsRef<Path>,
    configuration: &mut Configuration,
    new_version: &str,
    options: &PropagateOptions,
) -> Result<Summary> {
    propagate_with(root, configuration, new_version, options, |_| {})
}

/// Updates every tracked file in order, then records `new_version` as the
/// current version and saves the configuration.
///
/// `on_file` sees each report as soon as its file has been written. The first
/// failing file aborts the run: files before it keep their new contents and
/// the configuration is left untouched.
pub fn propagate_with(
    root: impl AsRef<Path>,
    configuration: &mut Configuration,
    new_version: &str,
    options: &PropagateOptions,
    mut on_file: impl FnMut(&FileReport),
) -> Result<Summary> {
    let root = root.as_ref();
    info!("Updating version {} -> {}", configuration.current_version, new_version);

    let mut files = Vec::with_capacity(configuration.files_list.len());
    for file in &configuration.files_list {
        debug!("Updating [{}] file: '{}'", file.file_type(), file.name);
        let report = process_tracked_file(root, file, configuration, new_version, options)?;
        info!(
            "processed file: {} [{}] - made {} {}",
            report.name,
            report.file_type,
            report.occurrences,
            plural(report.occurrences, "replacement", "replacements")
        );
        on_file(&report);
        files.push(report);
    }

    configuration.current_version = new_version.to_string();
    configuration.save(root)?;

    let total_occurrences = files.iter().map(|report| report.occurrences).sum();
    let file_count = files.len();
    info!(
        "updated {} version {} across {} {}",
        total_occurrences,
        plural(total_occurrences, "number", "numbers"),
        file_count,
        plural(file_count, "file", "files")
    );

    Ok(Summary { total_occurrences, file_count, files })
}
