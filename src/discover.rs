use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Manifests consulted for the project name and version, in priority order.
pub const POSSIBLE_PACKAGE_FILES: [&str; 3] = ["package.json", "bower.json", "package.js"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredProject {
    pub name: String,
    pub current_version: String,
}

#[derive(Debug, Default, Deserialize)]
struct ManifestFields {
    name: Option<String>,
    version: Option<String>,
}

pub fn find_package_file(root: impl AsRef<Path>) -> Option<PathBuf> {
    let root = root.as_ref();
    POSSIBLE_PACKAGE_FILES
        .iter()
        .map(|file| root.join(file))
        .find(|path| path.exists())
}

/// Best-effort name/version lookup. Whatever cannot be found is left empty.
pub fn discover_project(root: impl AsRef<Path>) -> Result<DiscoveredProject> {
    let Some(package_file) = find_package_file(root) else {
        warn!("Can't discover package name and/or current version automatically");
        warn!("Please fill .versionFilesList.json with the missing information");
        return Ok(DiscoveredProject::default());
    };

    let contents = std::fs::read_to_string(&package_file)
        .with_context(|| format!("Failed to read {}", package_file.display()))?;
    let fields = if package_file.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str::<ManifestFields>(&contents)
            .with_context(|| format!("Failed to parse {}", package_file.display()))?
    } else {
        sniff_js_manifest(&contents)
    };

    debug!(
        "Discovered package name: {:?} - discovered package version: {:?}",
        fields.name, fields.version
    );

    let name = fields.name.unwrap_or_else(|| {
        warn!("Can't discover package name automatically");
        String::new()
    });
    let current_version = fields.version.unwrap_or_else(|| {
        warn!("Can't discover package's current version automatically");
        String::new()
    });
    Ok(DiscoveredProject { name, current_version })
}

/// Reads `name: 'x',` / `version: '1.0.0',` pairs out of a `package.js`.
fn sniff_js_manifest(contents: &str) -> ManifestFields {
    let mut fields = ManifestFields::default();
    for line in contents.lines() {
        if fields.name.is_none() && line.contains("name:") {
            fields.name = last_word(line);
        }
        if fields.version.is_none() && line.contains("version:") {
            fields.version = last_word(line);
        }
        if fields.name.is_some() && fields.version.is_some() {
            break;
        }
    }
    fields
}

fn last_word(line: &str) -> Option<String> {
    let word: String = line
        .split(' ')
        .next_back()?
        .chars()
        .filter(|c| !matches!(c, '\'' | ','))
        .collect();
    (!word.is_empty()).then_some(word)
}
