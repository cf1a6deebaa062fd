//! The `.versionFilesList.json` record: project name, current version,
//! prefix and the ordered list of tracked files.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::discover;
use crate::init;
use crate::parsers::{FileType, UnknownFileTypeError};

pub const CONFIG_FILE_NAME: &str = ".versionFilesList.json";
pub const LEGACY_CONFIG_FILE_NAME: &str = "versionFilesList.json";
pub const DEFAULT_VERSION_PREFIX: &str = "v";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("This folder has not been initialized, run `version init` first")]
    NotInitialized,
    #[error(".versionFilesList.json is corrupted ({reason}), re-init the folder with `version init --force`")]
    Corrupt { reason: String },
    #[error("Project name and/or current version are missing, fill them in .versionFilesList.json")]
    Incomplete,
    #[error("There is already a .versionFilesList.json in this folder, use `version init --force` to overwrite it")]
    AlreadyInitialized,
}

/// One entry of `filesList`, stored as `"<file>"` or `"<file>:<type>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackedFile {
    pub name: String,
    /// `None` when the entry carries no explicit type.
    pub file_type: Option<FileType>,
}

impl TrackedFile {
    pub fn new(name: impl Into<String>, file_type: Option<FileType>) -> Self {
        TrackedFile { name: name.into(), file_type }
    }

    pub fn file_type(&self) -> FileType {
        self.file_type.unwrap_or_default()
    }
}

impl TryFrom<String> for TrackedFile {
    type Error = UnknownFileTypeError;

    fn try_from(entry: String) -> Result<Self, Self::Error> {
        match entry.split_once(':') {
            Some((name, file_type)) => Ok(TrackedFile::new(name, Some(file_type.parse()?))),
            None => Ok(TrackedFile::new(entry, None)),
        }
    }
}

impl From<TrackedFile> for String {
    fn from(file: TrackedFile) -> Self {
        file.to_string()
    }
}

impl fmt::Display for TrackedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.file_type {
            Some(file_type) => write!(f, "{}:{}", self.name, file_type),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub name: String,
    pub current_version: String,
    pub version_prefix: String,
    pub files_list: Vec<TrackedFile>,
}

/// Shape of the file before integrity checks; every field may be absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfiguration {
    name: Option<String>,
    current_version: Option<String>,
    version_prefix: Option<String>,
    files_list: Option<Vec<TrackedFile>>,
}

impl Configuration {
    pub fn new(name: impl Into<String>, current_version: impl Into<String>) -> Self {
        Configuration {
            name: name.into(),
            current_version: current_version.into(),
            version_prefix: DEFAULT_VERSION_PREFIX.to_string(),
            files_list: vec![],
        }
    }

    pub fn path(root: impl AsRef<Path>) -> PathBuf {
        root.as_ref().join(CONFIG_FILE_NAME)
    }

    pub fn legacy_path(root: impl AsRef<Path>) -> PathBuf {
        root.as_ref().join(LEGACY_CONFIG_FILE_NAME)
    }

    /// True when a configuration exists, migrating a legacy one first.
    pub fn is_initialized(root: impl AsRef<Path>) -> Result<bool> {
        let root = root.as_ref();
        if Self::path(root).exists() {
            return Ok(true);
        }
        if Self::legacy_path(root).exists() {
            migrate_legacy(root)?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        if !Self::is_initialized(root)? {
            return Err(ConfigError::NotInitialized.into());
        }
        let path = Self::path(root);
        debug!("Loading configuration from '{}'", path.display());
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&contents)
    }

    /// Parses and checks the integrity of a configuration document.
    pub fn from_json(contents: &str) -> Result<Self> {
        let raw: RawConfiguration = serde_json::from_str(contents)
            .map_err(|e| ConfigError::Corrupt { reason: e.to_string() })?;
        Ok(raw.validate()?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Overwrites the configuration file with this record.
    pub fn save(&self, root: impl AsRef<Path>) -> Result<()> {
        let path = Self::path(root);
        std::fs::write(&path, self.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Saved configuration to '{}'", path.display());
        Ok(())
    }

    pub fn find_file(&self, name: &str) -> Option<usize> {
        self.files_list.iter().position(|file| file.name == name)
    }
}

impl RawConfiguration {
    fn validate(self) -> Result<Configuration, ConfigError> {
        let missing = |field: &str| ConfigError::Corrupt { reason: format!("missing field `{field}`") };

        let name = self.name.ok_or_else(|| missing("name"))?;
        let current_version = self.current_version.ok_or_else(|| missing("currentVersion"))?;
        let files_list = self.files_list.ok_or_else(|| missing("filesList"))?;
        let version_prefix = self
            .version_prefix
            .filter(|prefix| !prefix.is_empty())
            .ok_or_else(|| missing("versionPrefix"))?;

        if name.is_empty() || current_version.is_empty() {
            return Err(ConfigError::Incomplete);
        }

        Ok(Configuration { name, current_version, version_prefix, files_list })
    }
}

/// Rewrites a `versionFilesList.json` from older releases as `.versionFilesList.json`.
pub fn migrate_legacy(root: impl AsRef<Path>) -> Result<Configuration> {
    let root = root.as_ref();
    let legacy_path = Configuration::legacy_path(root);
    warn!(
        "{} comes from an older release, updating it to the current format",
        legacy_path.display()
    );

    let contents = std::fs::read_to_string(&legacy_path)
        .with_context(|| format!("Failed to read {}", legacy_path.display()))?;
    let mut raw: RawConfiguration = serde_json::from_str(&contents)
        .map_err(|e| ConfigError::Corrupt { reason: e.to_string() })?;

    let needs_discovery = raw.name.as_deref().is_none_or(str::is_empty)
        || raw.current_version.as_deref().is_none_or(str::is_empty);
    if needs_discovery {
        let discovered = discover::discover_project(root)?;
        raw.name = Some(discovered.name);
        raw.current_version = Some(discovered.current_version);
    }
    if raw.version_prefix.as_deref().is_none_or(str::is_empty) {
        raw.version_prefix = Some(DEFAULT_VERSION_PREFIX.to_string());
    }

    let configuration = Configuration {
        name: raw.name.unwrap_or_default(),
        current_version: raw.current_version.unwrap_or_default(),
        version_prefix: raw.version_prefix.unwrap_or_default(),
        files_list: raw.files_list.unwrap_or_default(),
    };

    if init::replace_gitignore_entry(root, LEGACY_CONFIG_FILE_NAME, CONFIG_FILE_NAME)? {
        info!("Added {} to .gitignore", CONFIG_FILE_NAME);
    }

    configuration.save(root)?;
    std::fs::remove_file(&legacy_path)
        .with_context(|| format!("Failed to delete {}", legacy_path.display()))?;
    info!("New configuration file ({}) has been saved", CONFIG_FILE_NAME);
    Ok(configuration)
}
