//! Folder initialization and edits to the tracked files list.

use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;

use crate::config::{CONFIG_FILE_NAME, ConfigError, Configuration, TrackedFile};
use crate::discover::discover_project;
use crate::parsers::FileType;

/// Files picked up automatically when a folder is initialized.
pub const STANDARD_FILES_LIST: [&str; 6] = [
    "package.json",
    "bower.json",
    "package.js",
    "README.md",
    "index.html",
    "composer.json",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitOptions {
    /// Throw away an existing configuration and start over.
    pub force: bool,
    pub prefix: Option<String>,
    /// Entries of the form `file` or `file:type`.
    pub add: Vec<String>,
    pub remove: Vec<String>,
    pub name: Option<String>,
    pub current_version: Option<String>,
}

impl InitOptions {
    fn has_edits(&self) -> bool {
        self.prefix.is_some()
            || !self.add.is_empty()
            || !self.remove.is_empty()
            || self.name.is_some()
            || self.current_version.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Initialized(Configuration),
    Updated(Configuration),
    Unchanged,
}

/// `version init`: initializes, re-initializes or edits depending on the
/// folder's state and the options given.
pub fn run_init(root: impl AsRef<Path>, options: &InitOptions) -> Result<InitOutcome> {
    let root = root.as_ref();
    if !Configuration::is_initialized(root)? {
        return Ok(InitOutcome::Initialized(initialize(root, options)?));
    }
    if options.force {
        return Ok(InitOutcome::Initialized(reinitialize(root, options)?));
    }
    if !options.has_edits() {
        return Err(ConfigError::AlreadyInitialized.into());
    }
    Ok(match update_files_list(root, options)? {
        Some(configuration) => InitOutcome::Updated(configuration),
        None => InitOutcome::Unchanged,
    })
}

pub fn initialize(root: impl AsRef<Path>, options: &InitOptions) -> Result<Configuration> {
    let root = root.as_ref();
    info!("Initializing folder with version info...");

    let mut files_list = vec![];
    for file in STANDARD_FILES_LIST {
        if root.join(file).exists() {
            let file_type = (file.ends_with(".json") || file == "package.js").then_some(FileType::Package);
            files_list.push(TrackedFile::new(file, file_type));
            info!("file {} added to list", file);
        }
    }

    for entry in &options.add {
        let file = match TrackedFile::try_from(entry.clone()) {
            Ok(file) => file,
            Err(e) => {
                warn!("{} -> file {} skipped", e, entry);
                continue;
            }
        };
        if !root.join(&file.name).exists() {
            warn!("file {} does not exist -> discarded", file.name);
        } else if files_list.iter().any(|tracked| tracked.name == file.name) {
            warn!("file {} is already in list -> discarded", file.name);
        } else {
            info!("file {} added to list", file.name);
            files_list.push(file);
        }
    }

    if files_list.is_empty() {
        warn!("The file list is empty, please fill it manually in {}", CONFIG_FILE_NAME);
    } else {
        info!("{} files added to list", files_list.len());
    }

    let (name, current_version) = match (&options.name, &options.current_version) {
        (Some(name), Some(current_version)) => (name.clone(), current_version.clone()),
        (name, current_version) => {
            let discovered = discover_project(root)?;
            if current_version.is_none() {
                info!("auto-discovered current version: {}", discovered.current_version);
            }
            (
                name.clone().unwrap_or(discovered.name),
                current_version.clone().unwrap_or(discovered.current_version),
            )
        }
    };

    let mut configuration = Configuration::new(name, current_version);
    if let Some(prefix) = &options.prefix {
        configuration.version_prefix = prefix.clone();
    }
    configuration.files_list = files_list;
    configuration.save(root)?;
    info!("{} created", CONFIG_FILE_NAME);

    if ensure_gitignore_entry(root, CONFIG_FILE_NAME)? {
        info!("Added {} to .gitignore", CONFIG_FILE_NAME);
    }

    info!("folder initialized");
    Ok(configuration)
}

pub fn reinitialize(root: impl AsRef<Path>, options: &InitOptions) -> Result<Configuration> {
    let root = root.as_ref();
    let path = Configuration::path(root);
    std::fs::remove_file(&path).with_context(|| format!("Failed to delete {}", path.display()))?;
    info!("Deleted previous {}", CONFIG_FILE_NAME);
    initialize(root, options)
}

/// Applies prefix/name/version changes and list additions/removals.
/// Returns the saved configuration, or `None` when nothing changed.
pub fn update_files_list(root: impl AsRef<Path>, options: &InitOptions) -> Result<Option<Configuration>> {
    let root = root.as_ref();
    let mut configuration = Configuration::load(root)?;
    let mut modified = false;

    if let Some(prefix) = &options.prefix {
        configuration.version_prefix = prefix.clone();
        modified = true;
        info!("new custom version prefix: {}", prefix);
    }
    if let Some(name) = &options.name {
        configuration.name = name.clone();
        modified = true;
        info!("new project name: {}", name);
    }
    if let Some(current_version) = &options.current_version {
        configuration.current_version = current_version.clone();
        modified = true;
        info!("new project currentVersion: {}", current_version);
    }

    for entry in &options.add {
        modified |= add_file(root, &mut configuration, entry);
    }

    for name in &options.remove {
        match configuration.find_file(name) {
            Some(index) => {
                configuration.files_list.remove(index);
                modified = true;
                info!("file {} removed from list", name);
            }
            None => warn!("file {} is not in list -> nothing to remove", name),
        }
    }

    if !modified {
        return Ok(None);
    }
    configuration.save(root)?;
    info!("{} updated", CONFIG_FILE_NAME);
    Ok(Some(configuration))
}

fn add_file(root: &Path, configuration: &mut Configuration, entry: &str) -> bool {
    let file = match entry.split_once(':') {
        Some((name, file_type)) => match file_type.parse::<FileType>() {
            Ok(file_type) => TrackedFile::new(name, Some(file_type)),
            Err(e) => {
                warn!("{} -> file {} skipped", e, name);
                return false;
            }
        },
        None => {
            let detected = FileType::from_extension(entry);
            TrackedFile::new(entry, (detected != FileType::Normal).then_some(detected))
        }
    };

    if !root.join(&file.name).exists() {
        warn!("file {} does not exist -> discarded", file.name);
        return false;
    }

    match configuration.find_file(&file.name) {
        None => {
            info!("file {} added to list, type of file: {}", file.name, file.file_type());
            configuration.files_list.push(file);
            true
        }
        Some(index) if configuration.files_list[index].file_type() != file.file_type() => {
            info!(
                "file {} is already in list but the type has been changed to: {}",
                file.name,
                file.file_type()
            );
            configuration.files_list[index] = file;
            true
        }
        Some(_) => {
            warn!("file {} is already in {} with same type -> discarded", file.name, CONFIG_FILE_NAME);
            false
        }
    }
}

/// Appends `entry` to `.gitignore` if the file exists and lacks it.
pub fn ensure_gitignore_entry(root: impl AsRef<Path>, entry: &str) -> Result<bool> {
    edit_gitignore(root.as_ref(), |lines| {
        if lines.iter().any(|line| line == entry) {
            return false;
        }
        // keep a trailing newline trailing
        let at = if lines.last().is_some_and(String::is_empty) { lines.len() - 1 } else { lines.len() };
        lines.insert(at, entry.to_string());
        true
    })
}

/// Swaps `old` for `new` in `.gitignore` if the file lists `old`.
pub fn replace_gitignore_entry(root: impl AsRef<Path>, old: &str, new: &str) -> Result<bool> {
    edit_gitignore(root.as_ref(), |lines| {
        let Some(index) = lines.iter().position(|line| line == old) else {
            return false;
        };
        lines[index] = new.to_string();
        true
    })
}

fn edit_gitignore(root: &Path, edit: impl FnOnce(&mut Vec<String>) -> bool) -> Result<bool> {
    let path = root.join(".gitignore");
    if !path.exists() {
        return Ok(false);
    }
    let contents = std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut lines: Vec<String> = contents.split('\n').map(str::to_string).collect();
    if !edit(&mut lines) {
        return Ok(false);
    }
    std::fs::write(&path, lines.join("\n")).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}
