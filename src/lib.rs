//! Keeps a project's version number in sync across its files.
//!
//! A project is initialized once (`.versionFilesList.json`), after which
//! [`propagation::propagate`] rewrites every tracked file from the recorded
//! current version to a new one and saves the new version back.

pub mod arguments;
pub mod bump;
pub mod config;
pub mod discover;
pub mod init;
pub mod output;
pub mod parsers;
pub mod processor;
pub mod propagation;
pub mod report;

pub use config::{Configuration, TrackedFile};
pub use parsers::FileType;
pub use processor::{FileReport, LineEndings, PropagationError, WrongVersionFinding, WriteMode};
pub use propagation::{PropagateOptions, Summary, propagate, propagate_with};
