use anyhow::Result;
use log::debug;
use semver::Version;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionInputError {
    #[error("You must specify a new version or an auto-increment option (-M, -m or -p)")]
    Missing,
    #[error("The new version can't be empty")]
    Empty,
    #[error("Current version '{version}' is not MAJOR.MINOR.PATCH and can't be incremented")]
    Malformed { version: String },
    #[error("Incrementing '{version}' overflows a version component")]
    Overflow { version: String },
}

/// How much to add to each component. `None` leaves it alone.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Increment {
    pub major: Option<u64>,
    pub minor: Option<u64>,
    pub patch: Option<u64>,
}

impl Increment {
    pub fn is_empty(&self) -> bool {
        self.major.is_none() && self.minor.is_none() && self.patch.is_none()
    }
}

/// Picks the version to propagate: an explicit one wins over increments.
/// Explicit versions are taken verbatim.
pub fn resolve_new_version(explicit: Option<&str>, current: &str, increment: &Increment) -> Result<String> {
    match explicit {
        Some("") => Err(VersionInputError::Empty.into()),
        Some(version) => Ok(version.to_string()),
        None if increment.is_empty() => Err(VersionInputError::Missing.into()),
        None => increment_version(current, increment),
    }
}

/// Applies major, then minor, then patch. Bumping a component zeroes the
/// ones below it.
pub fn increment_version(current: &str, increment: &Increment) -> Result<String> {
    let mut version = parse_release(current)?;
    let bump = |component: u64, by: u64| {
        component
            .checked_add(by)
            .ok_or_else(|| VersionInputError::Overflow { version: current.to_string() })
    };
    if let Some(major) = increment.major {
        version.major = bump(version.major, major)?;
        version.minor = 0;
        version.patch = 0;
    }
    if let Some(minor) = increment.minor {
        version.minor = bump(version.minor, minor)?;
        version.patch = 0;
    }
    if let Some(patch) = increment.patch {
        version.patch = bump(version.patch, patch)?;
    }
    debug!("Incrementing version from {} -> {}", current, version);
    Ok(version.to_string())
}

/// Only plain `MAJOR.MINOR.PATCH`; pre-release and build metadata are rejected.
fn parse_release(version: &str) -> Result<Version, VersionInputError> {
    let malformed = || VersionInputError::Malformed { version: version.to_string() };
    let parsed = Version::parse(version).map_err(|_| malformed())?;
    if !parsed.pre.is_empty() || !parsed.build.is_empty() {
        return Err(malformed());
    }
    Ok(parsed)
}
