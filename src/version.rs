use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::Value;

use crate::error::{ReleaseError, Result};

/// Represents an application version with major, minor, and patch components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

/// Addresses one component of a [`Version`].
///
/// The discriminants match the positional indices accepted on the command line
/// (0: major, 1: minor, 2: patch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Major = 0,
    Minor = 1,
    Patch = 2,
}

impl Component {
    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<usize> for Component {
    type Error = ReleaseError;

    fn try_from(index: usize) -> Result<Self> {
        match index {
            0 => Ok(Component::Major),
            1 => Ok(Component::Minor),
            2 => Ok(Component::Patch),
            other => Err(ReleaseError::version(format!(
                "component index {} is out of range (expected 0, 1 or 2)",
                other
            ))),
        }
    }
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = ReleaseError;

    /// Parses a plain `major.minor.patch` string.
    ///
    /// Pre-release and build metadata suffixes are rejected since the release
    /// flow has no way to bump them. Surrounding whitespace is rejected too.
    fn from_str(s: &str) -> Result<Self> {
        let parsed = semver::Version::parse(s)
            .map_err(|e| ReleaseError::version(format!("'{}': {}", s, e)))?;

        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(ReleaseError::version(format!(
                "'{}': pre-release and build metadata are not supported",
                s
            )));
        }

        Ok(Version::new(parsed.major, parsed.minor, parsed.patch))
    }
}

/// Returns a new version with the addressed component incremented by one.
///
/// The other two components are left untouched; lower components are not
/// reset to zero.
///
/// # Errors
/// Fails when the addressed component is already `u64::MAX`.
///
/// # Example
/// ```
/// use shadow_release::version::{increase_version, Component, Version};
///
/// let v = Version::new(1, 2, 3);
/// assert_eq!(increase_version(v, Component::Major).unwrap(), Version::new(2, 2, 3));
/// assert_eq!(increase_version(v, Component::Patch).unwrap(), Version::new(1, 2, 4));
/// ```
pub fn increase_version(version: Version, component: Component) -> Result<Version> {
    let mut bumped = version;
    let (name, value) = match component {
        Component::Major => ("major", &mut bumped.major),
        Component::Minor => ("minor", &mut bumped.minor),
        Component::Patch => ("patch", &mut bumped.patch),
    };

    *value = value.checked_add(1).ok_or_else(|| {
        ReleaseError::version(format!("{} component of {} overflows", name, version))
    })?;
    Ok(bumped)
}

/// JSON config file holding the application version at `package.version`.
pub struct VersionFile {
    path: PathBuf,
}

impl VersionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        VersionFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses `package.version`.
    ///
    /// # Returns
    /// * `Ok(Version)` - The stored version
    /// * `Err` - If the file cannot be read, is not JSON, or the field is missing or malformed
    pub fn get_version(&self) -> Result<Version> {
        let document = self.read_document()?;

        let raw = document
            .get("package")
            .and_then(|package| package.get("version"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ReleaseError::version(format!(
                    "{} has no string field package.version",
                    self.path.display()
                ))
            })?;

        raw.parse()
    }

    /// Replaces `package.version` and rewrites the file.
    ///
    /// Every other field keeps its value and position; the file is re-emitted
    /// with two-space indentation.
    pub fn set_version(&self, version: Version) -> Result<()> {
        let mut document = self.read_document()?;

        let package = document
            .get_mut("package")
            .and_then(Value::as_object_mut)
            .ok_or_else(|| {
                ReleaseError::version(format!(
                    "{} has no object field package",
                    self.path.display()
                ))
            })?;
        package.insert("version".to_string(), Value::String(version.to_string()));

        let mut rendered = serde_json::to_string_pretty(&document)?;
        rendered.push('\n');
        fs::write(&self.path, rendered)?;

        tracing::debug!(path = %self.path.display(), %version, "version file rewritten");
        Ok(())
    }

    fn read_document(&self) -> Result<Value> {
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
