//! Ref classification: branch refs vs. release refs.
//!
//! A ref identifies a point in a repository's history. Branch refs carry
//! exactly one leading `~` (`~master`); anything else must be a canonical
//! semantic version (`1.2.3`, `1.0.0-beta.1`). Strings starting with `~~`
//! are reserved and rejected.

use std::cmp::Ordering;

use semver::Version;

use crate::error::{Result, ValidationError};

/// A classified ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageRef {
    /// A named branch; the stored key is `~` + name.
    Branch(String),
    /// A released version, keyed by its semver string.
    Release(Version),
}

impl PackageRef {
    /// Classify a ref string.
    pub fn parse(s: &str) -> Result<Self> {
        if let Some(branch) = s.strip_prefix('~') {
            if branch.is_empty() || branch.starts_with('~') {
                return Err(ValidationError::InvalidRef(s.to_string()));
            }
            return Ok(Self::Branch(branch.to_string()));
        }
        Version::parse(s)
            .map(Self::Release)
            .map_err(|_| ValidationError::InvalidRef(s.to_string()))
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Self::Branch(_))
    }

    /// The key under which this ref is stored: `~name` or the version string.
    pub fn as_key(&self) -> String {
        match self {
            Self::Branch(name) => format!("~{name}"),
            Self::Release(version) => version.to_string(),
        }
    }
}

/// Parse a release tag of the form `v` + semver; other tags are not releases.
pub fn release_tag(tag: &str) -> Option<Version> {
    Version::parse(tag.strip_prefix('v')?).ok()
}

/// Total ascending order over two semver strings.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering> {
    let a = Version::parse(a).map_err(|_| ValidationError::InvalidRef(a.to_string()))?;
    let b = Version::parse(b).map_err(|_| ValidationError::InvalidRef(b.to_string()))?;
    Ok(a.cmp(&b))
}
