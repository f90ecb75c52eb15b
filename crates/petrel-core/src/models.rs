//! Catalog documents.
//!
//! These types mirror what the document store persists: one [`Package`]
//! per catalog entry, embedding one [`PackageVersion`] per released
//! version or tracked branch. The upstream package description travels as
//! a raw JSON document in [`PackageVersion::info`].

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};

/// Identifies the remote repository a package is hosted in.
///
/// Serialized as a tagged document, e.g.
/// `{"kind": "github", "owner": "widgets", "project": "frobnicate"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RemoteRepository {
    Github { owner: String, project: String },
    Gitlab { owner: String, project: String },
}

/// One released version or branch snapshot of a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageVersion {
    /// Semver string for releases, `~` + branch name for branches.
    pub version: String,

    /// Commit timestamp of the ref at fetch time.
    pub date: DateTime<Utc>,

    /// Commit identifier at fetch time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,

    /// The upstream package description, with a normalized lowercase
    /// `name` field.
    pub info: serde_json::Value,
}

impl PackageVersion {
    pub fn is_branch(&self) -> bool {
        self.version.starts_with('~')
    }

    /// The `description` field of the upstream document, if any.
    pub fn description(&self) -> Option<&str> {
        self.info.get("description").and_then(|v| v.as_str())
    }
}

/// A catalog entry: the unit of ownership, search, and admission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    /// Lowercased, unique across the catalog.
    pub name: String,

    /// Opaque user identifier supplied by the caller.
    pub owner: String,

    pub repository: RemoteRepository,

    #[serde(default)]
    pub categories: Vec<String>,

    /// Released versions, keyed by semver string.
    #[serde(default)]
    pub versions: Vec<PackageVersion>,

    /// Branch snapshots, keyed by `~` + branch name.
    #[serde(default)]
    pub branches: Vec<PackageVersion>,

    /// Report of the most recent reconciliation.
    #[serde(default)]
    pub errors: Vec<String>,

    pub date_added: DateTime<Utc>,
}

impl Package {
    pub fn new(name: String, owner: String, repository: RemoteRepository) -> Self {
        Self {
            name,
            owner,
            repository,
            categories: Vec::new(),
            versions: Vec::new(),
            branches: Vec::new(),
            errors: Vec::new(),
            date_added: Utc::now(),
        }
    }

    /// All stored refs, releases first, then branches.
    pub fn all_refs(&self) -> impl Iterator<Item = &PackageVersion> {
        self.versions.iter().chain(self.branches.iter())
    }

    /// Look up a stored ref by its key (`1.2.3` or `~master`).
    pub fn get_ref(&self, key: &str) -> Option<&PackageVersion> {
        self.all_refs().find(|v| v.version == key)
    }

    /// The best ref to represent this package: the highest release, or the
    /// first branch when nothing has been released yet.
    pub fn latest(&self) -> Option<&PackageVersion> {
        self.versions
            .iter()
            .filter_map(|v| Version::parse(&v.version).ok().map(|parsed| (parsed, v)))
            .max_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, v)| v)
            .or_else(|| self.branches.first())
    }

    pub fn summary(&self) -> PackageSummary {
        let latest = self.latest();
        PackageSummary {
            name: self.name.clone(),
            description: latest
                .and_then(|v| v.description())
                .map(|s| s.to_string()),
            version: latest.map(|v| v.version.clone()),
            date_added: self.date_added,
        }
    }
}

/// Condensed package record returned by search and user listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSummary {
    pub name: String,
    pub description: Option<String>,
    /// Highest released version, or the first branch key.
    pub version: Option<String>,
    pub date_added: DateTime<Utc>,
}
