//! The remote-VCS capability consumed by the registry engine.

use std::io::Write;

use chrono::{DateTime, Utc};
use petrel_core::RemoteRepository;

use crate::error::{Result, VcsError};

/// Parse an RFC 3339 commit timestamp as returned by the host APIs.
pub(crate) fn parse_commit_date(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| VcsError::InvalidDate(s.to_string()))
}

/// The commit a tag or branch points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    pub date: DateTime<Utc>,
}

/// One remote repository, already resolved to a host adapter.
///
/// Listing operations perform network I/O; [`Repository::get_download_url`]
/// is pure string construction and cannot fail.
pub trait Repository: Send + Sync {
    /// All tags with the commits they point at, in API order.
    fn get_tags(&self) -> Result<Vec<(String, CommitInfo)>>;

    /// All branches with their head commits, in API order.
    fn get_branches(&self) -> Result<Vec<(String, CommitInfo)>>;

    /// Stream the bytes of `path` at commit `sha` into `sink`.
    fn read_file(&self, sha: &str, path: &str, sink: &mut dyn Write) -> Result<()>;

    /// Archive download URL for a ref.
    ///
    /// A leading `~` selects the branch-name form (`~master` downloads the
    /// `master` archive); anything else is passed through as a tag name.
    fn get_download_url(&self, ref_name: &str) -> String;
}

/// Resolves a repository descriptor to a host adapter.
pub trait RepositoryProvider: Send + Sync {
    fn open(&self, remote: &RemoteRepository) -> Result<Box<dyn Repository>>;
}
