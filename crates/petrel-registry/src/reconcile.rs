//! Per-package reconciliation of catalog state with upstream state.
//!
//! One run admits every tag and branch the repository currently reports,
//! removes stored refs that vanished upstream, and records a per-ref error
//! report on the package. A failing ref never aborts the run; a failing
//! repository aborts the run for this package only.

use std::collections::HashSet;

use petrel_core::refs::release_tag;
use petrel_vcs::{CommitInfo, Repository};
use semver::Version;
use serde_json::Value;
use tracing::{info, warn};

use crate::admission::{add_or_update_version, remove_version};
use crate::error::Result;
use crate::registry::RegistryInner;

/// Read and parse the package description at a commit.
pub(crate) fn fetch_version_info(repo: &dyn Repository, sha: &str) -> Result<Value> {
    let mut buf = Vec::new();
    repo.read_file(sha, "/package.json", &mut buf)?;
    Ok(serde_json::from_slice(&buf)?)
}

/// Release tags with their commits, ascending by version, and branches in
/// API order. Tags that are not `v` + semver are not releases and are
/// ignored.
fn fetch_refs(
    repo: &dyn Repository,
) -> petrel_vcs::Result<(Vec<(Version, CommitInfo)>, Vec<(String, CommitInfo)>)> {
    let mut tags: Vec<(Version, CommitInfo)> = repo
        .get_tags()?
        .into_iter()
        .filter_map(|(tag, commit)| release_tag(&tag).map(|version| (version, commit)))
        .collect();
    tags.sort_by(|(a, _), (b, _)| a.cmp(b));

    let branches = repo.get_branches()?;
    Ok((tags, branches))
}

/// Run one reconciliation for `name`.
pub(crate) fn reconcile_package(inner: &RegistryInner, name: &str) -> Result<()> {
    info!("Checking for new versions of {}", name);
    let mut errors: Vec<String> = Vec::new();

    // A failed load aborts the run without touching the store; the next
    // trigger or sweep retries.
    let snapshot = match inner.db.get_package(name) {
        Ok(Some(package)) => package,
        Ok(None) => {
            warn!("Skipping update of unknown package {}", name);
            return Ok(());
        }
        Err(err) => {
            warn!("Error getting package info for {}: {}", name, err);
            return Ok(());
        }
    };

    let repo = match inner.provider.open(&snapshot.repository) {
        Ok(repo) => repo,
        Err(err) => {
            errors.push(format!("Error accessing repository: {err}"));
            inner.db.set_package_errors(name, &errors)?;
            return Ok(());
        }
    };

    let mut got_all = true;
    let (tags, branches) = match fetch_refs(&*repo) {
        Ok(refs) => refs,
        Err(err) => {
            got_all = false;
            errors.push(format!("Failed to get GIT tags/branches: {err}"));
            (Vec::new(), Vec::new())
        }
    };

    // Every attempted ref is marked as existing, admitted or not, so a
    // ref that merely failed validation this run is not pruned.
    let mut existing: HashSet<String> = HashSet::new();

    for (version, commit) in &tags {
        let key = version.to_string();
        existing.insert(key.clone());
        let admitted = fetch_version_info(&*repo, &commit.sha).and_then(|info| {
            add_or_update_version(inner, name, &key, commit.date, Some(commit.sha.clone()), info)
        });
        match admitted {
            Ok(true) => info!("Added version {} of {}", key, name),
            Ok(false) => {}
            Err(err) => errors.push(format!("Version {}: {}", key, err)),
        }
    }

    for (branch, commit) in &branches {
        let key = format!("~{branch}");
        existing.insert(key.clone());
        let admitted = fetch_version_info(&*repo, &commit.sha).and_then(|info| {
            add_or_update_version(inner, name, &key, commit.date, Some(commit.sha.clone()), info)
        });
        match admitted {
            Ok(true) => info!("Added branch {} of {}", key, name),
            Ok(false) => {}
            Err(err) => errors.push(format!("Branch {}: {}", key, err)),
        }
    }

    if got_all {
        let vanished: Vec<String> = snapshot
            .all_refs()
            .filter(|stored| !existing.contains(&stored.version))
            .map(|stored| stored.version.clone())
            .collect();
        for key in vanished {
            info!("Removing version {} of {}", key, name);
            if let Err(err) = remove_version(inner, name, &key) {
                errors.push(format!("Failed to remove version {}: {}", key, err));
            }
        }
    }

    inner.db.set_package_errors(name, &errors)?;
    Ok(())
}
