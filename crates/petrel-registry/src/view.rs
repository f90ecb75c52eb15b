//! Read-view construction.
//!
//! The view is the JSON document served to frontends: package header
//! fields plus one entry per stored ref, releases first, then branches.
//! Each entry is the upstream description with the registry's own fields
//! injected. `url` and `downloadUrl` are duplicates kept for backward
//! compatibility.

use chrono::SecondsFormat;
use petrel_core::Package;
use petrel_vcs::Repository;
use serde_json::{json, Value};

use crate::error::Result;

pub(crate) fn package_view(
    package: &Package,
    repo: &dyn Repository,
    include_errors: bool,
) -> Result<Value> {
    let mut versions = Vec::new();
    for stored in package.all_refs() {
        let mut entry = stored.info.clone();

        let download_ref = if stored.is_branch() {
            stored.version.clone()
        } else {
            format!("v{}", stored.version)
        };
        let url = repo.get_download_url(&download_ref);

        entry["version"] = json!(stored.version);
        entry["date"] = json!(stored.date.to_rfc3339_opts(SecondsFormat::Secs, true));
        entry["url"] = json!(url);
        entry["downloadUrl"] = json!(url);
        versions.push(entry);
    }

    let mut view = json!({
        "name": package.name,
        "dateAdded": package.date_added.to_rfc3339_opts(SecondsFormat::Secs, true),
        "repository": serde_json::to_value(&package.repository)?,
        "categories": package.categories,
        "versions": versions,
    });
    if include_errors {
        view["errors"] = json!(package.errors);
    }
    Ok(view)
}
