//! GitLab adapter.
//!
//! Unlike GitHub, the ref listing endpoints return the commit date inline,
//! so no per-ref commit lookup is needed. Project paths are addressed as
//! `owner%2Fproject` per the GitLab API convention.

use std::env;
use std::io::Write;

use serde::Deserialize;
use ureq::{http::Response, Body};
use url::Url;

use crate::error::{Result, VcsError};
use crate::http_client::SHARED_AGENT;
use crate::traits::{parse_commit_date, CommitInfo, Repository};

const API_ROOT: &str = "https://gitlab.com/api/v4";
const TOKEN_ENV: &str = "GITLAB_TOKEN";

pub struct GitlabRepository {
    owner: String,
    project: String,
}

#[derive(Debug, Deserialize)]
struct RefEntry {
    name: String,
    commit: GitlabCommit,
}

#[derive(Debug, Deserialize)]
struct GitlabCommit {
    id: String,
    committed_date: String,
}

impl GitlabRepository {
    pub fn new(owner: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            project: project.into(),
        }
    }

    fn project_path(&self) -> String {
        format!("{}%2F{}", self.owner, self.project)
    }

    fn api_get_raw(&self, path: &str) -> Result<Response<Body>> {
        let url = format!("{API_ROOT}{path}");
        let url = Url::parse(&url).map_err(|source| VcsError::InvalidUrl { url, source })?;

        let mut req = SHARED_AGENT.get(url.as_str());
        if let Ok(token) = env::var(TOKEN_ENV) {
            req = req.header("PRIVATE-TOKEN", &token);
        }

        let resp = req.call()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(VcsError::HttpError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp)
    }

    fn list_refs(&self, endpoint: &str) -> Result<Vec<(String, CommitInfo)>> {
        let mut resp = self.api_get_raw(&format!(
            "/projects/{}/repository/{}?per_page=100",
            self.project_path(),
            endpoint
        ))?;

        let entries: Vec<RefEntry> = resp
            .body_mut()
            .read_json()
            .map_err(|_| VcsError::InvalidResponse("GitLab"))?;

        entries
            .into_iter()
            .map(|entry| {
                let date = parse_commit_date(&entry.commit.committed_date)?;
                Ok((
                    entry.name,
                    CommitInfo {
                        sha: entry.commit.id,
                        date,
                    },
                ))
            })
            .collect()
    }
}

impl Repository for GitlabRepository {
    fn get_tags(&self) -> Result<Vec<(String, CommitInfo)>> {
        self.list_refs("tags")
    }

    fn get_branches(&self) -> Result<Vec<(String, CommitInfo)>> {
        self.list_refs("branches")
    }

    fn read_file(&self, sha: &str, path: &str, sink: &mut dyn Write) -> Result<()> {
        let encoded = path.trim_start_matches('/').replace('/', "%2F");
        let resp = self.api_get_raw(&format!(
            "/projects/{}/repository/files/{}/raw?ref={}",
            self.project_path(),
            encoded,
            sha
        ))?;

        let bytes = resp.into_body().read_to_vec()?;
        sink.write_all(&bytes)?;
        Ok(())
    }

    fn get_download_url(&self, ref_name: &str) -> String {
        let git_ref = ref_name.strip_prefix('~').unwrap_or(ref_name);
        format!(
            "https://gitlab.com/{}/{}/-/archive/{}/{}-{}.zip",
            self.owner, self.project, git_ref, self.project, git_ref
        )
    }
}
