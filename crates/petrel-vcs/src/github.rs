//! GitHub adapter.
//!
//! Tags and branches come from the REST API; the listing endpoints only
//! carry the commit sha, so each ref costs one extra commit lookup to
//! learn its date. File contents are served from the raw host.

use std::env;
use std::io::Write;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{Result, VcsError};
use crate::http_client::SHARED_AGENT;
use crate::traits::{parse_commit_date, CommitInfo, Repository};

const API_ROOT: &str = "https://api.github.com";
const RAW_ROOT: &str = "https://raw.githubusercontent.com";
const TOKEN_ENV: &str = "GITHUB_TOKEN";

pub struct GithubRepository {
    owner: String,
    project: String,
}

#[derive(Debug, Deserialize)]
struct RefEntry {
    name: String,
    commit: CommitRef,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    commit: CommitBody,
}

#[derive(Debug, Deserialize)]
struct CommitBody {
    committer: CommitSignature,
}

#[derive(Debug, Deserialize)]
struct CommitSignature {
    date: String,
}

impl GithubRepository {
    pub fn new(owner: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            project: project.into(),
        }
    }

    fn api_get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{API_ROOT}{path}");
        let url = Url::parse(&url).map_err(|source| VcsError::InvalidUrl { url, source })?;

        let mut req = SHARED_AGENT.get(url.as_str());
        if let Ok(token) = env::var(TOKEN_ENV) {
            req = req.header("Authorization", &format!("Bearer {token}"));
        }

        let mut resp = req.call()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(VcsError::HttpError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        resp.body_mut()
            .read_json()
            .map_err(|_| VcsError::InvalidResponse("GitHub"))
    }

    fn commit_info(&self, sha: &str) -> Result<CommitInfo> {
        let detail: CommitDetail = self.api_get(&format!(
            "/repos/{}/{}/commits/{}",
            self.owner, self.project, sha
        ))?;
        Ok(CommitInfo {
            sha: sha.to_string(),
            date: parse_commit_date(&detail.commit.committer.date)?,
        })
    }

    fn list_refs(&self, endpoint: &str) -> Result<Vec<(String, CommitInfo)>> {
        let entries: Vec<RefEntry> = self.api_get(&format!(
            "/repos/{}/{}/{}?per_page=100",
            self.owner, self.project, endpoint
        ))?;

        let mut refs = Vec::with_capacity(entries.len());
        for entry in entries {
            match self.commit_info(&entry.commit.sha) {
                Ok(commit) => refs.push((entry.name, commit)),
                Err(err) => {
                    debug!(
                        "Skipping {} {} of {}/{}: {}",
                        endpoint.trim_end_matches('s'),
                        entry.name,
                        self.owner,
                        self.project,
                        err
                    );
                }
            }
        }
        Ok(refs)
    }
}

impl Repository for GithubRepository {
    fn get_tags(&self) -> Result<Vec<(String, CommitInfo)>> {
        self.list_refs("tags")
    }

    fn get_branches(&self) -> Result<Vec<(String, CommitInfo)>> {
        self.list_refs("branches")
    }

    fn read_file(&self, sha: &str, path: &str, sink: &mut dyn Write) -> Result<()> {
        let url = format!(
            "{RAW_ROOT}/{}/{}/{}/{}",
            self.owner,
            self.project,
            sha,
            path.trim_start_matches('/')
        );

        let resp = SHARED_AGENT.get(url.as_str()).call()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(VcsError::HttpError {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = resp.into_body().read_to_vec()?;
        sink.write_all(&bytes)?;
        Ok(())
    }

    fn get_download_url(&self, ref_name: &str) -> String {
        let git_ref = ref_name.strip_prefix('~').unwrap_or(ref_name);
        format!(
            "https://github.com/{}/{}/archive/{}.zip",
            self.owner, self.project, git_ref
        )
    }
}
