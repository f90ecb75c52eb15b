//! Remote-VCS capability and hosted-git adapters for the petrel registry.
//!
//! The registry engine talks to upstream repositories exclusively through
//! the [`Repository`] and [`RepositoryProvider`] traits. This crate also
//! ships the built-in adapters for repositories hosted on GitHub and
//! GitLab, which speak the hosts' REST APIs over a shared blocking HTTP
//! agent. API tokens are picked up from `GITHUB_TOKEN` / `GITLAB_TOKEN`
//! when present.

pub mod error;
pub mod github;
pub mod gitlab;
mod http_client;
pub mod provider;
pub mod traits;

pub use error::{Result, VcsError};
pub use github::GithubRepository;
pub use gitlab::GitlabRepository;
pub use provider::HostedGitProvider;
pub use traits::{CommitInfo, Repository, RepositoryProvider};
