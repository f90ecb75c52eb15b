//! Default provider mapping repository descriptors to host adapters.

use petrel_core::RemoteRepository;

use crate::error::Result;
use crate::github::GithubRepository;
use crate::gitlab::GitlabRepository;
use crate::traits::{Repository, RepositoryProvider};

/// Resolves descriptors to the built-in GitHub and GitLab adapters.
#[derive(Default)]
pub struct HostedGitProvider;

impl HostedGitProvider {
    pub fn new() -> Self {
        Self
    }
}

impl RepositoryProvider for HostedGitProvider {
    fn open(&self, remote: &RemoteRepository) -> Result<Box<dyn Repository>> {
        Ok(match remote {
            RemoteRepository::Github { owner, project } => {
                Box::new(GithubRepository::new(owner.clone(), project.clone()))
            }
            RemoteRepository::Gitlab { owner, project } => {
                Box::new(GitlabRepository::new(owner.clone(), project.clone()))
            }
        })
    }
}
