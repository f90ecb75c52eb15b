//! The registry facade: the entry points frontends call.

use std::sync::Arc;

use petrel_core::{validate_name, validate_package_info, Package, PackageSummary, RemoteRepository};
use petrel_db::DbController;
use petrel_vcs::RepositoryProvider;
use serde_json::Value;
use tracing::{debug, info};

use crate::cache::InfoCache;
use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::reconcile::fetch_version_info;
use crate::view::package_view;
use crate::worker::{trigger_update, UpdateQueue};

/// State shared between the facade and the background worker.
pub(crate) struct RegistryInner {
    pub(crate) db: Arc<dyn DbController>,
    pub(crate) provider: Arc<dyn RepositoryProvider>,
    pub(crate) cache: InfoCache,
    pub(crate) queue: UpdateQueue,
    pub(crate) config: RegistryConfig,
}

impl RegistryInner {
    /// The read path behind `get_package_info`.
    ///
    /// Normal reads are memoized: a miss rebuilds the view from the store
    /// and caches it. With-errors reads are for administrative views; they
    /// bypass the cache in both directions and include the error report.
    pub(crate) fn package_info(&self, name: &str, include_errors: bool) -> Result<Option<Value>> {
        if !include_errors {
            if let Some(view) = self.cache.get(name) {
                return Ok(Some(view));
            }
        }

        let Some(package) = self.db.get_package(name)? else {
            return Ok(None);
        };
        let repo = self.provider.open(&package.repository)?;
        let view = package_view(&package, &*repo, include_errors)?;

        if !include_errors {
            self.cache.insert(name, view.clone());
        }
        Ok(Some(view))
    }
}

/// The package registry: catalog maintenance, background update checks,
/// and the read API.
///
/// Cloning is cheap; all clones share one catalog, cache, and update
/// queue.
#[derive(Clone)]
pub struct Registry {
    pub(crate) inner: Arc<RegistryInner>,
}

impl Registry {
    pub fn new(db: Arc<dyn DbController>, provider: Arc<dyn RepositoryProvider>) -> Self {
        Self::with_config(db, provider, RegistryConfig::default())
    }

    pub fn with_config(
        db: Arc<dyn DbController>,
        provider: Arc<dyn RepositoryProvider>,
        config: RegistryConfig,
    ) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                db,
                provider,
                cache: InfoCache::default(),
                queue: UpdateQueue::new(),
                config,
            }),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    /// Names of all cataloged packages.
    pub fn available_packages(&self) -> Result<Vec<String>> {
        Ok(self.inner.db.get_all_package_names()?)
    }

    /// Register a package hosted in `repository` and schedule its first
    /// update check.
    ///
    /// The package name is taken from the repository's own description:
    /// the preferred branch (`master` unless configured otherwise) is
    /// probed first, then the remaining branches in the order the adapter
    /// returns them, until one carries a parseable `package.json`. Probe
    /// failures are swallowed; only a fully failed probe is an error.
    ///
    /// Returns the lowercased package name.
    pub fn add_package(&self, repository: RemoteRepository, owner: &str) -> Result<String> {
        let repo = self.inner.provider.open(&repository)?;
        let branches = repo.get_branches()?;

        let preferred = self.inner.config.preferred_branch();
        let ordered = branches
            .iter()
            .filter(|(name, _)| name.as_str() == preferred)
            .chain(branches.iter().filter(|(name, _)| name.as_str() != preferred));

        let mut probed = None;
        for (branch, head) in ordered {
            match fetch_version_info(&*repo, &head.sha) {
                Ok(doc) => {
                    probed = Some(doc);
                    break;
                }
                Err(err) => {
                    debug!("No package description on branch {}: {}", branch, err);
                }
            }
        }
        let mut info = probed.ok_or(RegistryError::NoUsablePackageDescription)?;

        let name = validate_package_info(&mut info, None, None)?;
        validate_name(&name)?;

        let package = Package::new(name.clone(), owner.to_string(), repository);
        self.inner.db.add_package(&package)?;
        info!("Added package {} for {}", name, owner);

        self.trigger_package_update(&name);
        Ok(name)
    }

    /// Delete a package. Ownership is enforced by the store.
    pub fn remove_package(&self, name: &str, owner: &str) -> Result<()> {
        self.inner.db.remove_package(name, owner)?;
        self.inner.cache.invalidate(name);
        info!("Removed package {} of {}", name, owner);
        Ok(())
    }

    /// The JSON view of a package, or `None` when it is not cataloged.
    pub fn get_package_info(&self, name: &str, include_errors: bool) -> Result<Option<Value>> {
        self.inner.package_info(name, include_errors)
    }

    /// Summaries of all packages owned by `owner`.
    pub fn get_packages(&self, owner: &str) -> Result<Vec<PackageSummary>> {
        Ok(self.inner.db.get_user_packages(owner)?)
    }

    /// Keyword search over the catalog.
    pub fn search_packages(&self, keywords: &[String]) -> Result<Vec<PackageSummary>> {
        Ok(self.inner.db.search_packages(keywords)?)
    }

    pub fn set_package_categories(&self, name: &str, categories: &[String]) -> Result<()> {
        Ok(self.inner.db.set_package_categories(name, categories)?)
    }

    /// Schedule an update check for one package.
    pub fn trigger_package_update(&self, name: &str) {
        trigger_update(&self.inner, name);
    }

    /// True iff the package is queued or being reconciled right now.
    pub fn is_package_scheduled_for_update(&self, name: &str) -> bool {
        self.inner.queue.is_scheduled(name)
    }

    /// Enqueue an update check for every cataloged package.
    ///
    /// Called by the frontend's periodic sweep timer, whose period is
    /// [`RegistryConfig::update_interval`].
    pub fn check_for_new_versions(&self) -> Result<()> {
        let names = self.inner.db.get_all_package_names()?;
        info!("Triggering update check of {} packages", names.len());
        for name in &names {
            trigger_update(&self.inner, name);
        }
        Ok(())
    }
}
