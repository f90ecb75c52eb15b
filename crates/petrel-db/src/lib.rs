//! Document-store capability consumed by the petrel registry.
//!
//! The registry engine performs all persistence through the
//! [`DbController`] trait and assumes nothing beyond document semantics.
//! Production deployments plug in a real document store; [`MemoryDb`] is
//! the embedded driver used by tests and single-process setups.

pub mod error;
pub mod memory;

use petrel_core::{Package, PackageSummary, PackageVersion};

pub use error::{DbError, Result};
pub use memory::MemoryDb;

/// CRUD surface over the package catalog.
///
/// Ref-level operations take the stored key: a semver string for releases,
/// `~` + branch name for branches. [`DbController::remove_version`]
/// dispatches between the two on the `~` prefix.
pub trait DbController: Send + Sync {
    /// Insert a new package record. Fails with
    /// [`DbError::DuplicatePackage`] when the name is taken.
    fn add_package(&self, package: &Package) -> Result<()>;

    /// Delete a package owned by `owner`, enforcing ownership.
    fn remove_package(&self, name: &str, owner: &str) -> Result<()>;

    fn get_package(&self, name: &str) -> Result<Option<Package>>;

    fn get_all_package_names(&self) -> Result<Vec<String>>;

    fn get_user_packages(&self, owner: &str) -> Result<Vec<PackageSummary>>;

    fn has_version(&self, name: &str, version: &str) -> Result<bool>;

    fn add_version(&self, name: &str, version: &PackageVersion) -> Result<()>;

    fn update_version(&self, name: &str, version: &PackageVersion) -> Result<()>;

    /// Remove a stored ref; branch keys (`~…`) are removed from the
    /// branch set, anything else from the release set.
    fn remove_version(&self, name: &str, version: &str) -> Result<()>;

    fn has_branch(&self, name: &str, branch: &str) -> Result<bool>;

    fn add_branch(&self, name: &str, branch: &PackageVersion) -> Result<()>;

    fn update_branch(&self, name: &str, branch: &PackageVersion) -> Result<()>;

    fn remove_branch(&self, name: &str, branch: &str) -> Result<()>;

    fn set_package_categories(&self, name: &str, categories: &[String]) -> Result<()>;

    fn set_package_errors(&self, name: &str, errors: &[String]) -> Result<()>;

    /// Keyword search over names and latest descriptions.
    fn search_packages(&self, keywords: &[String]) -> Result<Vec<PackageSummary>>;
}
