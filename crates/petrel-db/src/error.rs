//! Error types for document-store drivers.

use miette::Diagnostic;
use thiserror::Error;

/// Errors surfaced by a [`crate::DbController`] driver.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Package {0} already exists")]
    #[diagnostic(
        code(petrel_db::duplicate_package),
        help("Package names are unique across the catalog")
    )]
    DuplicatePackage(String),

    #[error("Package {0} not found")]
    #[diagnostic(code(petrel_db::package_not_found))]
    PackageNotFound(String),

    #[error("Package {name} has no stored ref {version}")]
    #[diagnostic(code(petrel_db::version_not_found))]
    VersionNotFound { name: String, version: String },

    #[error("Package {name} already has ref {version}")]
    #[diagnostic(code(petrel_db::duplicate_version))]
    DuplicateVersion { name: String, version: String },

    #[error("Package {name} is not owned by {owner}")]
    #[diagnostic(code(petrel_db::not_owner))]
    NotOwner { name: String, owner: String },

    #[error("Database operation failed: {0}")]
    #[diagnostic(code(petrel_db::backend))]
    Backend(String),
}

/// A specialized Result type for store operations.
pub type Result<T> = std::result::Result<T, DbError>;
