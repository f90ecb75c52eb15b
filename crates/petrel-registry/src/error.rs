//! Error types for the registry engine.

use miette::Diagnostic;
use petrel_core::ValidationError;
use petrel_db::DbError;
use petrel_vcs::VcsError;
use thiserror::Error;

/// Errors surfaced by registry operations.
#[derive(Error, Diagnostic, Debug)]
pub enum RegistryError {
    #[error(transparent)]
    #[diagnostic(code(petrel_registry::validation))]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(code(petrel_registry::db))]
    Db(#[from] DbError),

    #[error(transparent)]
    #[diagnostic(
        code(petrel_registry::repository),
        help("Check that the repository exists and is reachable")
    )]
    Repository(#[from] VcsError),

    #[error("Invalid package description: {0}")]
    #[diagnostic(code(petrel_registry::json))]
    Json(#[from] serde_json::Error),

    #[error("No branch of the repository contains a usable package description")]
    #[diagnostic(
        code(petrel_registry::no_usable_description),
        help("The repository must carry a package.json with name, description and license")
    )]
    NoUsablePackageDescription,

    #[error("Error while {action}: {source}")]
    #[diagnostic(code(petrel_registry::io))]
    Io {
        action: String,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(petrel_registry::config))]
    Config(#[from] toml::de::Error),
}

/// A specialized Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Extension trait for adding context to I/O errors.
pub trait ErrorContext<T> {
    /// Adds context to an error, describing what action was being performed.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            RegistryError::Io {
                action: context(),
                source: err,
            }
        })
    }
}
