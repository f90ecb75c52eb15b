//! Validation errors shared across the registry.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while validating names, refs, and package descriptions.
#[derive(Error, Diagnostic, Debug)]
pub enum ValidationError {
    #[error("Invalid name: {0}")]
    #[diagnostic(
        code(petrel_core::invalid_name),
        help("Names may only contain ASCII letters, digits, `-` and `_`")
    )]
    InvalidName(String),

    #[error("Invalid ref: {0}")]
    #[diagnostic(
        code(petrel_core::invalid_ref),
        help("A ref is either `~` followed by a branch name or a semantic version")
    )]
    InvalidRef(String),

    #[error("Package description is not a JSON object")]
    #[diagnostic(code(petrel_core::malformed_description))]
    MalformedDescription,

    #[error("Missing or empty required field: {0}")]
    #[diagnostic(code(petrel_core::missing_required_field))]
    MissingRequiredField(&'static str),

    #[error("Package name mismatch: expected {expected}, got {found}")]
    #[diagnostic(code(petrel_core::name_mismatch))]
    NameMismatch { expected: String, found: String },

    #[error("Version field \"{found}\" does not match tag version {expected}")]
    #[diagnostic(code(petrel_core::version_mismatch))]
    VersionMismatch { expected: String, found: String },
}

/// A specialized Result type for validation.
pub type Result<T> = std::result::Result<T, ValidationError>;
