//! Core data model and validation rules for the petrel package registry.
//!
//! This crate defines the catalog documents ([`models`]), the package-name
//! grammar ([`name`]), the ref classifier that separates branch refs from
//! release refs ([`refs`]), and the metadata validator applied to every
//! fetched package description ([`validate`]).

pub mod error;
pub mod models;
pub mod name;
pub mod refs;
pub mod time;
pub mod validate;

pub use error::{Result, ValidationError};
pub use models::{Package, PackageSummary, PackageVersion, RemoteRepository};
pub use name::validate_name;
pub use refs::{compare_versions, release_tag, PackageRef};
pub use validate::validate_package_info;
