//! The petrel registry update engine.
//!
//! This crate maintains the authoritative package catalog and keeps it in
//! sync with upstream repositories:
//!
//! - [`Registry`] is the facade frontends call: add/remove packages,
//!   lookups, search, and update triggers.
//! - A single background worker drains a deduplicating FIFO queue of
//!   package names and runs the reconciler for each.
//! - The reconciler fetches tags and branches through the
//!   [`petrel_vcs::Repository`] capability, admits each ref under strict
//!   validity rules, prunes refs that vanished upstream, and records a
//!   per-ref error report on the package.
//! - Reads are served from a memoized per-package JSON view, invalidated
//!   before every write.
//!
//! Persistence goes through [`petrel_db::DbController`]; the engine makes
//! no assumptions beyond document semantics.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use petrel_db::MemoryDb;
//! use petrel_registry::Registry;
//! use petrel_core::RemoteRepository;
//! use petrel_vcs::HostedGitProvider;
//!
//! fn main() -> petrel_registry::Result<()> {
//!     let registry = Registry::new(
//!         Arc::new(MemoryDb::new()),
//!         Arc::new(HostedGitProvider::new()),
//!     );
//!
//!     let name = registry.add_package(
//!         RemoteRepository::Github {
//!             owner: "acme".into(),
//!             project: "frobnicate".into(),
//!         },
//!         "user-42",
//!     )?;
//!
//!     // the first update check is already queued; reads serve the
//!     // catalog as it fills in
//!     let _view = registry.get_package_info(&name, false)?;
//!     Ok(())
//! }
//! ```

mod admission;
mod cache;
pub mod config;
pub mod error;
mod reconcile;
pub mod registry;
#[cfg(test)]
mod test_utils;
mod view;
mod worker;

pub use config::RegistryConfig;
pub use error::{ErrorContext, RegistryError, Result};
pub use registry::Registry;
