//! Shared HTTP agent for all host adapters.

use std::sync::LazyLock;
use std::time::Duration;

use ureq::Agent;

/// One agent for the process: connection reuse, a fixed user agent, and
/// the global timeout the registry relies on for remote calls.
pub(crate) static SHARED_AGENT: LazyLock<Agent> = LazyLock::new(|| {
    Agent::config_builder()
        .user_agent("petrel/registry")
        .timeout_global(Some(Duration::from_secs(30)))
        .build()
        .into()
});
