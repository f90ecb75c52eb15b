//! Registry configuration.

use std::path::Path;
use std::time::Duration;

use petrel_core::time::parse_duration;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorContext, Result};

/// Tunables of the registry engine, loaded from a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    /// Interval between catalog-wide update sweeps (e.g. "30m", "1h").
    /// Default: "30m". The sweep timer itself runs in the frontend.
    pub update_interval: Option<String>,

    /// Branch probed first when bootstrapping a newly added package.
    /// Default: "master"
    pub preferred_branch: Option<String>,
}

impl RegistryConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Ok(toml::from_str(&content)?)
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
            .as_deref()
            .and_then(parse_duration)
            .unwrap_or(Duration::from_secs(30 * 60))
    }

    pub fn preferred_branch(&self) -> &str {
        self.preferred_branch.as_deref().unwrap_or("master")
    }
}
