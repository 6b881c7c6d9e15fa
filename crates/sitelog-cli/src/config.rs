//! `sitelog.toml` loading.
//!
//! Every section and field is optional; a missing file path means defaults.

use serde::Deserialize;
use sitelog_core::{SitelogError, SitelogResult};
use sitelog_security::RateLimitPolicy;
use std::path::Path;

/// Top-level CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SitelogConfig {
    /// Login attempt limits used by `replay-auth`.
    #[serde(default)]
    pub auth_rate_limit: RateLimitPolicy,
}

impl SitelogConfig {
    /// Load from `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> SitelogResult<Self> {
        let config = match path {
            Some(path) => parse_config(path)?,
            None => Self::default(),
        };
        config.auth_rate_limit.validate()?;
        Ok(config)
    }
}

/// Read and parse a TOML config file into a [`SitelogConfig`].
pub fn parse_config(path: &Path) -> SitelogResult<SitelogConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        SitelogError::Config(format!(
            "Failed to read config '{}': {}",
            path.display(),
            e
        ))
    })?;
    let config: SitelogConfig = toml::from_str(&content).map_err(|e| {
        SitelogError::Config(format!(
            "Failed to parse config '{}': {}",
            path.display(),
            e
        ))
    })?;
    Ok(config)
}
