//! Smoke verifier configuration.

use std::time::Duration;

use super::parse::{env_opt, env_or, env_parse};
use super::ConfigError;

/// Smoke verifier configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct SmokeConfig {
    /// Base URL of the instance under test (SMOKE_BASE).
    pub base: Option<String>,
    /// Total polling budget per endpoint (default: 30s).
    pub timeout: Duration,
    /// Delay between polling attempts (default: 1s).
    pub interval: Duration,
    /// Substring the root page must contain (default: "<html").
    pub marker: String,
}

impl SmokeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base: env_opt("SMOKE_BASE"),
            timeout: Duration::from_millis(env_parse("SMOKE_TIMEOUT_MS", 30_000u64)?),
            interval: Duration::from_millis(env_parse("SMOKE_INTERVAL_MS", 1_000u64)?),
            marker: env_or("SMOKE_MARKER", "<html"),
        })
    }

    /// Base URL, or the error reported when no target is configured.
    pub fn require_base(&self) -> Result<&str, ConfigError> {
        self.base.as_deref().ok_or_else(|| ConfigError::Missing {
            key: "SMOKE_BASE".into(),
        })
    }
}
