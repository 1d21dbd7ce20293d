//! Configuration module for preflight.
//!
//! This module provides centralized configuration loading from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use preflight::config::Config;
//!
//! let config = Config::from_env()?;
//! println!("Base URL: {}", config.orchestrator.base());
//! println!("Server command: {:?}", config.orchestrator.server_cmd);
//! ```

mod error;
mod logging;
mod orchestrator;
mod parse;
mod smoke;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use orchestrator::OrchestratorConfig;
pub use parse::split_command;
pub use smoke::SmokeConfig;

/// Complete deploy-verification configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Orchestrator configuration (nests the smoke verifier knobs).
    pub orchestrator: OrchestratorConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            orchestrator: OrchestratorConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        let orch = &self.orchestrator;

        info!("Configuration loaded:");
        info!("  Base URL: {}", orch.base());
        info!("  Port: {}", orch.port);
        info!("  Migrate: {}", orch.migrate_cmd.join(" "));
        info!("  Seed: {}", orch.seed_cmd.join(" "));
        info!(
            "  Build: {} (skipped if {:?} exists)",
            orch.build_cmd.join(" "),
            orch.build_marker
        );
        info!("  Server: {}", orch.server_cmd.join(" "));
        info!("  Ready timeout: {}ms", orch.ready_timeout.as_millis());
        info!(
            "  Smoke: timeout {}ms, interval {}ms, marker {:?}",
            orch.smoke.timeout.as_millis(),
            orch.smoke.interval.as_millis(),
            orch.smoke.marker
        );

        // Values are secrets; log presence only.
        if orch.database_url.is_some() {
            info!("  Database URL: configured");
        }
        if orch.session_secret.is_some() {
            info!("  Session secret: configured");
        }
    }
}
