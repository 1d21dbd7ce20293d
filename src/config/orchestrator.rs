//! Deploy verification configuration.

use std::path::PathBuf;
use std::time::Duration;

use super::parse::{env_command, env_opt, env_or, env_parse};
use super::smoke::SmokeConfig;
use super::ConfigError;

/// Process orchestrator configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// Port the spawned server listens on (default: 3000).
    pub port: u16,
    /// Explicitly configured base URL (SMOKE_BASE > BASE_URL), if any.
    pub base_override: Option<String>,
    /// Connection string handed to stage commands and the server.
    pub database_url: Option<String>,
    /// Session secret handed to the server.
    pub session_secret: Option<String>,
    /// Migration command (default: script/migrate).
    pub migrate_cmd: Vec<String>,
    /// Seed command (default: script/seed).
    pub seed_cmd: Vec<String>,
    /// Build command, run only when the marker is absent (default: script/build).
    pub build_cmd: Vec<String>,
    /// Server command (default: script/server).
    pub server_cmd: Vec<String>,
    /// Path whose existence skips the build stage (default: build).
    pub build_marker: PathBuf,
    /// Readiness polling budget (default: 45s).
    pub ready_timeout: Duration,
    /// Knobs for the embedded smoke verifier.
    pub smoke: SmokeConfig,
}

impl OrchestratorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            port: env_parse("PORT", 3000)?,
            base_override: env_opt("SMOKE_BASE").or_else(|| env_opt("BASE_URL")),
            database_url: env_opt("DATABASE_URL"),
            session_secret: env_opt("SESSION_SECRET"),
            migrate_cmd: env_command("MIGRATE_CMD", "script/migrate")?,
            seed_cmd: env_command("SEED_CMD", "script/seed")?,
            build_cmd: env_command("BUILD_CMD", "script/build")?,
            server_cmd: env_command("SERVER_CMD", "script/server")?,
            build_marker: PathBuf::from(env_or("BUILD_MARKER", "build")),
            ready_timeout: Duration::from_millis(env_parse("READY_TIMEOUT_MS", 45_000u64)?),
            smoke: SmokeConfig::from_env()?,
        })
    }

    /// Base URL polled for readiness: the explicit override when one was
    /// configured, otherwise derived from the port.
    pub fn base(&self) -> String {
        self.base_override
            .clone()
            .unwrap_or_else(|| format!("http://127.0.0.1:{}", self.port))
    }

    /// Variables added to the environment of every stage command and the
    /// spawned server, on top of what they inherit from the orchestrator.
    pub fn child_env(&self) -> Vec<(String, String)> {
        let mut env = vec![("PORT".to_string(), self.port.to_string())];
        if let Some(ref url) = self.database_url {
            env.push(("DATABASE_URL".to_string(), url.clone()));
        }
        if let Some(ref secret) = self.session_secret {
            env.push(("SESSION_SECRET".to_string(), secret.clone()));
        }
        env
    }
}
