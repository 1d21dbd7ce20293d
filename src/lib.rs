//! preflight - deployment-readiness and smoke-verification toolkit.
//!
//! Sequences database migration, seeding, application startup, and
//! health/readiness verification for a hosted service, and reports a
//! deterministic pass/fail outcome for release gating.
//!
//! # Components
//!
//! - **Readiness probe** (`health`): library code embedded in the target
//!   server. Answers `/api/health` (liveness) and `/api/ready` (readiness,
//!   status mirrors the check results).
//! - **Smoke verifier** (`smoke`, `smoke` binary): bounded-retry polling of
//!   the probe endpoints plus one root-page content assertion, against any
//!   running instance.
//! - **Process orchestrator** (`orchestrator`, `verify-deploy` binary): one
//!   full local cycle from migrations to smoke verification, with
//!   guaranteed teardown of the spawned server.
//!
//! # Example
//!
//! ```rust,ignore
//! use preflight::config::Config;
//! use preflight::orchestrator;
//!
//! let config = Config::from_env()?;
//! let client = reqwest::Client::new();
//! let outcome = orchestrator::run(&client, &config.orchestrator).await;
//! std::process::exit(outcome.exit_code() as i32);
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (8 chars), empty outside a checkout
pub const BUILD_VERSION: &str = env!("BUILD_VERSION");

/// Full version string: "0.1.0 (abc12345)"
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_VERSION"), ")");

pub mod config;
pub mod health;
pub mod logging;
pub mod orchestrator;
pub mod smoke;
pub mod timefmt;

// Re-exports for convenience
pub use config::Config;
pub use health::ReadinessReport;
pub use orchestrator::RunOutcome;
pub use smoke::SmokeSummary;
