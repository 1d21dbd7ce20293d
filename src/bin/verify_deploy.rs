//! Full deploy verification cycle.
//!
//! Runs migrations and seeds, builds assets when needed, starts the
//! application server, waits for readiness, smoke-verifies it, and tears
//! everything down. The exit code names the failing stage so CI can tell a
//! broken migration from a server that never came up.

use std::process::ExitCode;

use clap::Parser;
use reqwest::Client;

use preflight::config::{Config, ConfigError};
use preflight::orchestrator;

#[derive(Parser)]
#[command(name = "verify-deploy", version = preflight::VERSION)]
#[command(
    about = "Migrate, seed, start the server, and smoke-verify it",
    long_about = None
)]
struct Cli {
    /// Port the spawned server listens on (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Base URL to verify (overrides SMOKE_BASE / BASE_URL)
    #[arg(long)]
    base: Option<String>,

    /// Database connection string for the stages and server (overrides DATABASE_URL)
    #[arg(long)]
    db: Option<String>,

    /// Session secret for the server (overrides SESSION_SECRET)
    #[arg(long)]
    secret: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load(cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            return ExitCode::from(2);
        }
    };

    preflight::logging::init(&config.logging);
    config.log_summary();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("failed to start runtime: {}", e);
            return ExitCode::from(1);
        }
    };

    runtime.block_on(run(config))
}

/// Env-loaded configuration with flag overrides applied on top.
fn load(cli: Cli) -> Result<Config, ConfigError> {
    let mut config = Config::from_env()?;
    let orch = &mut config.orchestrator;

    if let Some(port) = cli.port {
        orch.port = port;
    }
    if let Some(base) = cli.base {
        orch.base_override = Some(base);
    }
    if let Some(db) = cli.db {
        orch.database_url = Some(db);
    }
    if let Some(secret) = cli.secret {
        orch.session_secret = Some(secret);
    }

    Ok(config)
}

async fn run(config: Config) -> ExitCode {
    let client = match Client::builder().timeout(config.orchestrator.smoke.timeout).build() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("failed to build HTTP client: {}", e);
            return ExitCode::from(1);
        }
    };

    let outcome = orchestrator::run(&client, &config.orchestrator).await;

    if let Some(summary) = outcome.summary() {
        let json = serde_json::to_string_pretty(summary).unwrap_or_default();
        if summary.passed() {
            println!("{}", json);
        } else {
            eprintln!("{}", json);
        }
    }

    ExitCode::from(outcome.exit_code())
}
