//! Standalone smoke verifier.
//!
//! Points the check suite at any running instance, prints the JSON summary,
//! and exits 0 (pass), 1 (failed checks), or 2 (configuration error).

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use reqwest::Client;

use preflight::config::{ConfigError, LoggingConfig, SmokeConfig};
use preflight::smoke::run_smoke;

#[derive(Parser)]
#[command(name = "smoke", version = preflight::VERSION)]
#[command(about = "Smoke-check a running instance", long_about = None)]
struct Cli {
    /// Base URL of the instance under test (overrides SMOKE_BASE)
    #[arg(long)]
    base: Option<String>,

    /// Polling budget per endpoint in milliseconds (overrides SMOKE_TIMEOUT_MS)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Polling interval in milliseconds (overrides SMOKE_INTERVAL_MS)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Substring the root page must contain (overrides SMOKE_MARKER)
    #[arg(long)]
    marker: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (logging, config, base) = match load(cli) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            return ExitCode::from(2);
        }
    };

    preflight::logging::init(&logging);

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

    runtime.block_on(run(base, config))
}

/// Env-loaded configuration with flag overrides applied on top.
fn load(cli: Cli) -> Result<(LoggingConfig, SmokeConfig, String), ConfigError> {
    let logging = LoggingConfig::from_env()?;
    let mut config = SmokeConfig::from_env()?;

    if let Some(base) = cli.base {
        config.base = Some(base);
    }
    if let Some(ms) = cli.timeout_ms {
        config.timeout = Duration::from_millis(ms);
    }
    if let Some(ms) = cli.interval_ms {
        config.interval = Duration::from_millis(ms);
    }
    if let Some(marker) = cli.marker {
        config.marker = marker;
    }

    let base = config.require_base()?.to_string();
    Ok((logging, config, base))
}

async fn run(base: String, config: SmokeConfig) -> ExitCode {
    let client = match Client::builder().timeout(config.timeout).build() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("failed to build HTTP client: {}", e);
            return ExitCode::from(1);
        }
    };

    let summary = run_smoke(&client, &base, &config).await;
    let json = serde_json::to_string_pretty(&summary).unwrap_or_default();

    if summary.passed() {
        println!("{}", json);
        ExitCode::SUCCESS
    } else {
        eprintln!("{}", json);
        ExitCode::from(1)
    }
}
