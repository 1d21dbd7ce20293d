//! The verification cycle.

use reqwest::Client;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::OrchestratorConfig;
use crate::health::READY_PATH;
use crate::smoke::{poll_endpoint, run_smoke, SmokeSummary};

use super::server::ServerProcess;
use super::stage::{run_stage, StageError, StageKind};

/// Why a run did not pass.
#[derive(Debug)]
pub enum RunFailure {
    /// A fatal preparation stage or the spawn did not complete.
    Stage(StageError),
    /// The server never became ready within the budget.
    Ready { message: String },
    /// The server was ready but smoke checks failed.
    Smoke(SmokeSummary),
}

/// Terminal signal of one verification run.
#[derive(Debug)]
pub enum RunOutcome {
    Passed(SmokeSummary),
    Failed(RunFailure),
}

impl RunOutcome {
    /// Process exit code for automation.
    ///
    /// 0 pass, 1 smoke failure, 3 migrate, 4 seed, 5 build, 6 spawn,
    /// 7 readiness timeout. 2 is reserved for configuration errors.
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Passed(_) => 0,
            RunOutcome::Failed(RunFailure::Smoke(_)) => 1,
            RunOutcome::Failed(RunFailure::Stage(e)) => match e.stage {
                StageKind::Migrate => 3,
                StageKind::Seed => 4,
                StageKind::Build => 5,
                StageKind::Spawn => 6,
            },
            RunOutcome::Failed(RunFailure::Ready { .. }) => 7,
        }
    }

    /// The smoke summary, when the run got far enough to produce one.
    pub fn summary(&self) -> Option<&SmokeSummary> {
        match self {
            RunOutcome::Passed(summary) => Some(summary),
            RunOutcome::Failed(RunFailure::Smoke(summary)) => Some(summary),
            _ => None,
        }
    }
}

/// Drive one full verification cycle.
///
/// Stage order: migrate, seed, build (only when the marker is absent),
/// spawn, readiness wait, smoke suite. Preparation stages are fail-fast;
/// once the server is spawned, every path runs teardown before returning.
pub async fn run(client: &Client, config: &OrchestratorConfig) -> RunOutcome {
    let run_id = Uuid::new_v4();
    info!(%run_id, base = %config.base(), "verification run starting");

    let env = config.child_env();

    if let Err(e) = run_stage(StageKind::Migrate, &config.migrate_cmd, &env).await {
        return fail_stage(e);
    }
    if let Err(e) = run_stage(StageKind::Seed, &config.seed_cmd, &env).await {
        return fail_stage(e);
    }
    if config.build_marker.exists() {
        info!(
            marker = %config.build_marker.display(),
            "build artifacts present, skipping build"
        );
    } else if let Err(e) = run_stage(StageKind::Build, &config.build_cmd, &env).await {
        return fail_stage(e);
    }

    let mut server = match ServerProcess::spawn(&config.server_cmd, &env) {
        Ok(server) => server,
        Err(e) => return fail_stage(e),
    };

    // No `?` between here and shutdown: the handle must be released on
    // every path.
    let outcome = drive(client, config).await;
    server.shutdown().await;

    info!(%run_id, exit_code = outcome.exit_code(), "verification run finished");
    outcome
}

fn fail_stage(e: StageError) -> RunOutcome {
    error!(stage = %e.stage, error = %e.message, "fatal stage failure");
    RunOutcome::Failed(RunFailure::Stage(e))
}

/// Post-spawn phase: readiness wait, then the smoke suite.
async fn drive(client: &Client, config: &OrchestratorConfig) -> RunOutcome {
    let base = config.base();
    let ready_url = format!("{}{}", base.trim_end_matches('/'), READY_PATH);
    info!(
        url = %ready_url,
        budget_ms = config.ready_timeout.as_millis() as u64,
        "waiting for readiness"
    );

    if let Err(e) =
        poll_endpoint(client, &ready_url, config.ready_timeout, config.smoke.interval).await
    {
        error!(error = %e, "server never became ready");
        dump_last_ready_body(client, &ready_url).await;
        return RunOutcome::Failed(RunFailure::Ready {
            message: e.to_string(),
        });
    }

    let summary = run_smoke(client, &base, &config.smoke).await;
    if summary.passed() {
        RunOutcome::Passed(summary)
    } else {
        RunOutcome::Failed(RunFailure::Smoke(summary))
    }
}

/// Best-effort diagnostic snapshot after a readiness timeout.
///
/// Secondary faults are discarded; the timeout is already the error being
/// reported.
async fn dump_last_ready_body(client: &Client, url: &str) {
    if let Ok(response) = client.get(url).send().await {
        let status = response.status().as_u16();
        if let Ok(body) = response.text().await {
            warn!(status, body = %body, "last readiness answer");
        }
    }
}
