//! Smoke check suite.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::SmokeConfig;
use crate::health::{HEALTH_PATH, READY_PATH};
use crate::timefmt::now_iso8601;

use super::poll::poll_endpoint;

/// Overall smoke outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmokeStatus {
    Passed,
    Failed,
}

/// Machine-readable record of one smoke run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmokeSummary {
    /// Base URL the checks ran against.
    pub base: String,
    /// Polling budget per endpoint, in milliseconds.
    pub timeout_ms: u64,
    /// Polling interval, in milliseconds.
    pub interval_ms: u64,
    /// ISO 8601 timestamp of the run.
    pub timestamp: String,
    /// Overall outcome.
    pub status: SmokeStatus,
    /// Failed checks, in execution order.
    pub failures: Vec<String>,
}

impl SmokeSummary {
    /// Build a summary. `status` derives from `failures` and cannot disagree
    /// with it.
    pub fn new(
        base: impl Into<String>,
        timeout: Duration,
        interval: Duration,
        failures: Vec<String>,
    ) -> Self {
        let status = if failures.is_empty() {
            SmokeStatus::Passed
        } else {
            SmokeStatus::Failed
        };
        Self {
            base: base.into(),
            timeout_ms: timeout.as_millis() as u64,
            interval_ms: interval.as_millis() as u64,
            timestamp: now_iso8601(),
            status,
            failures,
        }
    }

    pub fn passed(&self) -> bool {
        self.status == SmokeStatus::Passed
    }
}

/// Run the full smoke suite against `base`.
///
/// Three checks, strictly in order: poll liveness, poll readiness, then one
/// unpolled root-page fetch. Every check runs regardless of earlier
/// failures, so one run reports everything that is wrong.
pub async fn run_smoke(client: &Client, base: &str, config: &SmokeConfig) -> SmokeSummary {
    let base = base.trim_end_matches('/');
    let mut failures = Vec::new();

    info!(base, "smoke: checking liveness");
    let health_url = format!("{}{}", base, HEALTH_PATH);
    if let Err(e) = poll_endpoint(client, &health_url, config.timeout, config.interval).await {
        failures.push(format!("health ({})", e));
    }

    info!(base, "smoke: checking readiness");
    let ready_url = format!("{}{}", base, READY_PATH);
    if let Err(e) = poll_endpoint(client, &ready_url, config.timeout, config.interval).await {
        failures.push(format!("ready ({})", e));
    }

    info!(base, marker = %config.marker, "smoke: checking root page");
    match check_home(client, base, &config.marker).await {
        Ok(()) => {}
        Err(HomeFailure::Content) => failures.push("home".to_string()),
        Err(HomeFailure::Transport(message)) => failures.push(format!("home ({})", message)),
    }

    let summary = SmokeSummary::new(base, config.timeout, config.interval, failures);
    if summary.passed() {
        info!(base, "smoke: all checks passed");
    } else {
        warn!(base, failures = ?summary.failures, "smoke: checks failed");
    }
    summary
}

enum HomeFailure {
    /// Reached the server but got the wrong page.
    Content,
    /// Never got an answer to judge.
    Transport(String),
}

/// Single-shot root page fetch: 200 and the marker present in the body.
async fn check_home(client: &Client, base: &str, marker: &str) -> Result<(), HomeFailure> {
    let url = format!("{}/", base);
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| HomeFailure::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| HomeFailure::Transport(e.to_string()))?;

    if status == 200 && body.contains(marker) {
        Ok(())
    } else {
        Err(HomeFailure::Content)
    }
}
