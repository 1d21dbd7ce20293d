//! Smoke verifier tests against live in-process instances

use std::time::Instant;

use crate::helpers::*;
use preflight::smoke::run_smoke;

/// A healthy instance passes the full suite with no failures
#[tokio::test]
async fn test_smoke_passes_against_healthy_instance() {
    let app = TestApp::start_default().await;
    let config = smoke_config(3_000, 50, "<html");

    let summary = run_smoke(&client(), &app.base(), &config).await;

    assert!(summary.passed(), "failures: {:?}", summary.failures);
    assert!(summary.failures.is_empty());
    assert_eq!(summary.base, app.base());
}

/// Trailing slashes on the base are dropped before probing
#[tokio::test]
async fn test_smoke_trims_trailing_slash() {
    let app = TestApp::start_default().await;
    let config = smoke_config(3_000, 50, "<html");

    let summary = run_smoke(&client(), &format!("{}/", app.base()), &config).await;

    assert!(summary.passed(), "failures: {:?}", summary.failures);
    assert_eq!(summary.base, app.base());
}

/// A served root page without the marker fails only the home assertion
#[tokio::test]
async fn test_smoke_records_missing_marker() {
    let app = TestApp::start(TestAppConfig {
        home_body: "maintenance page".to_string(),
        ..Default::default()
    })
    .await;
    let config = smoke_config(3_000, 50, "<html");

    let summary = run_smoke(&client(), &app.base(), &config).await;

    assert!(!summary.passed());
    assert_eq!(summary.failures, vec!["home".to_string()]);
}

/// A root page with an error status fails the home assertion even with the marker
#[tokio::test]
async fn test_smoke_flags_home_error_status() {
    let app = TestApp::start(TestAppConfig {
        home_status: 500,
        ..Default::default()
    })
    .await;
    let config = smoke_config(3_000, 50, "<html");

    let summary = run_smoke(&client(), &app.base(), &config).await;

    assert!(!summary.passed());
    assert_eq!(summary.failures, vec!["home".to_string()]);
}

/// Every probe is reported, in order, when nothing is listening
#[tokio::test]
async fn test_smoke_reports_every_probe_on_dead_base() {
    let base = unused_base().await;
    let config = smoke_config(400, 50, "<html");

    let summary = run_smoke(&client(), &base, &config).await;

    assert!(!summary.passed());
    assert_eq!(summary.failures.len(), 3, "failures: {:?}", summary.failures);
    assert!(summary.failures[0].starts_with("health ("));
    assert!(summary.failures[1].starts_with("ready ("));
    assert!(summary.failures[2].starts_with("home ("));
}

/// Liveness that recovers within the window still passes, after retries
#[tokio::test]
async fn test_smoke_waits_out_flaky_liveness() {
    let app = TestApp::start(TestAppConfig {
        health_failures: 2,
        ..Default::default()
    })
    .await;
    let config = smoke_config(3_000, 50, "<html");

    let started = Instant::now();
    let summary = run_smoke(&client(), &app.base(), &config).await;

    assert!(summary.passed(), "failures: {:?}", summary.failures);
    assert!(started.elapsed().as_millis() >= 100, "expected at least two retry sleeps");
}
