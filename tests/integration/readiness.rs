//! Liveness and readiness endpoint tests

use std::sync::Arc;

use crate::helpers::*;
use preflight::health::{serve, ProbeState, StaticStore};
use reqwest::StatusCode;
use serde_json::Value;

/// Liveness answers 200 with the build version
#[tokio::test]
async fn test_health_returns_200() {
    let app = TestApp::start_default().await;

    let response = client()
        .get(app.url("/api/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert_status(&response, StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["ok"], true);
    assert!(body["version"].is_string());
}

/// Liveness keeps answering while the store is down
#[tokio::test]
async fn test_health_ignores_store_state() {
    let app = TestApp::start_default().await;
    app.store.set_ping_ok(false);

    let response = client()
        .get(app.url("/api/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert_status(&response, StatusCode::OK);
}

/// Readiness answers 200 with a bare ok body when every check passes
#[tokio::test]
async fn test_ready_returns_200_when_all_checks_pass() {
    let app = TestApp::start_default().await;

    let response = client()
        .get(app.url("/api/ready"))
        .send()
        .await
        .expect("Failed to send request");

    assert_status(&response, StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["ok"], true);
    assert!(body["timestamp"].as_str().expect("timestamp").ends_with('Z'));
    assert!(body.get("error").is_none());
}

/// Readiness answers 503 and counts the backlog when migrations are pending
#[tokio::test]
async fn test_ready_reports_pending_migrations() {
    let app = TestApp::start(TestAppConfig {
        migrations: strs(&["20240101_init", "20240215_orders", "20240302_index"]),
        applied: strs(&["20240101_init"]),
        ..Default::default()
    })
    .await;

    let response = client()
        .get(app.url("/api/ready"))
        .send()
        .await
        .expect("Failed to send request");

    assert_status(&response, StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["ok"], false);

    let checks = &body["error"]["details"]["checks"];
    assert_eq!(checks["migrations"]["ok"], false);
    assert_eq!(checks["migrations"]["pending"], 2);
    assert_eq!(checks["database"]["ok"], true);
}

/// Readiness answers 503 on a connectivity failure and still reports every check
#[tokio::test]
async fn test_ready_reports_store_outage() {
    let app = TestApp::start_default().await;
    app.store.set_ping_ok(false);

    let response = client()
        .get(app.url("/api/ready"))
        .send()
        .await
        .expect("Failed to send request");

    assert_status(&response, StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.expect("Failed to parse body");

    let checks = &body["error"]["details"]["checks"];
    assert_eq!(checks["database"]["ok"], false);
    assert!(checks["database"]["detail"].is_string());
    assert!(checks["migrations"].is_object());
}

/// The standalone probe server answers over a real socket
#[tokio::test]
async fn test_probe_server_loop_serves_ready() {
    let dir = tempfile::tempdir().expect("Failed to create migrations dir");
    let store = Arc::new(StaticStore::new());
    let state = ProbeState::new(store, dir.path());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(serve(listener, state));

    let response = client()
        .get(format!("http://{}/api/ready", addr))
        .send()
        .await
        .expect("Failed to send request");

    assert_status(&response, StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["ok"], true);
}

/// Unknown probe paths get a plain 404
#[tokio::test]
async fn test_unknown_path_returns_404() {
    let app = TestApp::start_default().await;

    let response = client()
        .get(app.url("/api/nope"))
        .send()
        .await
        .expect("Failed to send request");

    assert_status(&response, StatusCode::NOT_FOUND);
    assert_body_contains(response, "Not Found").await;
}
