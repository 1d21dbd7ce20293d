//! Orchestrator end-to-end tests
//!
//! Stage commands are throwaway shell scripts that record what ran; the
//! "server" is a long sleep whose pid lets each test prove teardown.

use std::path::Path;
use std::time::Duration;

use crate::helpers::*;
use preflight::config::OrchestratorConfig;
use preflight::orchestrator::run;

fn config_for(dir: &Path, base: String) -> OrchestratorConfig {
    OrchestratorConfig {
        port: 4321,
        base_override: Some(base),
        database_url: Some("postgres://localhost/app_test".to_string()),
        session_secret: None,
        migrate_cmd: strs(&["true"]),
        seed_cmd: strs(&["true"]),
        build_cmd: strs(&["true"]),
        server_cmd: strs(&["sleep", "30"]),
        build_marker: dir.join("build"),
        ready_timeout: Duration::from_secs(5),
        smoke: smoke_config(2_000, 50, "<html"),
    }
}

fn read_pid(path: &Path) -> u32 {
    std::fs::read_to_string(path)
        .expect("Failed to read pid file")
        .trim()
        .parse()
        .expect("Failed to parse pid")
}

/// Stages run in order with the configured environment, and the run passes
#[tokio::test]
async fn test_full_cycle_passes_in_order() {
    // Two failing readiness polls keep the run alive until the server
    // script has written its pid and port files.
    let app = TestApp::start(TestAppConfig {
        ready_failures: 2,
        ..Default::default()
    })
    .await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let log = dir.path().join("stages.log");
    let pid_file = dir.path().join("server.pid");
    let port_file = dir.path().join("server.port");

    let mut config = config_for(dir.path(), app.base());
    config.migrate_cmd = write_script(
        dir.path(),
        "migrate.sh",
        &format!(
            "test \"$DATABASE_URL\" = \"postgres://localhost/app_test\" || exit 9\n\
             test -z \"$SESSION_SECRET\" || exit 9\n\
             echo migrate >> {}",
            log.display()
        ),
    );
    config.seed_cmd = write_script(
        dir.path(),
        "seed.sh",
        &format!("echo seed >> {}", log.display()),
    );
    config.build_cmd = write_script(
        dir.path(),
        "build.sh",
        &format!("echo build >> {}", log.display()),
    );
    config.server_cmd = write_script(
        dir.path(),
        "server.sh",
        &format!(
            "echo $PORT > {}\necho $$ > {}\nexec sleep 30",
            port_file.display(),
            pid_file.display()
        ),
    );

    let outcome = run(&client(), &config).await;

    assert_eq!(outcome.exit_code(), 0);
    assert!(outcome.summary().expect("summary").passed());

    let stages = std::fs::read_to_string(&log).expect("Failed to read stage log");
    assert_eq!(stages, "migrate\nseed\nbuild\n");

    let port = std::fs::read_to_string(&port_file).expect("Failed to read port file");
    assert_eq!(port.trim(), "4321");

    let pid = read_pid(&pid_file);
    assert!(!process_alive(pid), "server must be reaped after the run");
}

/// A failing migration stops the run before seeding
#[tokio::test]
async fn test_migrate_failure_stops_the_run() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let seeded = dir.path().join("seeded");

    let mut config = config_for(dir.path(), unused_base().await);
    config.migrate_cmd = write_script(dir.path(), "migrate.sh", "exit 1");
    config.seed_cmd = write_script(
        dir.path(),
        "seed.sh",
        &format!("echo seeded > {}", seeded.display()),
    );

    let outcome = run(&client(), &config).await;

    assert_eq!(outcome.exit_code(), 3);
    assert!(outcome.summary().is_none());
    assert!(!seeded.exists(), "seed must not run after a failed migration");
}

/// The build stage is skipped when its marker already exists
#[tokio::test]
async fn test_build_skipped_when_artifacts_present() {
    let app = TestApp::start_default().await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let built = dir.path().join("built");

    let mut config = config_for(dir.path(), app.base());
    config.build_marker = dir.path().join("build-ok");
    std::fs::write(&config.build_marker, "").expect("Failed to write marker");
    config.build_cmd = write_script(
        dir.path(),
        "build.sh",
        &format!("echo built > {}", built.display()),
    );

    let outcome = run(&client(), &config).await;

    assert_eq!(outcome.exit_code(), 0);
    assert!(!built.exists(), "build must not run when the marker exists");
}

/// Readiness that never arrives ends the run with its own code and a teardown
#[tokio::test]
async fn test_ready_timeout_tears_down_server() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pid_file = dir.path().join("server.pid");

    let mut config = config_for(dir.path(), unused_base().await);
    config.ready_timeout = Duration::from_millis(400);
    config.smoke = smoke_config(400, 50, "<html");
    config.server_cmd = write_script(
        dir.path(),
        "server.sh",
        &format!("echo $$ > {}\nexec sleep 30", pid_file.display()),
    );

    let outcome = run(&client(), &config).await;

    assert_eq!(outcome.exit_code(), 7);
    assert!(outcome.summary().is_none());

    let pid = read_pid(&pid_file);
    assert!(!process_alive(pid), "server must be reaped after a timeout");
}

/// A failing smoke suite still releases the server
#[tokio::test]
async fn test_smoke_failure_still_tears_down() {
    // Gate readiness so the server script writes its pid file first.
    let app = TestApp::start(TestAppConfig {
        home_status: 500,
        ready_failures: 2,
        ..Default::default()
    })
    .await;
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let pid_file = dir.path().join("server.pid");

    let mut config = config_for(dir.path(), app.base());
    config.server_cmd = write_script(
        dir.path(),
        "server.sh",
        &format!("echo $$ > {}\nexec sleep 30", pid_file.display()),
    );

    let outcome = run(&client(), &config).await;

    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(
        outcome.summary().expect("summary").failures,
        vec!["home".to_string()]
    );

    let pid = read_pid(&pid_file);
    assert!(!process_alive(pid), "server must be reaped after a failed run");
}

/// A server command that cannot start maps to the spawn exit code
#[tokio::test]
async fn test_spawn_failure_maps_to_its_exit_code() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let mut config = config_for(dir.path(), unused_base().await);
    config.server_cmd = strs(&["no-such-binary-preflight-test"]);

    let outcome = run(&client(), &config).await;

    assert_eq!(outcome.exit_code(), 6);
    assert!(outcome.summary().is_none());
}
