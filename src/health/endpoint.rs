//! HTTP surface for the liveness and readiness probes.

use std::convert::Infallible;
use std::net::SocketAddr;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming as IncomingBody;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use super::checks::ProbeState;
use super::report::ReadinessReport;

/// Liveness endpoint path.
pub const HEALTH_PATH: &str = "/api/health";
/// Readiness endpoint path.
pub const READY_PATH: &str = "/api/ready";

/// Bind and serve the probe endpoints.
pub async fn run_probe_server(
    addr: SocketAddr,
    state: ProbeState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, state).await
}

/// Serve probes on an already-bound listener (tests bind port 0 first).
pub async fn serve(
    listener: TcpListener,
    state: ProbeState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    loop {
        let (stream, _) = listener.accept().await?;
        let _ = stream.set_nodelay(true);
        let state = state.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req| {
                let state = state.clone();
                async move { handle_probe_request(req, state).await }
            });

            let io = TokioIo::new(stream);
            let _ = http1::Builder::new().serve_connection(io, service).await;
        });
    }
}

/// Handle probe requests (/api/health, /api/ready).
async fn handle_probe_request(
    req: Request<IncomingBody>,
    state: ProbeState,
) -> Result<Response<Full<Bytes>>, Infallible> {
    Ok(probe_response(req.uri().path(), &state).await)
}

/// Route a probe request by path.
///
/// Split from the hyper service so tests can call it without a connection.
pub async fn probe_response(path: &str, state: &ProbeState) -> Response<Full<Bytes>> {
    match path {
        HEALTH_PATH => json_response(
            StatusCode::OK,
            serde_json::json!({ "ok": true, "version": crate::VERSION }),
        ),
        READY_PATH => ready_response(state).await,
        _ => Response::builder()
            .status(StatusCode::NOT_FOUND)
            .header("Content-Type", "text/plain")
            .body(Full::new(Bytes::from("Not Found")))
            .unwrap(),
    }
}

/// Run the checks and answer with a status that mirrors the report.
///
/// 200 only when `report.ok`; 503 otherwise. Never 200 with a failing body.
async fn ready_response(state: &ProbeState) -> Response<Full<Bytes>> {
    let report = ReadinessReport::from_checks(state.run_checks().await);

    let (status, body) = if report.ok {
        (
            StatusCode::OK,
            serde_json::json!({ "ok": true, "timestamp": report.timestamp }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            serde_json::json!({
                "ok": false,
                "timestamp": report.timestamp,
                "error": { "details": { "checks": report.checks } }
            }),
        )
    };

    json_response(status, body)
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}
