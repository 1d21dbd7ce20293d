//! Bounded-retry polling primitive.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tokio::time::Instant;
use tracing::debug;

/// The polling deadline passed without a successful attempt.
#[derive(Debug)]
pub struct PollTimeout {
    /// Time spent polling.
    pub elapsed: Duration,
    /// Error from the most recent attempt, if any completed.
    pub last_error: Option<String>,
}

impl std::fmt::Display for PollTimeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.last_error {
            Some(e) => write!(f, "{}", e),
            None => write!(
                f,
                "no attempt completed within {}ms",
                self.elapsed.as_millis()
            ),
        }
    }
}

impl std::error::Error for PollTimeout {}

/// Retry `attempt` until it succeeds or `timeout` passes.
///
/// Each attempt is clamped to the remaining budget, so a hung attempt cannot
/// hold the loop past the deadline; the caller gets an answer within
/// `timeout` plus one `interval`. Every failure mode of an attempt gets the
/// same treatment: record the error, sleep, try again.
pub async fn poll_with<F, Fut>(
    timeout: Duration,
    interval: Duration,
    mut attempt: F,
) -> Result<(), PollTimeout>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), String>>,
{
    let start = Instant::now();
    let mut last_error = None;

    loop {
        let remaining = timeout.saturating_sub(start.elapsed());
        if remaining.is_zero() {
            return Err(PollTimeout {
                elapsed: start.elapsed(),
                last_error,
            });
        }

        match tokio::time::timeout(remaining, attempt()).await {
            Ok(Ok(())) => return Ok(()),
            Ok(Err(e)) => {
                debug!(error = %e, "poll attempt failed, retrying");
                last_error = Some(e);
            }
            Err(_) => {
                last_error = Some(format!(
                    "attempt still running after {}ms budget",
                    remaining.as_millis()
                ));
            }
        }

        tokio::time::sleep(interval).await;
    }
}

/// Poll a probe endpoint until it answers 200 with `{"ok":true,...}`.
pub async fn poll_endpoint(
    client: &Client,
    url: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<(), PollTimeout> {
    poll_with(timeout, interval, || {
        probe_once(client.clone(), url.to_string())
    })
    .await
}

/// One probe attempt. Success requires both the 200 status and an `ok:true`
/// body; a 200 with a failing body would mean the endpoint contract is
/// broken, and waiting on it must not pass.
async fn probe_once(client: Client, url: String) -> Result<(), String> {
    let response = client.get(&url).send().await.map_err(|e| e.to_string())?;

    let status = response.status().as_u16();
    if status != 200 {
        return Err(format!("status {}", status));
    }

    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("malformed body: {}", e))?;
    if body.get("ok").and_then(|v| v.as_bool()) == Some(true) {
        Ok(())
    } else {
        Err("body did not report ok".to_string())
    }
}
