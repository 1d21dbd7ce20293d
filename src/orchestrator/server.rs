//! Spawned server process handle.

use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::{info, warn};

use super::stage::{StageError, StageKind};

/// Handle to the spawned application server.
///
/// Termination is explicit through [`ServerProcess::shutdown`];
/// `kill_on_drop` covers the paths that never reach it.
#[derive(Debug)]
pub struct ServerProcess {
    child: Child,
}

impl ServerProcess {
    /// Spawn the server command. Does not wait for it to exit.
    pub fn spawn(command: &[String], env: &[(String, String)]) -> Result<Self, StageError> {
        let (exe, args) = command
            .split_first()
            .ok_or_else(|| StageError::new(StageKind::Spawn, "empty command"))?;

        let child = Command::new(exe)
            .args(args)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                StageError::new(StageKind::Spawn, format!("failed to start '{}': {}", exe, e))
            })?;

        info!(pid = child.id(), command = %command.join(" "), "server spawned");
        Ok(Self { child })
    }

    /// OS pid, while the process is still attached.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Terminate the server if it is still running, then reap it.
    ///
    /// Idempotent: the signal is sent at most once, whether a previous call
    /// already terminated the process or it exited on its own. Returns true
    /// when this call actually sent the signal.
    pub async fn shutdown(&mut self) -> bool {
        match self.child.try_wait() {
            Ok(Some(status)) => {
                info!(%status, "server already exited");
                false
            }
            Ok(None) => {
                if let Err(e) = self.child.start_kill() {
                    warn!(error = %e, "failed to signal server");
                    return false;
                }
                match self.child.wait().await {
                    Ok(status) => info!(%status, "server terminated"),
                    Err(e) => warn!(error = %e, "failed to reap server"),
                }
                true
            }
            Err(e) => {
                warn!(error = %e, "could not query server state");
                false
            }
        }
    }
}
