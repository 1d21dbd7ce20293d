//! External stage commands.

use std::fmt;
use std::process::Stdio;
use std::time::Instant;

use tokio::process::Command;
use tracing::info;

/// The fatal stages of a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Migrate,
    Seed,
    Build,
    Spawn,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Migrate => write!(f, "migrate"),
            Self::Seed => write!(f, "seed"),
            Self::Build => write!(f, "build"),
            Self::Spawn => write!(f, "spawn"),
        }
    }
}

/// A stage that had to succeed did not.
#[derive(Debug)]
pub struct StageError {
    pub stage: StageKind,
    pub message: String,
}

impl StageError {
    pub fn new(stage: StageKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage failed: {}", self.stage, self.message)
    }
}

impl std::error::Error for StageError {}

/// Run one stage command to completion.
///
/// Console output is inherited so migration and build tools stay visible to
/// the operator. Non-zero exit is the stage's failure, surfaced with the
/// command and exit code.
pub async fn run_stage(
    kind: StageKind,
    command: &[String],
    env: &[(String, String)],
) -> Result<(), StageError> {
    let (exe, args) = command
        .split_first()
        .ok_or_else(|| StageError::new(kind, "empty command"))?;

    info!(stage = %kind, command = %command.join(" "), "running stage");
    let start = Instant::now();

    let status = Command::new(exe)
        .args(args)
        .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|e| StageError::new(kind, format!("failed to start '{}': {}", exe, e)))?;

    let elapsed_ms = start.elapsed().as_millis() as u64;
    if status.success() {
        info!(stage = %kind, elapsed_ms, "stage completed");
        return Ok(());
    }

    let detail = match status.code() {
        Some(code) => format!("'{}' exited with code {}", command.join(" "), code),
        None => format!("'{}' terminated by signal", command.join(" ")),
    };
    Err(StageError::new(kind, detail))
}
