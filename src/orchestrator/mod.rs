//! Process orchestrator: one full local verification cycle.
//!
//! Sequence: migrate, seed, build (skipped when artifacts exist), spawn the
//! server, wait for readiness, run the smoke suite, tear the server down.
//! Teardown is guaranteed on every exit path after spawn, and each failing
//! stage maps to its own process exit code so CI can tell them apart.

mod runner;
mod server;
mod stage;

pub use runner::{run, RunFailure, RunOutcome};
pub use server::ServerProcess;
pub use stage::{run_stage, StageError, StageKind};
