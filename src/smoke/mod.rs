//! Smoke verifier: bounded-retry checks against a running instance.
//!
//! Usable standalone (`smoke` binary, any deployed URL) or embedded in the
//! orchestrator after it spawns a local server. The suite never aborts
//! early; its `SmokeSummary` lists every failed check in execution order.

mod poll;
mod verifier;

pub use poll::{poll_endpoint, poll_with, PollTimeout};
pub use verifier::{run_smoke, SmokeStatus, SmokeSummary};
