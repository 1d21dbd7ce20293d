//! Readiness probe for the deploy gate.
//!
//! Runs inside the target server process and answers two questions:
//! - **Liveness** (`/api/health`): can the process answer at all?
//! - **Readiness** (`/api/ready`): is the database reachable and is every
//!   migration shipped with this build applied?
//!
//! The readiness status code always mirrors the report body: 200 when every
//! check passes, 503 otherwise. Load balancers and the deploy gate act on
//! the status code alone; humans read the body.
//!
//! # Embedding
//!
//! ```rust,ignore
//! use preflight::health::{run_probe_server, ProbeState};
//!
//! let state = ProbeState::new(store, "migrations");
//! tokio::spawn(run_probe_server(addr, state));
//! ```

mod checks;
mod endpoint;
mod report;
mod store;

pub use checks::{expected_migrations, ProbeState, CHECK_DATABASE, CHECK_MIGRATIONS};
pub use endpoint::{probe_response, run_probe_server, serve, HEALTH_PATH, READY_PATH};
pub use report::{CheckResult, ReadinessReport};
pub use store::{StaticStore, Store, StoreError};
