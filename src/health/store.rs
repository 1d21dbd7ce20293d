//! Persistence seam for the readiness probe.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

/// Error type for store access.
#[derive(Debug, Clone)]
pub struct StoreError {
    pub message: String,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<String> for StoreError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for StoreError {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Access to the persistence layer, as narrow as the probe needs.
///
/// The embedding service implements this against its real database; the
/// probe never sees connection strings or query details.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheapest possible round trip to the store.
    ///
    /// Success means connectivity; the result content does not matter.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Migration identifiers the store's tracker has recorded as applied.
    async fn applied_migrations(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory store with settable state, for wiring and tests.
pub struct StaticStore {
    ping_ok: AtomicBool,
    applied: Mutex<Vec<String>>,
}

impl StaticStore {
    pub fn new() -> Self {
        Self {
            ping_ok: AtomicBool::new(true),
            applied: Mutex::new(Vec::new()),
        }
    }

    /// Make subsequent pings succeed or fail.
    pub fn set_ping_ok(&self, ok: bool) {
        self.ping_ok.store(ok, Ordering::SeqCst);
    }

    /// Replace the set of applied migration identifiers.
    ///
    /// Panics on a poisoned lock rather than dropping the write.
    pub fn set_applied(&self, ids: Vec<String>) {
        let mut applied = self.applied.lock().expect("store state poisoned");
        *applied = ids;
    }
}

impl Default for StaticStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for StaticStore {
    async fn ping(&self) -> Result<(), StoreError> {
        if self.ping_ok.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::from("connection refused"))
        }
    }

    async fn applied_migrations(&self) -> Result<Vec<String>, StoreError> {
        self.applied
            .lock()
            .map(|ids| ids.clone())
            .map_err(|_| StoreError::from("store state poisoned"))
    }
}
