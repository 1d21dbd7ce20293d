//! Readiness checks.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::report::CheckResult;
use super::store::Store;

/// Connectivity check name.
pub const CHECK_DATABASE: &str = "database";
/// Migration backlog check name.
pub const CHECK_MIGRATIONS: &str = "migrations";

/// Shared state behind the probe endpoints.
#[derive(Clone)]
pub struct ProbeState {
    store: Arc<dyn Store>,
    migrations_dir: PathBuf,
}

impl ProbeState {
    /// Create probe state over a store and the build's migration directory.
    pub fn new(store: Arc<dyn Store>, migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            migrations_dir: migrations_dir.into(),
        }
    }

    /// Run every check unconditionally.
    ///
    /// Infallible: a check that cannot run reports itself as failing, so the
    /// probe endpoint always has a complete answer.
    pub async fn run_checks(&self) -> BTreeMap<String, CheckResult> {
        let mut checks = BTreeMap::new();
        checks.insert(CHECK_DATABASE.to_string(), self.connectivity_check().await);
        checks.insert(CHECK_MIGRATIONS.to_string(), self.migrations_check().await);
        checks
    }

    /// Can the store answer a trivial round trip?
    async fn connectivity_check(&self) -> CheckResult {
        match self.store.ping().await {
            Ok(()) => CheckResult::pass(),
            Err(e) => CheckResult::fail(e.to_string()),
        }
    }

    /// Are all migrations shipped with this build applied?
    ///
    /// An unreadable or absent identifier source fails the check outright;
    /// a backlog that cannot be measured must not look empty.
    async fn migrations_check(&self) -> CheckResult {
        let expected = match expected_migrations(&self.migrations_dir) {
            Ok(ids) => ids,
            Err(e) => {
                return CheckResult::fail(format!(
                    "cannot read migrations dir {}: {}",
                    self.migrations_dir.display(),
                    e
                ))
            }
        };

        let applied: HashSet<String> = match self.store.applied_migrations().await {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => return CheckResult::fail(e.to_string()),
        };

        let pending = expected
            .iter()
            .filter(|id| !applied.contains(id.as_str()))
            .count();
        if pending == 0 {
            CheckResult::pass()
        } else {
            CheckResult::pending(pending)
        }
    }
}

/// Migration identifiers shipped with the build: one per child directory of
/// `dir`, sorted (names are timestamp-prefixed).
pub fn expected_migrations(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut ids = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            ids.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    ids.sort();
    Ok(ids)
}
