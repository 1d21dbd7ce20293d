//! Readiness report types.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::timefmt::now_iso8601;

/// Outcome of a single readiness check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Whether the check passed.
    pub ok: bool,
    /// Number of unapplied migrations (backlog check only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<usize>,
    /// Failure detail for the operator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckResult {
    /// Create a passing check.
    pub fn pass() -> Self {
        Self {
            ok: true,
            pending: None,
            detail: None,
        }
    }

    /// Create a failing check with a detail message.
    pub fn fail(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            pending: None,
            detail: Some(detail.into()),
        }
    }

    /// Create a failing check reporting a migration backlog.
    pub fn pending(count: usize) -> Self {
        Self {
            ok: false,
            pending: Some(count),
            detail: None,
        }
    }
}

/// Aggregated readiness report, built fresh on every probe invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    /// True only when every check passed.
    pub ok: bool,
    /// Individual check results, keyed by check name.
    pub checks: BTreeMap<String, CheckResult>,
    /// ISO 8601 timestamp of the probe invocation.
    pub timestamp: String,
}

impl ReadinessReport {
    /// Build a report from check results.
    ///
    /// `ok` is the conjunction of the individual outcomes and cannot be set
    /// independently.
    pub fn from_checks(checks: BTreeMap<String, CheckResult>) -> Self {
        let ok = checks.values().all(|c| c.ok);
        Self {
            ok,
            checks,
            timestamp: now_iso8601(),
        }
    }
}
