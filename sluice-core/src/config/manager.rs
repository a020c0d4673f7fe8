//! Registry configuration.

use std::time::Duration;

/// Default bound on a single lifecycle operation.
const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 5_000;

/// Default bound on reclaiming a stream whose start was abandoned.
const DEFAULT_RECLAIM_GRACE_MS: u64 = 1_000;

/// Configuration for the stream registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Maximum duration of a create, update, delete or reconcile.
    pub operation_timeout: Duration,
    /// How long a background stop may take after a start timed out.
    pub reclaim_grace: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            operation_timeout: Duration::from_millis(DEFAULT_OPERATION_TIMEOUT_MS),
            reclaim_grace: Duration::from_millis(DEFAULT_RECLAIM_GRACE_MS),
        }
    }
}

impl ManagerConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `SLUICE_OPERATION_TIMEOUT_MS`: Bound on each lifecycle operation
    /// - `SLUICE_RECLAIM_GRACE_MS`: Bound on background cleanup of abandoned starts
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let operation_timeout_ms = std::env::var("SLUICE_OPERATION_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_OPERATION_TIMEOUT_MS);

        let reclaim_grace_ms = std::env::var("SLUICE_RECLAIM_GRACE_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RECLAIM_GRACE_MS);

        Self {
            operation_timeout: Duration::from_millis(operation_timeout_ms),
            reclaim_grace: Duration::from_millis(reclaim_grace_ms),
        }
    }

    /// Create configuration from environment variables, or use defaults.
    pub fn from_env_or_default() -> Self {
        Self::from_env()
    }

    /// Set the operation timeout.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Set the reclaim grace period.
    pub fn with_reclaim_grace(mut self, grace: Duration) -> Self {
        self.reclaim_grace = grace;
        self
    }
}
