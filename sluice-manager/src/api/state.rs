//! Shared application state for API handlers.

use crate::manager::StreamManager;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared application state passed to all handlers.
pub struct AppState {
    /// The stream registry.
    pub manager: Arc<StreamManager>,
    /// Server start time.
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state.
    pub fn new(manager: Arc<StreamManager>) -> Self {
        Self {
            manager,
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Bound applied to each lifecycle operation issued through the API.
    pub fn operation_timeout(&self) -> Duration {
        self.manager.config().operation_timeout
    }
}
