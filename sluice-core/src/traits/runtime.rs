//! Runtime collaborator contract.
//!
//! The registry never moves data itself. It asks a [`StreamRuntime`] to turn
//! a [`StreamConfig`] into a [`StreamHandle`], then drives that handle
//! through start and stop. Deadlines are passed down so a cooperative
//! runtime can give up early; the registry enforces them regardless.

use crate::config::StreamConfig;
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::time::Instant;

/// Boxed async result for start and stop.
pub type RuntimeFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Boxed async result for building a stream.
pub type BuildFuture<'a> = Pin<Box<dyn Future<Output = Result<Arc<dyn StreamHandle>>> + Send + 'a>>;

/// A constructed stream.
pub trait StreamHandle: Send + Sync {
    /// Begin processing. Must resolve by `deadline`.
    fn start(&self, deadline: Instant) -> RuntimeFuture<'_>;

    /// Stop processing and release resources. Must resolve by `deadline`.
    fn stop(&self, deadline: Instant) -> RuntimeFuture<'_>;

    /// Whether the stream is currently running.
    fn is_active(&self) -> bool;

    /// When the stream last started, if it has.
    fn started_at(&self) -> Option<DateTime<Utc>>;

    /// The configuration the stream was built from.
    fn config(&self) -> &StreamConfig;
}

/// Builds streams from configurations.
pub trait StreamRuntime: Send + Sync {
    /// Construct, but do not start, a stream.
    ///
    /// Returns `StreamError::Construction` when the configuration cannot be
    /// run.
    fn build<'a>(&'a self, id: &'a str, config: StreamConfig) -> BuildFuture<'a>;
}
