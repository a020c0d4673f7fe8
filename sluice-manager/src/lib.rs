//! Sluice Manager - stream lifecycle registry.
//!
//! This crate provides the runtime side of sluice:
//! - Stream registry with bounded create/read/update/delete/reconcile
//! - Directory loader turning a tree of config files into streams
//! - Idle reference runtime
//! - HTTP API for stream management
//! - Tracing setup

#![warn(missing_docs)]

pub mod api;
pub mod loader;
pub mod manager;
pub mod observability;
pub mod runtime;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::api::{ApiError, ApiServer, AppState, Format, ServerConfig};
    pub use crate::loader::{DirectoryLoad, DirectoryLoader, load_directory};
    pub use crate::manager::{StreamManager, StreamStatus, StreamSummary, format_uptime};
    pub use crate::observability::{LogFormat, TracingConfig, TracingGuard, init_tracing};
    pub use crate::runtime::{IdleRuntime, IdleStream};
    pub use sluice_core::prelude::*;
}
