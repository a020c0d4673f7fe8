//! Sluice Core Library
//!
//! Foundational types shared by the sluice stream registry, its directory
//! loader and its HTTP API.
//!
//! # Key Components
//!
//! - **Config**: the stream configuration schema and its default-filling pass
//! - **Error**: coded error taxonomy used across every crate
//! - **Traits**: the runtime contract the registry drives
//!
//! # Example
//!
//! ```ignore
//! use sluice_core::prelude::*;
//!
//! let config = StreamConfig::from_document(r#"{"input": {"type": "kafka"}}"#)?;
//! assert_eq!(config.output.kind, "stdout");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod prelude;
pub mod traits;

// Re-export key types at crate root for convenience
pub use config::{ComponentConfig, ManagerConfig, StreamConfig, StreamMap};
pub use error::{Operation, Result, StreamError};
pub use traits::{StreamHandle, StreamRuntime};
