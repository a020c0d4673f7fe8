//! Prelude for convenient imports.
//!
//! # Example
//!
//! ```ignore
//! use sluice_core::prelude::*;
//! ```

// Error handling
pub use crate::error::{Operation, Result, StreamError};

// Configuration
pub use crate::config::{ComponentConfig, ManagerConfig, PipelineSection, StreamConfig, StreamMap};

// Traits
pub use crate::traits::{BuildFuture, RuntimeFuture, StreamHandle, StreamRuntime};
