//! Core traits for sluice components.
//!
//! - `StreamRuntime`: builds streams from configurations
//! - `StreamHandle`: a built stream the registry starts and stops

mod runtime;

pub use runtime::{BuildFuture, RuntimeFuture, StreamHandle, StreamRuntime};
