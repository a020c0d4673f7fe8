//! Logging setup for sluice.
//!
//! Logging format is controlled via `SLUICE_LOG_FORMAT`:
//! - `json` - Structured JSON output (for ELK/Loki)
//! - `pretty` - Human-readable multi-line output
//! - `compact` - Compact single-line format
//!
//! The filter comes from `SLUICE_LOG_LEVEL`, falling back to `RUST_LOG`.
//!
//! # Example
//!
//! ```ignore
//! use sluice_manager::observability::{TracingConfig, init_tracing};
//!
//! let _guard = init_tracing(TracingConfig::from_env_or_filter("info"))?;
//! ```

mod config;
mod tracing_setup;

pub use config::{LogFormat, TracingConfig, TracingConfigBuilder};
pub use tracing_setup::{TracingGuard, init_tracing};
