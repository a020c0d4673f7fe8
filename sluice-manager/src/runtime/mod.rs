//! In-process stream runtimes.
//!
//! The registry only depends on the [`StreamRuntime`](sluice_core::StreamRuntime)
//! trait. [`IdleRuntime`] is the reference implementation used when no
//! processing engine is plugged in: its streams own a background task
//! and report lifecycle state but move no data.

mod idle;

pub use idle::{IdleRuntime, IdleStream};
