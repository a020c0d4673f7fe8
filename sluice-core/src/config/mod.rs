//! Configuration types.
//!
//! - [`StreamConfig`]: what a single stream runs, decoded from YAML or JSON
//! - [`ManagerConfig`]: how the registry bounds lifecycle operations

mod manager;
mod stream;

pub use manager::ManagerConfig;
pub use stream::{
    ComponentConfig, DEFAULT_BUFFER, DEFAULT_INPUT, DEFAULT_OUTPUT, DEFAULT_THREADS,
    PipelineSection, StreamConfig, StreamMap,
};
