//! Stream lifecycle registry.
//!
//! [`StreamManager`] owns every running stream in the process. All access
//! to its table goes through one async mutex: mutations hold it for their
//! whole bounded duration, reads hold it only long enough to copy a
//! snapshot.

mod registry;
mod snapshot;

pub use registry::StreamManager;
pub use snapshot::{StreamStatus, StreamSummary, format_uptime};
