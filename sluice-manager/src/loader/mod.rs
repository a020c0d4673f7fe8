//! Stream configuration loading from the filesystem.
//!
//! # Example
//!
//! ```ignore
//! use sluice_manager::loader::load_directory;
//!
//! let load = load_directory("./streams");
//! for (id, config) in &load.streams {
//!     println!("{}: {} -> {}", id, config.input.kind, config.output.kind);
//! }
//! let streams = load.into_result()?;
//! ```

mod directory;

pub use directory::{CONFIG_EXTENSIONS, DirectoryLoad, DirectoryLoader, ID_SEPARATOR, load_directory};
