//! Directory configuration loader.

use sluice_core::error::{Result, StreamError};
use sluice_core::{StreamConfig, StreamMap};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// File extensions recognized as stream configurations.
pub const CONFIG_EXTENSIONS: &[&str] = &["yaml", "json"];

/// Character joining path components into a stream identifier.
pub const ID_SEPARATOR: &str = "_";

/// Outcome of scanning a directory.
///
/// Holds every stream decoded before the walk stopped, plus the error
/// that stopped it, if any.
#[derive(Debug, Default)]
pub struct DirectoryLoad {
    /// Streams discovered, by identifier.
    pub streams: StreamMap,
    /// The first error encountered.
    pub error: Option<StreamError>,
}

impl DirectoryLoad {
    /// Convert into a result, discarding partial output on error.
    pub fn into_result(self) -> Result<StreamMap> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.streams),
        }
    }

    /// Check if the walk completed without error.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Loads stream configurations from a directory tree.
///
/// Every regular file ending in `.yaml` or `.json` becomes one stream. Its
/// identifier is the path relative to the root with separators replaced by
/// `_` and the extension dropped, so `a/b.yaml` becomes `a_b`.
///
/// # Example
///
/// ```ignore
/// use sluice_manager::loader::DirectoryLoader;
///
/// let streams = DirectoryLoader::new("./streams").load().into_result()?;
/// manager.set_all(streams, timeout).await?;
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    /// Create a loader rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree and decode every configuration file.
    ///
    /// A missing root, or a root that is not a directory, yields an empty
    /// mapping. The walk stops at the first identifier collision, read
    /// error or decode error.
    pub fn load(&self) -> DirectoryLoad {
        let mut load = DirectoryLoad::default();

        match std::fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                tracing::debug!(
                    path = %self.root.display(),
                    "Streams path is not a directory, nothing to load"
                );
                return load;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(
                    path = %self.root.display(),
                    "Streams directory does not exist, nothing to load"
                );
                return load;
            }
            Err(e) => {
                load.error = Some(StreamError::Io {
                    path: self.root.clone(),
                    cause: e.to_string(),
                });
                return load;
            }
        }

        if let Err(e) = self.walk(&mut load.streams) {
            tracing::warn!(path = %self.root.display(), error = %e, "Failed to load streams");
            load.error = Some(e);
            return load;
        }

        tracing::info!(
            path = %self.root.display(),
            streams = load.streams.len(),
            "Loaded stream configurations"
        );
        load
    }

    fn walk(&self, streams: &mut StreamMap) -> Result<()> {
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| StreamError::Io {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone()),
                cause: e.to_string(),
            })?;

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }

            let path = entry.path();
            let Some(id) = self.stream_id(path) else {
                continue;
            };

            // Mounted config volumes expose files as symlinks.
            if file_type.is_symlink() {
                let target = std::fs::metadata(path).map_err(|e| StreamError::Io {
                    path: path.to_path_buf(),
                    cause: e.to_string(),
                })?;
                if target.is_dir() {
                    continue;
                }
            }

            if streams.contains_key(&id) {
                return Err(StreamError::Collision {
                    id,
                    path: path.to_path_buf(),
                });
            }

            let config = StreamConfig::from_file(path)?;
            tracing::debug!(stream_id = %id, path = %path.display(), "Discovered stream");
            streams.insert(id, config);
        }

        Ok(())
    }

    /// Derive the identifier for a file, or `None` if it is not a
    /// recognized configuration file.
    pub fn stream_id(&self, path: &Path) -> Option<String> {
        let extension = path.extension()?.to_str()?;
        if !CONFIG_EXTENSIONS.contains(&extension) {
            return None;
        }

        let relative = path.strip_prefix(&self.root).ok()?.with_extension("");
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        if parts.is_empty() {
            return None;
        }
        Some(parts.join(ID_SEPARATOR))
    }
}

/// Load every stream configuration under `root`.
pub fn load_directory(root: impl AsRef<Path>) -> DirectoryLoad {
    DirectoryLoader::new(root).load()
}
