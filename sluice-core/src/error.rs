//! Error types for sluice.
//!
//! Every variant carries the identifier or path it concerns and a stable
//! code, so failures surfacing at the HTTP boundary or in logs can be
//! matched without parsing messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for stream registry operations.
#[derive(Error, Debug)]
pub enum StreamError {
    // =========================================================================
    // Registry Errors (E500-E599)
    // =========================================================================
    /// The target stream is not registered.
    #[error("E501: Stream '{id}' not found")]
    NotFound {
        /// The stream identifier.
        id: String,
    },

    /// A stream with this identifier is already registered.
    #[error("E502: Stream '{id}' already exists")]
    Conflict {
        /// The stream identifier.
        id: String,
    },

    /// The request could not be understood.
    #[error("E503: Bad request: {cause}")]
    BadRequest {
        /// What was wrong with the request.
        cause: String,
    },

    /// An operation did not complete before its deadline.
    #[error("E504: {operation} of stream '{id}' timed out after {timeout_ms}ms")]
    Timeout {
        /// The stream identifier.
        id: String,
        /// The lifecycle step that timed out.
        operation: Operation,
        /// The configured bound in milliseconds.
        timeout_ms: u64,
    },

    /// The runtime rejected a configuration or failed to start it.
    #[error("E505: Failed to construct stream '{id}': {cause}")]
    Construction {
        /// The stream identifier.
        id: String,
        /// Underlying cause reported by the runtime.
        cause: String,
    },

    /// The runtime failed to stop a stream.
    #[error("E506: Failed to stop stream '{id}': {cause}")]
    Teardown {
        /// The stream identifier.
        id: String,
        /// Underlying cause reported by the runtime.
        cause: String,
    },

    /// One or more streams failed during a bulk reconciliation.
    #[error("E507: Reconciliation failed for {} stream(s): {}", .failures.len(), summarize(.failures))]
    Reconcile {
        /// Each failing stream identifier with its error.
        failures: Vec<(String, StreamError)>,
    },

    // =========================================================================
    // Configuration Errors (E800-E899)
    // =========================================================================
    /// A structured document could not be decoded.
    #[error("E801: Failed to decode {}: {cause}", describe_source(.path))]
    Decode {
        /// The file being decoded, if the document came from disk.
        path: Option<PathBuf>,
        /// Decoder message.
        cause: String,
    },

    /// A decoded configuration holds an invalid value.
    #[error("E802: Invalid config value for '{field}': {cause}")]
    InvalidConfig {
        /// Dotted path of the offending field.
        field: String,
        /// Why the value is invalid.
        cause: String,
    },

    /// Two configuration files resolve to the same stream identifier.
    #[error("E803: Stream id ({id}) collision from file: {}", .path.display())]
    Collision {
        /// The colliding identifier.
        id: String,
        /// The second file that produced it.
        path: PathBuf,
    },

    // =========================================================================
    // I/O Errors (E900-E999)
    // =========================================================================
    /// Filesystem error.
    #[error("E901: I/O error at {}: {cause}", .path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error message.
        cause: String,
    },

    /// Network error.
    #[error("E902: Network error: {cause}")]
    Network {
        /// The underlying error message.
        cause: String,
    },
}

/// Lifecycle step named in timeout errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Waiting for the registry lock.
    Lock,
    /// Building a stream from its configuration.
    Build,
    /// Starting a built stream.
    Start,
    /// Stopping a running stream.
    Stop,
}

impl Operation {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lock => "lock",
            Self::Build => "build",
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn summarize(failures: &[(String, StreamError)]) -> String {
    failures
        .iter()
        .map(|(id, e)| format!("{}: {}", id, e))
        .collect::<Vec<_>>()
        .join("; ")
}

fn describe_source(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => format!("'{}'", p.display()),
        None => "document".to_string(),
    }
}

impl StreamError {
    /// Get the error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "E501",
            Self::Conflict { .. } => "E502",
            Self::BadRequest { .. } => "E503",
            Self::Timeout { .. } => "E504",
            Self::Construction { .. } => "E505",
            Self::Teardown { .. } => "E506",
            Self::Reconcile { .. } => "E507",
            Self::Decode { .. } => "E801",
            Self::InvalidConfig { .. } => "E802",
            Self::Collision { .. } => "E803",
            Self::Io { .. } => "E901",
            Self::Network { .. } => "E902",
        }
    }

    /// Build a bad request error.
    pub fn bad_request(cause: impl Into<String>) -> Self {
        Self::BadRequest {
            cause: cause.into(),
        }
    }

    /// Check if this error means the target stream is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a deadline expiry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Check if the caller supplied something invalid, as opposed to the
    /// runtime failing.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::Conflict { .. }
                | Self::BadRequest { .. }
                | Self::Decode { .. }
                | Self::InvalidConfig { .. }
                | Self::Collision { .. }
        )
    }
}

/// Result type alias using `StreamError`.
pub type Result<T> = std::result::Result<T, StreamError>;
