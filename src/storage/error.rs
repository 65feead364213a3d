//! Storage error types.

use thiserror::Error;

/// Errors raised by key-value store adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O error for key '{key}': {source}")]
    Io {
        /// Key being accessed
        key: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The value could not be encoded or decoded.
    #[error("failed to serialize value: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backend refused the operation.
    #[error("storage backend '{backend}' unavailable: {reason}")]
    Unavailable {
        /// Adapter name
        backend: String,
        /// Reason reported by the backend
        reason: String,
    },
}

impl StorageError {
    /// Creates an `Unavailable` error.
    pub fn unavailable(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if retrying later may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Unavailable { .. })
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Io { .. } => "check free disk space and permissions on the data directory",
            Self::Serialization(_) => "the stored record is corrupt and will be replaced",
            Self::Unavailable { .. } => "the write will be retried after the next change",
        }
    }
}
