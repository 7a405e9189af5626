//! Repository error types.

use std::path::PathBuf;

use census_model::PersonId;
use thiserror::Error;

/// Repository operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File I/O error.
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No record with this id exists.
    #[error("person not found: {id}")]
    NotFound { id: PersonId },

    /// A record with this id already exists.
    #[error("person already exists: {id}")]
    AlreadyExists { id: PersonId },

    /// Record could not be serialized.
    #[error("failed to serialize record")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Stored document could not be read back as a record.
    #[error("failed to deserialize record at {path}")]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("failed to complete write to {target_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A blocking storage task failed to complete.
    #[error("storage task failed")]
    TaskJoin {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, StoreError>;
