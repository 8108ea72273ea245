//! Error types for skycast-store.

use std::path::PathBuf;

/// Result type for skycast-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in skycast-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing the history file failed.
    #[error("History file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create the history directory.
    #[error("Failed to create history directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The history file is not a JSON array of records.
    #[error("History file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
