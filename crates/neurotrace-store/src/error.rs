//! Error types for neurotrace-store.

use std::path::PathBuf;

/// Result type for neurotrace-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in neurotrace-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The archive backend (or the requested codec) is not available.
    #[error("Archive backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Failed to create an output directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The archive on disk is malformed or the record to write is inconsistent.
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    /// A codec failed to encode or decode a chunk.
    #[error("{codec} codec error: {source}")]
    Codec {
        codec: &'static str,
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Create `path` and its parents, mapping failures to [`Error::CreateDirectory`].
pub(crate) fn create_dir_all(path: &std::path::Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| Error::CreateDirectory {
        path: path.to_path_buf(),
        source: e,
    })
}
