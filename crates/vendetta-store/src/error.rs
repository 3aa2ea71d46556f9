//! Error types for the durable store layer.
//!
//! Persistence is best-effort: callers log a [`StoreError`] and carry on
//! with the in-memory state as the authority. Nothing in this crate
//! retries.

use std::path::PathBuf;

/// Errors that can occur in the store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A file read, write, or rename failed.
    #[error("store file I/O failed for {path}: {source}")]
    Io {
        /// The store file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl StoreError {
    /// Wrap an I/O error with the store file it concerns.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
