//! Token cache error types

use std::path::PathBuf;

/// Errors from the token cache file.
///
/// These are advisory for the overall run: a failed cache write is logged
/// and the in-memory token is used anyway.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The cache file exists but could not be read.
    #[error("failed to read token cache {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The cache file could not be written or promoted into place.
    #[error("failed to write token cache {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
