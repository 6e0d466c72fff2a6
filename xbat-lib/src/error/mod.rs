//! Error types

mod auth;
mod download;
mod store;
mod validation;

pub use auth::*;
pub use download::*;
pub use store::*;
pub use validation::*;

/// Umbrella error for a whole export run.
///
/// The binary propagates this; library components return the per-concern
/// error types directly.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The selector failed validation before any network call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The token exchange failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The CSV download failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The token cache could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),
}
