//! Download error types

/// Errors from one CSV download attempt.
///
/// Any variant raised after the temporary file was created implies the
/// temporary file has already been removed.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The server answered 404: the job or the requested
    /// group/metric/level combination does not exist.
    #[error(
        "job '{job_id}' or the requested group/metric/level combination was not found on the server"
    )]
    NotFound { job_id: String },

    /// The server answered with a status other than 200 or 404.
    #[error("server returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// No response at all (DNS, connect, timeout, broken stream).
    #[error("network error during download: {0}")]
    Network(#[from] reqwest::Error),

    /// Writing or promoting the downloaded file failed.
    #[error("i/o error while writing download: {0}")]
    Io(#[from] std::io::Error),
}
