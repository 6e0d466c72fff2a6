//! Atomic CSV download.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::auth::AccessToken;
use crate::error::DownloadError;
use crate::request::DownloadRequest;

/// Timeout for the whole export request, body included.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Suffix of the in-progress sibling file.
const PART_SUFFIX: &str = "part";

/// How much of an unexpected response body is surfaced in the error.
const BODY_PREVIEW_LEN: usize = 200;

/// Outcome of one download attempt.
#[derive(Debug)]
pub struct DownloadResult {
    /// HTTP status of the export request.
    pub status_code: u16,
    /// Absolute path of the written CSV, on success.
    pub body_path: Option<PathBuf>,
}

/// Performs the authenticated CSV export request and writes the payload
/// to disk.
///
/// The body is streamed into a `.part` sibling of the final path and
/// promoted with an atomic rename only once it is complete, so other
/// processes watching the output directory either see the finished file
/// or nothing. One attempt per run; no retries at this layer.
#[derive(Debug, Clone, Default)]
pub struct Downloader {
    http_client: reqwest::Client,
}

impl Downloader {
    /// Creates a downloader with a fresh HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Downloads `request` into `output_dir` under the request's file
    /// name.
    ///
    /// - 200: payload streamed, renamed into place, absolute path
    ///   returned
    /// - 404: [`DownloadError::NotFound`] (bad job/group/metric
    ///   combination, not transient)
    /// - other status: [`DownloadError::UnexpectedStatus`] with a body
    ///   preview
    /// - no response: [`DownloadError::Network`]
    ///
    /// On every failure path the temporary file is removed; the final
    /// name is never left pointing at partial data.
    pub async fn download(
        &self,
        request: &DownloadRequest,
        token: &AccessToken,
        output_dir: &Path,
    ) -> Result<DownloadResult, DownloadError> {
        let response = self
            .http_client
            .get(&request.url)
            .header(reqwest::header::ACCEPT, "text/csv")
            .bearer_auth(&token.access_token)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        match status {
            reqwest::StatusCode::OK => {}
            reqwest::StatusCode::NOT_FOUND => {
                return Err(DownloadError::NotFound {
                    job_id: request.job_id.clone(),
                });
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                return Err(DownloadError::UnexpectedStatus {
                    status: status.as_u16(),
                    body: preview(&body),
                });
            }
        }

        let final_path = output_dir.join(&request.file_name);
        let part_path = final_path.with_file_name(format!("{}.{PART_SUFFIX}", request.file_name));

        debug!("streaming export to {}", part_path.display());
        if let Err(err) = write_body(response, &part_path).await {
            discard(&part_path).await;
            return Err(err);
        }

        if let Err(err) = tokio::fs::rename(&part_path, &final_path).await {
            discard(&part_path).await;
            return Err(err.into());
        }

        let absolute = tokio::fs::canonicalize(&final_path).await?;
        Ok(DownloadResult {
            status_code: status.as_u16(),
            body_path: Some(absolute),
        })
    }
}

/// Streams the response body into `part_path` and makes it durable.
async fn write_body(response: reqwest::Response, part_path: &Path) -> Result<(), DownloadError> {
    let mut file = tokio::fs::File::create(part_path).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.sync_all().await?;
    Ok(())
}

/// Best-effort removal of a half-written temporary file.
async fn discard(part_path: &Path) {
    if let Err(err) = tokio::fs::remove_file(part_path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            debug!("could not remove {}: {err}", part_path.display());
        }
    }
}

fn preview(body: &str) -> String {
    let mut end = BODY_PREVIEW_LEN.min(body.len());
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}
