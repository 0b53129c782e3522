//! Streaming archive downloads
//!
//! A download is a single attempt: failures are reported to the caller,
//! which decides whether the user sees an error. Progress is reported per
//! received chunk and cancellation is observed between chunks.

mod stream;
pub(crate) mod validation;

use crate::client::NetClient;
use arcade_errors::Error;
use async_trait::async_trait;
use std::path::Path;
use tokio_util::sync::CancellationToken;

pub use validation::filename_from_url;

/// Byte counters reported while a transfer runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub received: u64,
    /// From `Content-Length`; 0 when the server did not send one
    pub total: u64,
}

/// Progress sink invoked once per received chunk
pub type TransferProgressFn = dyn Fn(TransferProgress) + Send + Sync;

/// Fetches a remote file onto local disk
#[async_trait]
pub trait FileTransfer: Send + Sync {
    /// Download `url` to `dest`, replacing any file already there
    ///
    /// Returns the number of bytes written. When `cancel` fires the partial
    /// file is left in place and `Error::Cancelled` is returned.
    async fn download(
        &self,
        url: &str,
        dest: &Path,
        progress: &TransferProgressFn,
        cancel: &CancellationToken,
    ) -> Result<u64, Error>;
}

/// `FileTransfer` over HTTP(S)
#[derive(Clone)]
pub struct Downloader {
    client: NetClient,
}

impl Downloader {
    #[must_use]
    pub fn new(client: NetClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FileTransfer for Downloader {
    async fn download(
        &self,
        url: &str,
        dest: &Path,
        progress: &TransferProgressFn,
        cancel: &CancellationToken,
    ) -> Result<u64, Error> {
        validation::validate_url(url)?;
        stream::prepare_destination(dest).await?;

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(Error::Cancelled),
            response = self.client.get_once(url) => response?,
        };
        validation::validate_response(&response)?;

        tracing::debug!(url, dest = %dest.display(), "download started");
        let received = stream::stream_to_file(response, dest, progress, cancel).await?;
        tracing::debug!(url, received, "download finished");
        Ok(received)
    }
}
