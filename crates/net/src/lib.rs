#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for the arcade launcher
//!
//! This crate handles all HTTP operations: catalog fetching with retries and
//! single-attempt streaming archive downloads with cancellation.

mod client;
mod download;

pub use client::{NetClient, NetConfig};
pub use download::{
    filename_from_url, Downloader, FileTransfer, TransferProgress, TransferProgressFn,
};

use arcade_errors::{Error, NetworkError};
use arcade_events::{EventEmitter, EventSender};

/// Fetch text content from a URL
///
/// # Errors
///
/// Returns an error if the HTTP request fails, the server returns an error status,
/// or the response body cannot be decoded as text.
pub async fn fetch_text(client: &NetClient, url: &str, tx: &EventSender) -> Result<String, Error> {
    tx.emit_debug(format!("Fetching text from {url}"));

    download::validation::validate_url(url)?;
    let response = client.get(url).await?;
    download::validation::validate_response(&response)?;

    response
        .text()
        .await
        .map_err(|e| NetworkError::DownloadFailed(e.to_string()).into())
}
