//! Low-level streaming download mechanics

use super::{TransferProgress, TransferProgressFn};
use crate::client::map_reqwest_error;
use arcade_errors::Error;
use futures::StreamExt;
use std::path::Path;
use tokio::fs::{self as tokio_fs, File};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

/// Remove a stale file at `dest` and make sure its parent exists
pub(super) async fn prepare_destination(dest: &Path) -> Result<(), Error> {
    match tokio_fs::remove_file(dest).await {
        Ok(()) => tracing::debug!(path = %dest.display(), "removed stale download"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io_with_path(&e, dest)),
    }

    if let Some(parent) = dest.parent() {
        tokio_fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io_with_path(&e, parent))?;
    }
    Ok(())
}

/// Write the response body to `dest`, reporting each chunk
pub(super) async fn stream_to_file(
    response: reqwest::Response,
    dest: &Path,
    progress: &TransferProgressFn,
    cancel: &CancellationToken,
) -> Result<u64, Error> {
    let total = response.content_length().unwrap_or(0);
    let mut file = File::create(dest)
        .await
        .map_err(|e| Error::io_with_path(&e, dest))?;
    let mut stream = response.bytes_stream();
    let mut received = 0u64;

    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                if let Err(e) = file.flush().await {
                    tracing::warn!(path = %dest.display(), error = %e, "failed to flush partial download");
                }
                return Err(Error::Cancelled);
            }
            next = stream.next() => next,
        };

        let Some(chunk) = next else { break };
        let chunk = chunk.map_err(|e| map_reqwest_error(&e))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| Error::io_with_path(&e, dest))?;

        received += chunk.len() as u64;
        progress(TransferProgress { received, total });
    }

    file.flush()
        .await
        .map_err(|e| Error::io_with_path(&e, dest))?;
    Ok(received)
}
