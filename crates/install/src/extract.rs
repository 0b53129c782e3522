//! Zip archive extraction

use arcade_errors::{Error, InstallError};
use async_trait::async_trait;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tokio::task;
use tokio_util::sync::CancellationToken;

/// Progress sink invoked as `(entries_done, entry_count)`, counting from 1
pub type ExtractProgressFn = dyn Fn(u64, u64) + Send + Sync;

const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// Selects which archive entries are unpacked, by entry name
///
/// Symbolic links are never unpacked, whatever the filter says.
#[derive(Clone)]
pub struct EntryFilter(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl EntryFilter {
    pub fn new(accept: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(accept))
    }

    /// Accept every regular file and directory
    #[must_use]
    pub fn all() -> Self {
        Self::new(|_| true)
    }

    #[must_use]
    pub fn accepts(&self, name: &str) -> bool {
        (self.0)(name)
    }
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl std::fmt::Debug for EntryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EntryFilter(..)")
    }
}

/// Unpacks a downloaded archive into an install directory
#[async_trait]
pub trait ArchiveExtractor: Send + Sync {
    /// Extract `archive` into `dest_dir`, returning the number of entries written
    ///
    /// The archive itself is left in place. When `cancel` fires before an
    /// entry is started, `Error::Cancelled` is returned and whatever was
    /// already written stays for the caller to purge.
    async fn extract(
        &self,
        archive: &Path,
        dest_dir: &Path,
        filter: EntryFilter,
        progress: Arc<ExtractProgressFn>,
        cancel: &CancellationToken,
    ) -> Result<u64, Error>;
}

/// `ArchiveExtractor` for zip files, run on the blocking pool
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipExtractor;

#[async_trait]
impl ArchiveExtractor for ZipExtractor {
    async fn extract(
        &self,
        archive: &Path,
        dest_dir: &Path,
        filter: EntryFilter,
        progress: Arc<ExtractProgressFn>,
        cancel: &CancellationToken,
    ) -> Result<u64, Error> {
        let archive = archive.to_path_buf();
        let dest_dir = dest_dir.to_path_buf();
        let cancel = cancel.clone();

        task::spawn_blocking(move || {
            extract_zip(&archive, &dest_dir, &filter, progress.as_ref(), &cancel)
        })
        .await
        .map_err(|e| InstallError::TaskError {
            message: format!("extraction task failed: {e}"),
        })?
    }
}

fn failed(message: String) -> Error {
    InstallError::ExtractionFailed { message }.into()
}

fn is_symlink(mode: Option<u32>) -> bool {
    mode.is_some_and(|mode| mode & S_IFMT == S_IFLNK)
}

fn extract_zip(
    archive_path: &Path,
    dest_dir: &Path,
    filter: &EntryFilter,
    progress: &ExtractProgressFn,
    cancel: &CancellationToken,
) -> Result<u64, Error> {
    let file =
        File::open(archive_path).map_err(|e| failed(format!("failed to open archive: {e}")))?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| failed(format!("failed to read zip archive: {e}")))?;

    std::fs::create_dir_all(dest_dir)
        .map_err(|e| failed(format!("failed to create {}: {e}", dest_dir.display())))?;

    let count = archive.len() as u64;
    let mut written = 0u64;

    for i in 0..archive.len() {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let mut entry = archive
            .by_index(i)
            .map_err(|e| failed(format!("failed to read zip entry: {e}")))?;

        let outpath = match entry.enclosed_name() {
            Some(path) if !is_symlink(entry.unix_mode()) && filter.accepts(entry.name()) => {
                dest_dir.join(path)
            }
            Some(_) => {
                tracing::trace!(entry = entry.name(), "entry filtered");
                progress(i as u64 + 1, count);
                continue;
            }
            None => {
                tracing::warn!(entry = entry.name(), "skipping entry with unsafe path");
                progress(i as u64 + 1, count);
                continue;
            }
        };

        if entry.is_dir() {
            create_dir(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                create_dir(parent)?;
            }
            let mut outfile = File::create(&outpath)
                .map_err(|e| failed(format!("failed to create {}: {e}", outpath.display())))?;
            std::io::copy(&mut entry, &mut outfile)
                .map_err(|e| failed(format!("failed to extract {}: {e}", entry.name())))?;
        }

        // Set permissions on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                if let Err(e) = std::fs::set_permissions(
                    &outpath,
                    std::fs::Permissions::from_mode(mode & 0o7777),
                ) {
                    tracing::warn!(path = %outpath.display(), mode, error = %e, "failed to restore permissions");
                }
            }
        }

        written += 1;
        progress(i as u64 + 1, count);
    }

    Ok(written)
}

fn create_dir(path: &Path) -> Result<(), Error> {
    std::fs::create_dir_all(path)
        .map_err(|e| failed(format!("failed to create directory {}: {e}", path.display())))
}
