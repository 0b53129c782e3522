//! Executable discovery and process supervision

use crate::process::PlatformCommand;
use arcade_errors::{Error, PlatformError};
use arcade_types::Platform;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Child;

/// First entry of `install_dir`, by file name, whose extension marks it launchable
///
/// Only immediate entries are considered; `.app` bundles are directories.
///
/// # Errors
///
/// Returns `PlatformError::ExecutableNotFound` if nothing matches or the
/// directory cannot be read.
pub async fn find_executable(install_dir: &Path, platform: Platform) -> Result<PathBuf, Error> {
    let extension = platform.executable_extension();
    let not_found = || -> Error {
        PlatformError::ExecutableNotFound {
            dir: install_dir.display().to_string(),
            extension: extension.to_string(),
        }
        .into()
    };

    let mut entries = tokio::fs::read_dir(install_dir)
        .await
        .map_err(|_| not_found())?;
    let mut candidates = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extension.strip_prefix('.') == Some(ext));
        if matches {
            candidates.push(path);
        }
    }

    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    if candidates.len() > 1 {
        tracing::debug!(count = candidates.len(), dir = %install_dir.display(), "several launchable entries, using the first");
    }
    candidates.into_iter().next().ok_or_else(not_found)
}

/// A started title
#[async_trait]
pub trait LaunchedProcess: Send {
    /// Wait for the process to exit, yielding its code when it has one
    async fn wait(&mut self) -> Result<Option<i32>, Error>;

    /// Terminate the process if it is still running
    async fn kill(&mut self) -> Result<(), Error>;
}

/// Starts installed titles
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Start the launchable entry in `install_dir` with `argument`
    async fn launch(
        &self,
        install_dir: &Path,
        argument: &str,
    ) -> Result<Box<dyn LaunchedProcess>, Error>;
}

/// `ProcessLauncher` using the host's native invocation
#[derive(Debug, Clone, Copy)]
pub struct NativeLauncher {
    platform: Platform,
}

impl NativeLauncher {
    #[must_use]
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }
}

impl Default for NativeLauncher {
    fn default() -> Self {
        Self::new(Platform::current())
    }
}

#[async_trait]
impl ProcessLauncher for NativeLauncher {
    async fn launch(
        &self,
        install_dir: &Path,
        argument: &str,
    ) -> Result<Box<dyn LaunchedProcess>, Error> {
        let executable = find_executable(install_dir, self.platform).await?;
        let file_name = executable
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| PlatformError::ExecutableNotFound {
                dir: install_dir.display().to_string(),
                extension: self.platform.executable_extension().to_string(),
            })?;

        let command = PlatformCommand::launch(self.platform, install_dir, file_name, argument);
        tracing::info!(command = %command, dir = %install_dir.display(), "launching title");

        let child =
            command
                .to_command()
                .spawn()
                .map_err(|e| PlatformError::ProcessExecutionFailed {
                    command: command.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Box::new(NativeProcess {
            child,
            command: command.to_string(),
        }))
    }
}

/// A child process started by [`NativeLauncher`]
pub struct NativeProcess {
    child: Child,
    command: String,
}

#[async_trait]
impl LaunchedProcess for NativeProcess {
    async fn wait(&mut self) -> Result<Option<i32>, Error> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|e| PlatformError::ProcessExecutionFailed {
                command: self.command.clone(),
                message: e.to_string(),
            })?;
        tracing::debug!(command = %self.command, %status, "title exited");
        Ok(status.code())
    }

    async fn kill(&mut self) -> Result<(), Error> {
        // already exited
        if let Ok(Some(_)) = self.child.try_wait() {
            return Ok(());
        }
        match self.child.kill().await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(PlatformError::ProcessExecutionFailed {
                command: self.command.clone(),
                message: e.to_string(),
            }
            .into()),
        }
    }
}
