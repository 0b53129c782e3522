//! Installation error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum InstallError {
    #[error("extraction failed: {message}")]
    ExtractionFailed { message: String },

    #[error("failed to write version marker {path}: {message}")]
    MarkerWriteFailed { path: String, message: String },

    #[error("filesystem operation failed: {operation} on {path}: {message}")]
    FilesystemError {
        operation: String,
        path: String,
        message: String,
    },

    #[error("no download available for {title} on {platform}")]
    MissingDownloadUrl { title: String, platform: String },

    #[error("task execution failed: {message}")]
    TaskError { message: String },
}

impl UserFacingError for InstallError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ExtractionFailed { .. } => {
                Some("The download may be corrupt; press play again to fetch a fresh copy.")
            }
            Self::MissingDownloadUrl { .. } => {
                Some("This title is not published for your platform yet.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        !matches!(self, Self::MissingDownloadUrl { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ExtractionFailed { .. } => "install.extraction_failed",
            Self::MarkerWriteFailed { .. } => "install.marker_write_failed",
            Self::FilesystemError { .. } => "install.filesystem_error",
            Self::MissingDownloadUrl { .. } => "install.missing_download_url",
            Self::TaskError { .. } => "install.task_error",
        };
        Some(code)
    }
}
