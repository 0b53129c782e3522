//! Platform-specific operation errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors that can occur while locating or running a title's executable
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("no `{extension}` executable found in {dir}")]
    ExecutableNotFound { dir: String, extension: String },

    #[error("process execution failed: {command} - {message}")]
    ProcessExecutionFailed { command: String, message: String },

    #[error("unsupported platform: {os}")]
    UnsupportedPlatform { os: String },
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ExecutableNotFound { .. } => {
                Some("The installed files contain no launchable entry for this platform.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::ExecutableNotFound { .. } => "platform.executable_not_found",
            Self::ProcessExecutionFailed { .. } => "platform.process_failed",
            Self::UnsupportedPlatform { .. } => "platform.unsupported",
        };
        Some(code)
    }
}
