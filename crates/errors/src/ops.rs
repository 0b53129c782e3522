//! Operation orchestration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum OpsError {
    #[error("operation failed: {message}")]
    OperationFailed { message: String },

    #[error("a pipeline is already running for {title}")]
    PipelineBusy { title: String },

    #[error("initialization failed: {message}")]
    InitializationFailed { message: String },

    #[error("serialization error: {message}")]
    SerializationError { message: String },

    #[error("pipeline task failed: {message}")]
    TaskFailed { message: String },
}

impl UserFacingError for OpsError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::PipelineBusy { .. } => {
                Some("Wait for the current download or game session to finish.")
            }
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::PipelineBusy { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::OperationFailed { .. } => "ops.operation_failed",
            Self::PipelineBusy { .. } => "ops.pipeline_busy",
            Self::InitializationFailed { .. } => "ops.initialization_failed",
            Self::SerializationError { .. } => "ops.serialization_error",
            Self::TaskFailed { .. } => "ops.task_failed",
        };
        Some(code)
    }
}
