use serde::{Deserialize, Serialize};

use crate::EventSource;
use arcade_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureContext {
    /// Stable error code, e.g. `network.timeout`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod catalog;
pub mod general;
pub mod pipeline;
pub mod progress;
pub mod window;

pub use catalog::*;
pub use general::*;
pub use pipeline::*;
pub use progress::*;
pub use window::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations)
    General(GeneralEvent),

    /// Catalog refresh results
    Catalog(CatalogEvent),

    /// Progress display updates
    Progress(ProgressEvent),

    /// Window visibility requests
    Window(WindowEvent),

    /// Per-title pipeline lifecycle
    Pipeline(PipelineEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Catalog(_) => EventSource::CATALOG,
            Self::Progress(_) => EventSource::PROGRESS,
            Self::Window(_) => EventSource::WINDOW,
            Self::Pipeline(_) => EventSource::PIPELINE,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::General(GeneralEvent::Error { .. } | GeneralEvent::OperationFailed { .. })
            | Self::Pipeline(PipelineEvent::Finished {
                outcome: PipelineOutcome::Failed { .. },
                ..
            }) => Level::ERROR,

            Self::Progress(event) if event.is_failure() => Level::WARN,

            Self::General(GeneralEvent::Warning { .. })
            | Self::Catalog(CatalogEvent::Unavailable { .. })
            | Self::Pipeline(PipelineEvent::Rejected { .. }) => Level::WARN,

            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Progress(_)
            | Self::Window(_) => Level::DEBUG,

            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "arcade::events::general",
            Self::Catalog(_) => "arcade::events::catalog",
            Self::Progress(_) => "arcade::events::progress",
            Self::Window(_) => "arcade::events::window",
            Self::Pipeline(_) => "arcade::events::pipeline",
        }
    }
}
