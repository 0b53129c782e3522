//! Structured logging integration for events
//!
//! Every event that reaches the CLI is also written to the tracing
//! subscriber, with the envelope's metadata as structured fields.

use arcade_events::{
    AppEvent, CatalogEvent, EventMessage, GeneralEvent, PipelineEvent, PipelineOutcome,
    ProgressPhase,
};
use tracing::Level;

/// Log at a level only known at runtime
macro_rules! log_at {
    ($level:expr, $($arg:tt)+) => {
        match $level {
            Level::ERROR => tracing::error!($($arg)+),
            Level::WARN => tracing::warn!($($arg)+),
            Level::INFO => tracing::info!($($arg)+),
            Level::DEBUG => tracing::debug!($($arg)+),
            _ => tracing::trace!($($arg)+),
        }
    };
}

/// Log an `AppEvent` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let meta = &message.meta;
    let level = meta.tracing_level();

    match &message.event {
        AppEvent::General(event) => match event {
            GeneralEvent::Warning { message, context } => log_at!(
                level,
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                context = ?context,
                "{message}"
            ),
            GeneralEvent::Error { message, details } => log_at!(
                level,
                source = meta.source.as_str(),
                event_id = %meta.event_id,
                details = ?details,
                "{message}"
            ),
            GeneralEvent::DebugLog { message, context } => log_at!(
                level,
                source = meta.source.as_str(),
                correlation = ?meta.correlation_id,
                context = ?context,
                "{message}"
            ),
            GeneralEvent::OperationStarted { operation } => log_at!(
                level,
                correlation = ?meta.correlation_id,
                operation = %operation,
                "Operation started"
            ),
            GeneralEvent::OperationCompleted { operation, success } => log_at!(
                level,
                correlation = ?meta.correlation_id,
                operation = %operation,
                success,
                "Operation completed"
            ),
            GeneralEvent::OperationFailed { operation, error } => log_at!(
                level,
                correlation = ?meta.correlation_id,
                operation = %operation,
                error = %error,
                "Operation failed"
            ),
        },

        AppEvent::Catalog(event) => match event {
            CatalogEvent::Updated { title_count } => log_at!(
                level,
                source = meta.source.as_str(),
                title_count,
                "Catalog updated"
            ),
            CatalogEvent::Unavailable { failure, retained } => log_at!(
                level,
                source = meta.source.as_str(),
                code = ?failure.code,
                error = %failure.message,
                retained,
                "Catalog unavailable"
            ),
        },

        AppEvent::Progress(progress) => {
            // per-tick updates only at trace
            let level = match progress.phase {
                ProgressPhase::Downloading | ProgressPhase::Installing => Level::TRACE,
                _ => level,
            };
            log_at!(
                level,
                correlation = ?meta.correlation_id,
                phase = ?progress.phase,
                filename = %progress.filename,
                done = progress.done,
                total = progress.total,
                percentage = progress.percentage,
                "{}",
                progress.title
            );
        }

        AppEvent::Window(window) => log_at!(
            level,
            correlation = ?meta.correlation_id,
            window = ?window,
            "Window visibility requested"
        ),

        AppEvent::Pipeline(event) => match event {
            PipelineEvent::Accepted { pipeline_id, title } => log_at!(
                level,
                pipeline_id = %pipeline_id,
                title = %title,
                "Pipeline accepted"
            ),
            PipelineEvent::Rejected { title, active } => log_at!(
                level,
                title = %title,
                active = %active,
                "Play request rejected"
            ),
            PipelineEvent::Decided {
                pipeline_id,
                title,
                decision,
            } => log_at!(
                level,
                pipeline_id = %pipeline_id,
                title = %title,
                decision = ?decision,
                "Install check finished"
            ),
            PipelineEvent::PhaseChanged {
                pipeline_id,
                title,
                phase,
            } => log_at!(
                level,
                pipeline_id = %pipeline_id,
                title = %title,
                phase = %phase,
                "Pipeline phase changed"
            ),
            PipelineEvent::Finished {
                pipeline_id,
                title,
                outcome,
            } => match outcome {
                PipelineOutcome::Failed { failure } => log_at!(
                    level,
                    pipeline_id = %pipeline_id,
                    title = %title,
                    code = ?failure.code,
                    error = %failure.message,
                    hint = ?failure.hint,
                    retryable = failure.retryable,
                    "Pipeline failed"
                ),
                other => log_at!(
                    level,
                    pipeline_id = %pipeline_id,
                    title = %title,
                    outcome = ?other,
                    "Pipeline finished"
                ),
            },
        },
    }
}
