#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in the arcade launcher
//!
//! Every user-visible effect of the orchestrator (progress text, window
//! visibility, pipeline lifecycle) travels as an event over a single
//! unbounded channel. Emission is fire-and-forget: a dropped receiver never
//! blocks or fails the emitting task.
//!
//! ## Architecture
//!
//! - **Domain-driven events**: grouped by domain (Catalog, Progress, Window, Pipeline)
//! - **Unified `EventEmitter` trait**: one API for raw senders and structs holding one
//! - **Metadata envelope**: each event travels inside an [`EventMessage`]

pub mod meta;
pub use meta::{EventLevel, EventMessage, EventMeta, EventSource};

pub mod events;
pub use events::{
    AppEvent, CatalogEvent, FailureContext, GeneralEvent, PipelineEvent, PipelineOutcome,
    ProgressEvent, ProgressPhase, WindowEvent,
};

use arcade_types::{PipelineId, PipelinePhase, TitleId};
use tokio::sync::mpsc::UnboundedSender;

/// Type alias for the event sender
pub type EventSender = UnboundedSender<EventMessage>;

/// Type alias for the event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<EventMessage>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout the launcher
///
/// This trait provides a single, consistent API for emitting events regardless of
/// whether you have a raw `EventSender` or a struct that contains one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Metadata applied to every emission; override to attach correlation ids
    fn enrich_event_meta(&self, _event: &AppEvent, _meta: &mut EventMeta) {}

    /// Emit an event with explicit metadata
    fn emit_with_meta(&self, meta: EventMeta, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            let mut meta = meta;
            self.enrich_event_meta(&event, &mut meta);
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(EventMessage::new(meta, event));
        }
    }

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        let meta = EventMeta::for_event(&event);
        self.emit_with_meta(meta, event);
    }

    /// Emit a debug log event
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    /// Emit an error event
    fn emit_error(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::error(message)));
    }

    /// Emit an operation started event
    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    /// Emit an operation completed event
    fn emit_operation_completed(&self, operation: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
            success,
        }));
    }

    /// Emit an operation failed event
    fn emit_operation_failed(&self, operation: impl Into<String>, error: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationFailed {
            operation: operation.into(),
            error: error.into(),
        }));
    }

    /// Push a progress update to the display
    fn emit_progress(&self, progress: ProgressEvent) {
        self.emit(AppEvent::Progress(progress));
    }

    /// Request a window visibility change
    fn emit_window(&self, window: WindowEvent) {
        self.emit(AppEvent::Window(window));
    }

    /// Emit a pipeline phase transition
    fn emit_phase_changed(&self, pipeline_id: PipelineId, title: &TitleId, phase: PipelinePhase) {
        self.emit(AppEvent::Pipeline(PipelineEvent::PhaseChanged {
            pipeline_id,
            title: title.clone(),
            phase,
        }));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
/// This allows `EventSender` to be used directly where `EventEmitter` is expected
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

/// Attach the pipeline id as correlation id for pipeline-scoped emissions
impl EventEmitter for (EventSender, PipelineId) {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.0)
    }

    fn enrich_event_meta(&self, _event: &AppEvent, meta: &mut EventMeta) {
        if meta.correlation_id.is_none() {
            meta.correlation_id = Some(self.1.to_string());
        }
    }
}
