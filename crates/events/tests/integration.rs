//! Integration tests for events

#[cfg(test)]
mod tests {
    use arcade_errors::{Error, NetworkError, UserFacingError};
    use arcade_events::*;
    use arcade_types::{PipelinePhase, TitleId, Uuid};

    #[tokio::test]
    async fn test_emit_helpers() {
        let (tx, mut rx) = channel();

        tx.emit_error("test error");
        tx.emit_debug("test debug");

        let first = rx.recv().await.unwrap();
        assert!(matches!(
            first.event,
            AppEvent::General(GeneralEvent::Error { .. })
        ));
        assert_eq!(first.meta.level, EventLevel::Error);
        assert_eq!(first.meta.source, EventSource::GENERAL);

        let second = rx.recv().await.unwrap();
        assert!(matches!(
            second.event,
            AppEvent::General(GeneralEvent::DebugLog { .. })
        ));
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_warning("ignored");
        tx.emit_window(WindowEvent::HideMain);
    }

    #[tokio::test]
    async fn test_pipeline_scoped_emitter_sets_correlation() {
        let (tx, mut rx) = channel();
        let id = Uuid::new_v4();
        let scoped = (tx, id);

        scoped.emit_phase_changed(id, &TitleId::from("g1"), PipelinePhase::Downloading);

        let message = rx.recv().await.unwrap();
        assert_eq!(message.meta.correlation_id, Some(id.to_string()));
        assert_eq!(message.meta.source, EventSource::PIPELINE);
        match message.event {
            AppEvent::Pipeline(event) => assert_eq!(event.pipeline_id(), Some(id)),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_failure_context_from_error() {
        let error = NetworkError::Timeout {
            url: "http://x".into(),
        };
        let failure = FailureContext::from_error(&error);
        assert_eq!(failure.code.as_deref(), error.user_code());
        assert!(failure.retryable);
    }

    #[test]
    fn test_io_failure_serializes_with_code() {
        let error = Error::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "access denied",
        ));
        let json = serde_json::to_value(FailureContext::from_error(&error)).unwrap();
        assert_eq!(json["code"], "error.io");
        assert_eq!(json["retryable"], true);
        assert!(json["message"].as_str().unwrap().contains("access denied"));
    }

    #[test]
    fn test_event_meta_fields() {
        let message = EventMessage::from_event(AppEvent::Window(WindowEvent::HideMain));
        let json = serde_json::to_value(&message).unwrap();
        let meta = json["meta"].as_object().unwrap();
        let mut keys: Vec<_> = meta.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["correlationId", "eventId", "level", "source", "timestamp"]
        );
    }

    #[test]
    fn test_failed_pipeline_logs_at_error() {
        let event = AppEvent::Pipeline(PipelineEvent::Finished {
            pipeline_id: Uuid::new_v4(),
            title: TitleId::from("g1"),
            outcome: PipelineOutcome::Failed {
                failure: FailureContext::new(None::<String>, "boom", None::<String>, false),
            },
        });
        assert_eq!(event.log_level(), tracing::Level::ERROR);
        assert_eq!(event.log_target(), "arcade::events::pipeline");
    }

    #[test]
    fn test_window_event_serialization() {
        let event = AppEvent::Window(WindowEvent::ShowProgress);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"domain":"window","event":"show_progress"}"#);
    }
}
