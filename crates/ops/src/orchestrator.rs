//! Entry point for play requests and shutdown

use crate::context::OpsCtx;
use crate::pipeline::Pipeline;
use crate::registry::Registry;
use crate::types::{ActivePipeline, PlayOutcome};
use arcade_errors::{Error, OpsError};
use arcade_events::{AppEvent, EventEmitter, EventSender, PipelineEvent};
use arcade_types::{TitleId, TitleKey};
use std::sync::Arc;

/// Owns the pipeline registry and starts one task per accepted play request
pub struct Orchestrator {
    ctx: Arc<OpsCtx>,
    registry: Arc<Registry>,
}

impl EventEmitter for Orchestrator {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.ctx.tx)
    }
}

impl Orchestrator {
    #[must_use]
    pub fn new(ctx: OpsCtx) -> Self {
        Self {
            ctx: Arc::new(ctx),
            registry: Arc::new(Registry::default()),
        }
    }

    #[must_use]
    pub fn context(&self) -> &OpsCtx {
        &self.ctx
    }

    /// Start the install/update/launch pipeline for `key`
    ///
    /// Returns `PlayOutcome::Busy` without side effects when the single-flight
    /// policy rejects the request. Index keys are resolved against the
    /// current catalog, fetching it first if none is loaded yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an index key does not name a catalog position.
    pub async fn play(&self, key: TitleKey) -> Result<PlayOutcome, Error> {
        let policy = self.ctx.settings.single_flight;
        if let Some(active) = self.registry.any_blocker(policy) {
            return Ok(self.reject(key_title(&key), active));
        }

        let title = self.resolve(&key).await?;
        let registered = self.registry.try_register(&title, policy, |id, cancel| {
            self.emit(AppEvent::Pipeline(PipelineEvent::Accepted {
                pipeline_id: id,
                title: title.clone(),
            }));
            let pipeline = Pipeline::new(
                Arc::clone(&self.ctx),
                Arc::clone(&self.registry),
                id,
                title.clone(),
                cancel,
            );
            tokio::spawn(pipeline.run())
        });

        match registered {
            Ok(pipeline_id) => {
                tracing::info!(%title, %pipeline_id, "pipeline started");
                Ok(PlayOutcome::Started { pipeline_id })
            }
            Err(active) => Ok(self.reject(title, active)),
        }
    }

    fn reject(&self, title: TitleId, active: TitleId) -> PlayOutcome {
        tracing::info!(%title, %active, "play request ignored, pipeline already running");
        self.emit(AppEvent::Pipeline(PipelineEvent::Rejected {
            title,
            active: active.clone(),
        }));
        PlayOutcome::Busy { active }
    }

    async fn resolve(&self, key: &TitleKey) -> Result<TitleId, Error> {
        match key {
            TitleKey::Id(id) => Ok(TitleId::new(id.as_str())),
            TitleKey::Index(index) => {
                if self.ctx.catalog.snapshot().is_none() {
                    if let Err(e) = self.ctx.catalog.refresh().await {
                        tracing::warn!(error = %e, "catalog unavailable while resolving index");
                    }
                }
                Ok(self.ctx.catalog.get_by_index(*index)?.id.clone())
            }
        }
    }

    /// Cancel every running pipeline and wait for their cleanup
    ///
    /// Safe to call at any time; the registry is empty when this returns, so
    /// the next play request is accepted.
    pub async fn stop_all(&self) {
        let drained = self.registry.drain();
        if drained.is_empty() {
            return;
        }
        tracing::info!(count = drained.len(), "stopping pipelines");

        for state in &drained {
            state.cancel.cancel();
        }
        for state in drained {
            if let Err(e) = state.handle.await {
                tracing::warn!(pipeline = %state.id, error = %e, "pipeline task ended abnormally");
            }
        }
    }

    /// Delete an installed title
    ///
    /// # Errors
    ///
    /// Returns `OpsError::PipelineBusy` while the title has a running
    /// pipeline, or a filesystem error if the removal fails.
    pub async fn remove(&self, title: &TitleId) -> Result<(), Error> {
        if self.registry.contains(title) {
            return Err(OpsError::PipelineBusy {
                title: title.to_string(),
            }
            .into());
        }
        self.ctx.versions.remove(title).await?;
        self.emit_debug(format!("removed {title}"));
        Ok(())
    }

    /// Pipelines currently running, ordered by title
    #[must_use]
    pub fn active(&self) -> Vec<ActivePipeline> {
        self.registry.active()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.registry.is_empty()
    }
}

fn key_title(key: &TitleKey) -> TitleId {
    match key {
        TitleKey::Id(id) => TitleId::new(id.as_str()),
        TitleKey::Index(_) => TitleId::new(key.to_string()),
    }
}
