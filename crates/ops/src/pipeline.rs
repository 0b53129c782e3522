//! One play request: decide, download, install, launch
//!
//! A pipeline runs as a single task. Every await point observes the
//! pipeline's cancellation token, and every failure ends the run: it is
//! reported on the progress display and in the final `Finished` event, never
//! retried.

use crate::context::OpsCtx;
use crate::registry::Registry;
use arcade_errors::{Error, UserFacingError};
use arcade_events::{
    AppEvent, EventEmitter, EventSender, FailureContext, PipelineEvent, PipelineOutcome,
    ProgressEvent, WindowEvent,
};
use arcade_install::ExtractProgressFn;
use arcade_net::{filename_from_url, TransferProgress};
use arcade_types::{Decision, InstalledMarker, PipelineId, PipelinePhase, TitleDescriptor, TitleId};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// What the deciding phase settled on
struct Plan {
    descriptor: Arc<TitleDescriptor>,
    /// Present unless the installed copy is current
    download_url: Option<String>,
}

pub(crate) struct Pipeline {
    ctx: Arc<OpsCtx>,
    registry: Arc<Registry>,
    id: PipelineId,
    title: TitleId,
    cancel: CancellationToken,
    emitter: (EventSender, PipelineId),
}

impl Pipeline {
    pub fn new(
        ctx: Arc<OpsCtx>,
        registry: Arc<Registry>,
        id: PipelineId,
        title: TitleId,
        cancel: CancellationToken,
    ) -> Self {
        let emitter = (ctx.tx.clone(), id);
        Self {
            ctx,
            registry,
            id,
            title,
            cancel,
            emitter,
        }
    }

    /// Drive the pipeline to completion, then leave the registry
    pub async fn run(self) {
        let outcome = match self.drive().await {
            Ok(outcome) => outcome,
            Err(e) if e.is_cancelled() => {
                tracing::debug!(title = %self.title, pipeline = %self.id, "pipeline cancelled");
                self.hide_progress();
                PipelineOutcome::Cancelled
            }
            Err(e) => {
                tracing::warn!(title = %self.title, pipeline = %self.id, error = %e, "pipeline failed");
                self.show_progress();
                self.emitter
                    .emit_progress(ProgressEvent::error(e.user_message()));
                PipelineOutcome::Failed {
                    failure: FailureContext::from_error(&e),
                }
            }
        };

        self.registry.finish(&self.title, self.id);
        self.emitter
            .emit_phase_changed(self.id, &self.title, PipelinePhase::Idle);
        let failed = matches!(
            outcome,
            PipelineOutcome::Failed { .. } | PipelineOutcome::NotFound
        );
        self.emitter.emit(AppEvent::Pipeline(PipelineEvent::Finished {
            pipeline_id: self.id,
            title: self.title.clone(),
            outcome,
        }));

        if failed {
            self.hide_progress_later().await;
        }
    }

    async fn drive(&self) -> Result<PipelineOutcome, Error> {
        self.enter(PipelinePhase::Deciding);
        let Some(plan) = self.decide().await? else {
            return Ok(PipelineOutcome::NotFound);
        };

        if let Some(url) = plan.download_url.as_deref() {
            self.enter(PipelinePhase::Downloading);
            let (archive, filename) = self.download(url).await?;

            self.enter(PipelinePhase::Installing);
            self.install(&plan.descriptor, &archive, &filename).await?;
        }

        self.enter(PipelinePhase::Running);
        let code = self.launch().await?;
        Ok(PipelineOutcome::Exited { code })
    }

    fn enter(&self, phase: PipelinePhase) {
        tracing::debug!(title = %self.title, pipeline = %self.id, %phase, "phase changed");
        self.registry.set_phase(&self.title, self.id, phase);
        self.emitter.emit_phase_changed(self.id, &self.title, phase);
    }

    fn check_cancelled(&self) -> Result<(), Error> {
        if self.cancel.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Compare the installed marker with a fresh catalog entry
    ///
    /// `None` means the title cannot be played on this platform; the user
    /// has already been told.
    async fn decide(&self) -> Result<Option<Plan>, Error> {
        let refreshed = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Err(Error::Cancelled),
            refreshed = self.ctx.catalog.refresh() => refreshed,
        };
        if let Err(e) = refreshed {
            tracing::warn!(title = %self.title, error = %e, "catalog refresh failed, using last known catalog");
        }

        let descriptor = match self.ctx.catalog.get(self.title.as_str()) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                tracing::warn!(title = %self.title, error = %e, "title not in catalog");
                self.not_found(self.title.as_str());
                return Ok(None);
            }
        };

        let platform = self.ctx.settings.platform;
        let marker = self.ctx.versions.read(&self.title).await;
        let decision = Decision::decide(marker.as_ref(), &descriptor, platform);
        tracing::debug!(
            title = %self.title,
            installed = marker.as_ref().map(|m| m.version.as_str()),
            available = descriptor.version(platform),
            ?decision,
            "install check"
        );
        self.emitter.emit(AppEvent::Pipeline(PipelineEvent::Decided {
            pipeline_id: self.id,
            title: self.title.clone(),
            decision,
        }));

        if decision == Decision::Launch {
            return Ok(Some(Plan {
                descriptor,
                download_url: None,
            }));
        }

        let Some(url) = descriptor.download_url(platform).map(str::to_string) else {
            self.not_found(&descriptor.name);
            return Ok(None);
        };

        self.check_cancelled()?;
        // stale install, or leftovers of an interrupted one
        if self.ctx.versions.has_install_dir(&self.title).await {
            tracing::debug!(title = %self.title, ?decision, "purging previous install");
            self.ctx.versions.remove(&self.title).await?;
        }

        Ok(Some(Plan {
            descriptor,
            download_url: Some(url),
        }))
    }

    /// Fetch the archive, returning its local path and file name
    ///
    /// Archives are staged under `downloads/<title>/` so concurrent pipelines
    /// never share a staging file, whatever their URLs end in.
    async fn download(&self, url: &str) -> Result<(PathBuf, String), Error> {
        let filename = filename_from_url(url)?;
        // same single-component check as the install directory
        self.ctx.versions.install_dir(&self.title)?;
        let archive = self
            .ctx
            .settings
            .downloads_dir
            .join(self.title.as_str())
            .join(&filename);

        self.show_progress();
        self.emitter.emit_progress(ProgressEvent::reset());
        self.emitter.emit_operation_started("download");

        let emitter = self.emitter.clone();
        let label = filename.clone();
        let progress = move |p: TransferProgress| {
            emitter.emit_progress(ProgressEvent::downloading(
                label.as_str(),
                p.received,
                p.total,
            ));
        };

        match self
            .ctx
            .transfer
            .download(url, &archive, &progress, &self.cancel)
            .await
        {
            Ok(bytes) => {
                tracing::debug!(title = %self.title, bytes, archive = %archive.display(), "download complete");
                self.hide_progress();
                self.emitter.emit_operation_completed("download", true);
                self.emitter.emit_progress(ProgressEvent::reset());
                Ok((archive, filename))
            }
            Err(e) => {
                remove_quietly(&archive).await;
                if !e.is_cancelled() {
                    self.emitter
                        .emit_operation_failed("download", e.user_message());
                }
                Err(e)
            }
        }
    }

    /// Unpack the archive and record the installed version
    ///
    /// The marker is written only after every entry was extracted, so a
    /// failure at any point leaves the title uninstalled.
    async fn install(
        &self,
        descriptor: &TitleDescriptor,
        archive: &Path,
        filename: &str,
    ) -> Result<(), Error> {
        let install_dir = self.ctx.versions.install_dir(&self.title)?;

        self.show_progress();
        self.emitter.emit_operation_started("install");

        let emitter = self.emitter.clone();
        let label = filename.to_string();
        let progress: Arc<ExtractProgressFn> = Arc::new(move |done: u64, count: u64| {
            emitter.emit_progress(ProgressEvent::installing(label.as_str(), done, count));
        });

        let installed = match self
            .ctx
            .extractor
            .extract(
                archive,
                &install_dir,
                self.ctx.entry_filter.clone(),
                progress,
                &self.cancel,
            )
            .await
        {
            Ok(entries) => {
                remove_quietly(archive).await;
                let marker = InstalledMarker::new(
                    self.title.clone(),
                    descriptor.version(self.ctx.settings.platform),
                );
                self.ctx.versions.write(&marker).await.map(|()| entries)
            }
            Err(e) => {
                remove_quietly(archive).await;
                Err(e)
            }
        };

        match installed {
            Ok(entries) => {
                tracing::info!(title = %self.title, entries, "title installed");
                self.emitter.emit_progress(ProgressEvent::reset());
                self.hide_progress();
                self.emitter.emit_operation_completed("install", true);
                Ok(())
            }
            Err(e) => {
                if let Err(purge) = self.ctx.versions.remove(&self.title).await {
                    tracing::warn!(title = %self.title, error = %purge, "failed to purge partial install");
                }
                if !e.is_cancelled() {
                    self.emitter
                        .emit_operation_failed("install", e.user_message());
                }
                Err(e)
            }
        }
    }

    /// Start the title and wait for it to exit
    async fn launch(&self) -> Result<Option<i32>, Error> {
        self.check_cancelled()?;
        let install_dir = self.ctx.versions.install_dir(&self.title)?;
        let argument = self.ctx.settings.launch_argument.as_str();

        let mut process = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Err(Error::Cancelled),
            process = self.ctx.launcher.launch(&install_dir, argument) => process?,
        };
        self.emitter.emit_window(WindowEvent::HideMain);

        let exited = tokio::select! {
            biased;
            () = self.cancel.cancelled() => None,
            code = process.wait() => Some(code),
        };
        self.emitter.emit_window(WindowEvent::ShowMain);

        match exited {
            Some(code) => {
                let code = code?;
                tracing::info!(title = %self.title, ?code, "title exited");
                Ok(code)
            }
            None => {
                if let Err(e) = process.kill().await {
                    tracing::warn!(title = %self.title, error = %e, "failed to stop title");
                }
                Err(Error::Cancelled)
            }
        }
    }

    fn not_found(&self, name: &str) {
        self.show_progress();
        self.emitter.emit_progress(ProgressEvent::not_found(name));
    }

    fn show_progress(&self) {
        self.registry.claim_progress(self.id);
        self.emitter.emit_window(WindowEvent::ShowProgress);
    }

    /// Hide the progress display unless a newer pipeline has taken it over
    fn hide_progress(&self) {
        if self.registry.owns_progress(self.id) {
            self.emitter.emit_window(WindowEvent::HideProgress);
        }
    }

    /// Leave a failure on screen for the configured delay
    async fn hide_progress_later(&self) {
        tokio::select! {
            () = tokio::time::sleep(self.ctx.settings.error_hide_delay) => {}
            () = self.cancel.cancelled() => {}
        }
        self.hide_progress();
    }
}

async fn remove_quietly(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove archive"),
    }
    // drop the per-title staging directory once it is empty
    if let Some(staging) = path.parent() {
        if let Err(e) = tokio::fs::remove_dir(staging).await {
            tracing::debug!(path = %staging.display(), error = %e, "staging directory kept");
        }
    }
}
