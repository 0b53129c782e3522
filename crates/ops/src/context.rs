//! Operations context for dependency injection

use arcade_catalog::CatalogStore;
use arcade_config::Config;
use arcade_errors::{Error, OpsError};
use arcade_events::{EventEmitter, EventSender};
use arcade_install::{ArchiveExtractor, EntryFilter, VersionStore};
use arcade_net::FileTransfer;
use arcade_platform::ProcessLauncher;
use arcade_types::{Platform, SingleFlight};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Knobs the orchestrator reads for every pipeline
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Where archives are downloaded before extraction
    pub downloads_dir: PathBuf,
    /// Passed to every launched title
    pub launch_argument: String,
    pub single_flight: SingleFlight,
    /// Delay before an error on the progress display is hidden
    pub error_hide_delay: Duration,
    pub platform: Platform,
}

impl PipelineSettings {
    /// Derive settings from a loaded configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the downloads directory cannot be resolved.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            downloads_dir: config.downloads_dir()?,
            launch_argument: config.launcher.argument.clone(),
            single_flight: config.pipeline.single_flight,
            error_hide_delay: config.pipeline.error_hide_delay(),
            platform: Platform::current(),
        })
    }
}

/// Everything a pipeline needs, shared by all pipelines of one orchestrator
pub struct OpsCtx {
    pub catalog: Arc<CatalogStore>,
    pub versions: VersionStore,
    pub transfer: Arc<dyn FileTransfer>,
    pub extractor: Arc<dyn ArchiveExtractor>,
    pub launcher: Arc<dyn ProcessLauncher>,
    /// Entries the extractor keeps; symbolic links are dropped regardless
    pub entry_filter: EntryFilter,
    pub tx: EventSender,
    pub settings: PipelineSettings,
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

// No public constructor - use OpsContextBuilder instead

/// Builder for operations context
pub struct OpsContextBuilder {
    catalog: Option<Arc<CatalogStore>>,
    versions: Option<VersionStore>,
    transfer: Option<Arc<dyn FileTransfer>>,
    extractor: Option<Arc<dyn ArchiveExtractor>>,
    launcher: Option<Arc<dyn ProcessLauncher>>,
    entry_filter: EntryFilter,
    tx: Option<EventSender>,
    settings: Option<PipelineSettings>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: None,
            versions: None,
            transfer: None,
            extractor: None,
            launcher: None,
            entry_filter: EntryFilter::all(),
            tx: None,
            settings: None,
        }
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<CatalogStore>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    #[must_use]
    pub fn with_versions(mut self, versions: VersionStore) -> Self {
        self.versions = Some(versions);
        self
    }

    #[must_use]
    pub fn with_transfer(mut self, transfer: Arc<dyn FileTransfer>) -> Self {
        self.transfer = Some(transfer);
        self
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: Arc<dyn ArchiveExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    #[must_use]
    pub fn with_launcher(mut self, launcher: Arc<dyn ProcessLauncher>) -> Self {
        self.launcher = Some(launcher);
        self
    }

    #[must_use]
    pub fn with_entry_filter(mut self, filter: EntryFilter) -> Self {
        self.entry_filter = filter;
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    #[must_use]
    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing.
    pub fn build(self) -> Result<OpsCtx, Error> {
        Ok(OpsCtx {
            catalog: self.catalog.ok_or_else(|| missing("catalog"))?,
            versions: self.versions.ok_or_else(|| missing("version store"))?,
            transfer: self.transfer.ok_or_else(|| missing("file transfer"))?,
            extractor: self.extractor.ok_or_else(|| missing("archive extractor"))?,
            launcher: self.launcher.ok_or_else(|| missing("process launcher"))?,
            entry_filter: self.entry_filter,
            tx: self.tx.ok_or_else(|| missing("event sender"))?,
            settings: self.settings.ok_or_else(|| missing("pipeline settings"))?,
        })
    }
}

impl Default for OpsContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn missing(component: &str) -> Error {
    OpsError::InitializationFailed {
        message: format!("{component} not set"),
    }
    .into()
}
