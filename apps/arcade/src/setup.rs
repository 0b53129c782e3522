//! System setup and initialization

use crate::error::CliError;
use arcade_catalog::{CatalogStore, FailurePolicy, HttpCatalogSource};
use arcade_config::Config;
use arcade_events::EventSender;
use arcade_install::{VersionStore, ZipExtractor};
use arcade_net::{Downloader, NetClient, NetConfig};
use arcade_ops::{OpsContextBuilder, OpsCtx, PipelineSettings};
use arcade_platform::NativeLauncher;
use arcade_types::Platform;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// System setup and component initialization
pub struct SystemSetup {
    config: Config,
    net: Option<NetClient>,
}

impl SystemSetup {
    /// Create new system setup
    pub fn new(config: Config) -> Self {
        Self { config, net: None }
    }

    /// Create directories and the shared HTTP client
    pub async fn initialize(&mut self) -> Result<(), CliError> {
        info!("Initializing arcade components");

        self.ensure_directories().await?;
        self.init_net()?;

        info!("System initialization completed");
        Ok(())
    }

    /// Ensure the data, apps and downloads directories exist
    async fn ensure_directories(&self) -> Result<(), CliError> {
        let dirs = [
            self.config.data_dir()?,
            self.config.apps_dir()?,
            self.config.downloads_dir()?,
        ];
        for dir in &dirs {
            create_dir(dir).await?;
        }
        Ok(())
    }

    fn init_net(&mut self) -> Result<(), CliError> {
        let net = NetClient::new(NetConfig::from(&self.config.network))?;
        debug!("Network client initialized");
        self.net = Some(net);
        Ok(())
    }

    /// Wire the real collaborators into an operations context
    pub fn ops_context(&self, tx: EventSender) -> Result<OpsCtx, CliError> {
        let net = self
            .net
            .clone()
            .ok_or_else(|| CliError::Setup("network client not initialized".to_string()))?;

        let source = HttpCatalogSource::new(net.clone(), &self.config.catalog.url, tx.clone());
        let catalog = CatalogStore::new(
            Arc::new(source),
            FailurePolicy::from_retain(self.config.catalog.retain_on_failure),
        )
        .with_event_sender(tx.clone());

        let ctx = OpsContextBuilder::new()
            .with_catalog(Arc::new(catalog))
            .with_versions(VersionStore::new(
                self.config.apps_dir()?,
                Platform::current(),
            ))
            .with_transfer(Arc::new(Downloader::new(net)))
            .with_extractor(Arc::new(ZipExtractor))
            .with_launcher(Arc::new(NativeLauncher::default()))
            .with_event_sender(tx)
            .with_settings(PipelineSettings::from_config(&self.config)?)
            .build()?;
        Ok(ctx)
    }
}

async fn create_dir(dir: &Path) -> Result<(), CliError> {
    tokio::fs::create_dir_all(dir).await.map_err(|e| {
        CliError::Setup(format!("failed to create {}: {e}", dir.display()))
    })?;
    debug!("Ensured directory exists: {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_directory_creation() {
        let temp = tempdir().unwrap();
        let mut config = Config::default();
        config.paths.data_dir = Some(temp.path().join("data"));

        let mut setup = SystemSetup::new(config);
        setup.initialize().await.unwrap();

        assert!(temp.path().join("data").join("Apps").is_dir());
        assert!(temp.path().join("data").join("Downloads").is_dir());

        let (tx, _rx) = arcade_events::channel();
        let ctx = setup.ops_context(tx).unwrap();
        assert_eq!(
            ctx.versions.apps_dir(),
            temp.path().join("data").join("Apps")
        );
    }

    #[test]
    fn test_context_requires_initialization() {
        let setup = SystemSetup::new(Config::default());
        let (tx, _rx) = arcade_events::channel();
        assert!(matches!(setup.ops_context(tx), Err(CliError::Setup(_))));
    }
}
