#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for the arcade launcher
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (`<config dir>/arcade/config.toml`)
//! - Environment variables
//! - CLI flags

pub mod constants;
pub mod sections;

pub use sections::{CatalogConfig, LauncherConfig, NetworkConfig, PathConfig, PipelineConfig};

use arcade_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub paths: PathConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub launcher: LauncherConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir
            .join(constants::APP_DIR_NAME)
            .join(constants::CONFIG_FILE_NAME))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // ARCADE_CATALOG_URL
        if let Ok(url) = std::env::var("ARCADE_CATALOG_URL") {
            if url.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "ARCADE_CATALOG_URL".to_string(),
                    value: url,
                }
                .into());
            }
            self.catalog.url = url;
        }

        // ARCADE_DATA_DIR
        if let Ok(dir) = std::env::var("ARCADE_DATA_DIR") {
            self.paths.data_dir = Some(PathBuf::from(dir));
        }

        // ARCADE_SINGLE_FLIGHT
        if let Ok(policy) = std::env::var("ARCADE_SINGLE_FLIGHT") {
            self.pipeline.single_flight =
                policy.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "ARCADE_SINGLE_FLIGHT".to_string(),
                    value: policy,
                })?;
        }

        self.validate()
    }

    /// Reject values that would make the launcher unusable
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.catalog.url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "catalog.url".to_string(),
                value: self.catalog.url.clone(),
            }
            .into());
        }
        if self.catalog.refresh_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "catalog.refresh_interval_secs".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Get the data directory (with default)
    ///
    /// # Errors
    ///
    /// Returns an error if no data dir is configured and the platform has none.
    pub fn data_dir(&self) -> Result<PathBuf, Error> {
        if let Some(dir) = &self.paths.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(constants::APP_DIR_NAME))
            .ok_or_else(|| ConfigError::NoDataDir.into())
    }

    /// Root of all install directories
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined.
    pub fn apps_dir(&self) -> Result<PathBuf, Error> {
        match &self.paths.apps_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.data_dir()?.join(constants::APPS_DIR_NAME)),
        }
    }

    /// Staging directory for downloaded archives
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined.
    pub fn downloads_dir(&self) -> Result<PathBuf, Error> {
        match &self.paths.downloads_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.data_dir()?.join(constants::DOWNLOADS_DIR_NAME)),
        }
    }

    /// Directory for debug log files
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be determined.
    pub fn logs_dir(&self) -> Result<PathBuf, Error> {
        Ok(self.data_dir()?.join(constants::LOGS_DIR_NAME))
    }
}
