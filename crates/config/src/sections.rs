//! Configuration sections

use crate::constants::{DEFAULT_CATALOG_URL, DEFAULT_LAUNCH_ARGUMENT};
use arcade_types::SingleFlight;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where the catalog comes from and how often it is refreshed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub url: String,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// Keep serving the last good catalog when a refresh fails
    #[serde(default = "default_retain_on_failure")]
    pub retain_on_failure: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: default_catalog_url(),
            refresh_interval_secs: default_refresh_interval(),
            retain_on_failure: default_retain_on_failure(),
        }
    }
}

impl CatalogConfig {
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}

/// Path configuration; unset entries resolve under the data dir
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    pub data_dir: Option<PathBuf>,
    pub apps_dir: Option<PathBuf>,
    pub downloads_dir: Option<PathBuf>,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64, // seconds
    /// Overall request timeout; unset means downloads may run indefinitely
    #[serde(default)]
    pub timeout: Option<u64>, // seconds
    #[serde(default = "default_retries")]
    pub retries: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64, // seconds
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            timeout: None,
            retries: default_retries(),
            retry_delay: default_retry_delay(),
        }
    }
}

/// How installed titles are started
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    #[serde(default = "default_launch_argument")]
    pub argument: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            argument: default_launch_argument(),
        }
    }
}

/// Orchestrator behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub single_flight: SingleFlight,
    /// How long an error stays on the progress display before it is hidden
    #[serde(default = "default_error_hide_delay")]
    pub error_hide_delay_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            single_flight: SingleFlight::default(),
            error_hide_delay_secs: default_error_hide_delay(),
        }
    }
}

impl PipelineConfig {
    #[must_use]
    pub fn error_hide_delay(&self) -> Duration {
        Duration::from_secs(self.error_hide_delay_secs)
    }
}

// Default value functions for serde
fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_refresh_interval() -> u64 {
    60
}

fn default_retain_on_failure() -> bool {
    true
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    2
}

fn default_retry_delay() -> u64 {
    1 // 1 second
}

fn default_launch_argument() -> String {
    DEFAULT_LAUNCH_ARGUMENT.to_string()
}

fn default_error_hide_delay() -> u64 {
    5
}
