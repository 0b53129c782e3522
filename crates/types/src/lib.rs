#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for the arcade launcher
//!
//! This crate provides the fundamental types shared by every component:
//! catalog titles, installed-version markers, pipeline phases and the
//! progress arithmetic used when reporting to the display layer.

pub mod marker;
pub mod pipeline;
pub mod progress;
pub mod title;

// Re-export commonly used types
pub use marker::InstalledMarker;
pub use pipeline::{Decision, PipelineId, PipelinePhase, SingleFlight, TitleKey};
pub use progress::{format_megabytes, percentage};
pub use title::{TitleDescriptor, TitleId};
pub use uuid::Uuid;

use serde::{Deserialize, Serialize};

/// Operating system family a title is published for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    #[serde(rename = "mac")]
    MacOs,
    Linux,
}

impl Platform {
    /// Platform the launcher was compiled for
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }

    /// Extension (including the dot) of the entry launched from an install directory
    #[must_use]
    pub const fn executable_extension(self) -> &'static str {
        match self {
            Self::Windows => ".bat",
            Self::MacOs => ".app",
            Self::Linux => ".sh",
        }
    }

    /// File name of the installed-version marker inside a title directory
    #[must_use]
    pub const fn marker_file_name(self) -> &'static str {
        match self {
            Self::Windows => "winver.json",
            Self::MacOs => "macver.json",
            Self::Linux => "linuxver.json",
        }
    }

    /// Stable lowercase name, matching the catalog's download-URL keys
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::MacOs => "mac",
            Self::Linux => "linux",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    #[default]
    Auto,
    Never,
}

// Implement clap::ValueEnum for ColorChoice
impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_tables() {
        assert_eq!(Platform::Windows.executable_extension(), ".bat");
        assert_eq!(Platform::MacOs.executable_extension(), ".app");
        assert_eq!(Platform::Windows.marker_file_name(), "winver.json");
        assert_eq!(Platform::MacOs.marker_file_name(), "macver.json");
        assert_eq!(Platform::Linux.marker_file_name(), "linuxver.json");
    }

    #[test]
    fn test_current_platform_matches_target() {
        let current = Platform::current();
        if cfg!(target_os = "macos") {
            assert_eq!(current, Platform::MacOs);
        } else if cfg!(target_os = "windows") {
            assert_eq!(current, Platform::Windows);
        } else {
            assert_eq!(current, Platform::Linux);
        }
    }
}
