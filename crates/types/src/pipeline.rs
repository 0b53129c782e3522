//! Pipeline type definitions

use crate::{InstalledMarker, Platform, TitleDescriptor};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of one play request's pipeline run
pub type PipelineId = Uuid;

/// Phase of a title's install/update/launch pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    Idle,
    Deciding,
    Downloading,
    Installing,
    Running,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Deciding => "deciding",
            Self::Downloading => "downloading",
            Self::Installing => "installing",
            Self::Running => "running",
        };
        f.write_str(name)
    }
}

/// How a play request addresses a title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleKey {
    /// Catalog identifier
    Id(String),
    /// Zero-based position in the most recent catalog
    Index(usize),
}

impl std::fmt::Display for TitleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => f.write_str(id),
            Self::Index(index) => write!(f, "#{index}"),
        }
    }
}

/// Transition chosen by the deciding phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Installed and current: launch without touching the network
    Launch,
    /// Nothing installed: download and extract
    Install,
    /// Installed but stale: purge, then download and extract
    Update,
}

impl Decision {
    /// Compare the installed marker with the descriptor's version for `platform`
    #[must_use]
    pub fn decide(
        marker: Option<&InstalledMarker>,
        descriptor: &TitleDescriptor,
        platform: Platform,
    ) -> Self {
        match marker {
            None => Self::Install,
            Some(marker) if marker.is_current(descriptor.version(platform)) => Self::Launch,
            Some(_) => Self::Update,
        }
    }

    /// Whether this decision requires a download
    #[must_use]
    pub fn needs_download(self) -> bool {
        !matches!(self, Self::Launch)
    }
}

/// How many pipelines may be in flight at once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleFlight {
    /// One pipeline across all titles
    #[default]
    Global,
    /// One pipeline per title id
    PerTitle,
}

impl std::str::FromStr for SingleFlight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Self::Global),
            "per_title" | "per-title" => Ok(Self::PerTitle),
            other => Err(format!("unknown single-flight policy: {other}")),
        }
    }
}
