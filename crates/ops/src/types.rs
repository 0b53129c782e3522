//! Types for operations and results

use arcade_types::{Decision, InstalledMarker, PipelineId, PipelinePhase, TitleId};
use serde::{Deserialize, Serialize};

/// Answer to a play request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlayOutcome {
    /// The request started a new pipeline
    Started { pipeline_id: PipelineId },
    /// Dropped without side effects: `active` already has a pipeline
    Busy { active: TitleId },
}

/// A pipeline currently in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePipeline {
    pub pipeline_id: PipelineId,
    pub title: TitleId,
    pub phase: PipelinePhase,
}

/// One catalog row with its local install state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleSummary {
    /// Position in the catalog, usable as a play key
    pub index: usize,
    pub id: TitleId,
    pub name: String,
    pub description: String,
    /// Catalog version for this platform
    pub version: String,
    pub installed_version: Option<String>,
    /// Whether a download exists for this platform
    pub downloadable: bool,
    /// What playing this title would do right now
    pub action: Decision,
}

/// Installed titles plus whatever is running
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusReport {
    pub installed: Vec<InstalledMarker>,
    pub active: Vec<ActivePipeline>,
}
