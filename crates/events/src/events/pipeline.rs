use arcade_types::{Decision, PipelineId, PipelinePhase, TitleId};
use serde::{Deserialize, Serialize};

use super::FailureContext;

/// How a pipeline ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// The title ran and its process exited
    Exited { code: Option<i32> },
    /// No download exists for the current platform
    NotFound,
    /// Cancelled by shutdown
    Cancelled,
    Failed { failure: FailureContext },
}

/// Lifecycle of one play request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// A play request started a new pipeline
    Accepted {
        pipeline_id: PipelineId,
        title: TitleId,
    },

    /// A play request was dropped because a pipeline is already active
    Rejected { title: TitleId, active: TitleId },

    /// The install check finished
    Decided {
        pipeline_id: PipelineId,
        title: TitleId,
        decision: Decision,
    },

    PhaseChanged {
        pipeline_id: PipelineId,
        title: TitleId,
        phase: PipelinePhase,
    },

    /// Emitted after the pipeline left the registry
    Finished {
        pipeline_id: PipelineId,
        title: TitleId,
        outcome: PipelineOutcome,
    },
}

impl PipelineEvent {
    /// Pipeline this event belongs to, if any
    #[must_use]
    pub fn pipeline_id(&self) -> Option<PipelineId> {
        match self {
            Self::Accepted { pipeline_id, .. }
            | Self::Decided { pipeline_id, .. }
            | Self::PhaseChanged { pipeline_id, .. }
            | Self::Finished { pipeline_id, .. } => Some(*pipeline_id),
            Self::Rejected { .. } => None,
        }
    }
}
