#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Install/update/launch orchestration for the arcade launcher
//!
//! This crate sits between the CLI and the specialised crates. A play
//! request becomes one pipeline task that decides whether the title needs a
//! download, then drives the downloader, the extractor and the launcher in
//! turn. Only one pipeline runs at a time unless the per-title policy is
//! configured.

mod context;
mod orchestrator;
mod pipeline;
mod query;
mod registry;
mod types;

pub use context::{OpsContextBuilder, OpsCtx, PipelineSettings};
pub use orchestrator::Orchestrator;
pub use query::{list_titles, status};
pub use types::{ActivePipeline, PlayOutcome, StatusReport, TitleSummary};

use arcade_errors::Error;

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Catalog listing
    TitleList(Vec<TitleSummary>),
    /// Installed titles and running pipelines
    Status(StatusReport),
    /// Answer to a play request
    Play(PlayOutcome),
    /// Generic success message
    Success(String),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| {
            arcade_errors::OpsError::SerializationError {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Check if this is a success result
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            OperationResult::TitleList(_)
            | OperationResult::Status(_)
            | OperationResult::Success(_) => true,
            OperationResult::Play(outcome) => matches!(outcome, PlayOutcome::Started { .. }),
        }
    }
}
