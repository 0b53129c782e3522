use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Outcome of a catalog refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEvent {
    /// A new snapshot was published
    Updated { title_count: usize },

    /// Fetching or parsing failed
    Unavailable {
        failure: FailureContext,
        /// Whether the previous snapshot is still being served
        retained: bool,
    },
}
