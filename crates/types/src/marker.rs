//! Installed-version marker

use crate::TitleId;
use serde::{Deserialize, Serialize};

/// Persisted record of which version of a title is installed
///
/// Wire shape: `{ "id": <titleId>, "version": <token> }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledMarker {
    pub id: TitleId,
    pub version: String,
}

impl InstalledMarker {
    pub fn new(id: TitleId, version: impl Into<String>) -> Self {
        Self {
            id,
            version: version.into(),
        }
    }

    /// Whether this installation matches the catalog's current version token
    #[must_use]
    pub fn is_current(&self, catalog_version: &str) -> bool {
        self.version == catalog_version
    }
}
