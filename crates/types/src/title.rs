//! Catalog title types

use crate::Platform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable identifier of a catalog title
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TitleId(String);

impl TitleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TitleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TitleId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TitleId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Immutable snapshot of one catalog entry
///
/// Descriptors are replaced wholesale on every catalog fetch; a running
/// pipeline keeps the `Arc` it captured at decision time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleDescriptor {
    pub id: TitleId,
    pub name: String,
    pub description: String,
    pub picture_url: String,
    /// Download URL per platform. Missing or empty means unavailable.
    pub download_url_by_platform: BTreeMap<Platform, String>,
    /// Opaque version token per platform
    pub version_by_platform: BTreeMap<Platform, String>,
}

impl TitleDescriptor {
    /// Download URL for `platform`, if one is published
    #[must_use]
    pub fn download_url(&self, platform: Platform) -> Option<&str> {
        self.download_url_by_platform
            .get(&platform)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }

    /// Version token for `platform`; an unpublished version reads as empty
    #[must_use]
    pub fn version(&self, platform: Platform) -> &str {
        self.version_by_platform
            .get(&platform)
            .map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> TitleDescriptor {
        TitleDescriptor {
            id: TitleId::from("g1"),
            name: "Game One".into(),
            description: String::new(),
            picture_url: String::new(),
            download_url_by_platform: BTreeMap::from([
                (Platform::Windows, "http://x/g1.zip".to_string()),
                (Platform::MacOs, String::new()),
            ]),
            version_by_platform: BTreeMap::from([(Platform::Windows, "2".to_string())]),
        }
    }

    #[test]
    fn test_empty_url_is_unavailable() {
        let d = descriptor();
        assert_eq!(d.download_url(Platform::Windows), Some("http://x/g1.zip"));
        assert_eq!(d.download_url(Platform::MacOs), None);
        assert_eq!(d.download_url(Platform::Linux), None);
    }

    #[test]
    fn test_missing_version_is_empty() {
        let d = descriptor();
        assert_eq!(d.version(Platform::Windows), "2");
        assert_eq!(d.version(Platform::Linux), "");
    }
}
