//! Catalog wire format

use arcade_errors::{CatalogError, Error};
use arcade_types::{Platform, TitleDescriptor, TitleId};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Ordered titles as published by the catalog service
pub type Titles = Vec<Arc<TitleDescriptor>>;

/// Catalog fields that may be published as JSON strings or numbers
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Token {
    Text(String),
    Number(serde_json::Number),
}

impl Token {
    fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

/// One element of the catalog array
#[derive(Debug, Clone, Deserialize)]
struct CatalogEntry {
    id: Option<Token>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    picture: Option<String>,
    #[serde(default)]
    windows: Option<String>,
    #[serde(default)]
    mac: Option<String>,
    #[serde(default)]
    linux: Option<String>,
    #[serde(default)]
    winver: Option<Token>,
    #[serde(default)]
    macver: Option<Token>,
    #[serde(default)]
    linuxver: Option<Token>,
}

impl CatalogEntry {
    fn into_descriptor(self, position: usize) -> Result<TitleDescriptor, Error> {
        let id = self
            .id
            .map(Token::into_string)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| CatalogError::Malformed {
                message: format!("entry {position} has no id"),
            })?;

        let mut download_url_by_platform = BTreeMap::new();
        for (platform, url) in [
            (Platform::Windows, self.windows),
            (Platform::MacOs, self.mac),
            (Platform::Linux, self.linux),
        ] {
            if let Some(url) = url.filter(|url| !url.is_empty()) {
                download_url_by_platform.insert(platform, url);
            }
        }

        let mut version_by_platform = BTreeMap::new();
        for (platform, version) in [
            (Platform::Windows, self.winver),
            (Platform::MacOs, self.macver),
            (Platform::Linux, self.linuxver),
        ] {
            if let Some(version) = version {
                version_by_platform.insert(platform, version.into_string());
            }
        }

        Ok(TitleDescriptor {
            id: TitleId::new(id),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            picture_url: self.picture.unwrap_or_default(),
            download_url_by_platform,
            version_by_platform,
        })
    }
}

/// Parse the catalog body, a JSON array of titles
///
/// # Errors
///
/// Returns `CatalogError::Malformed` if the body is not a JSON array or an
/// element is missing its id.
pub fn parse_catalog(json: &str) -> Result<Titles, Error> {
    let entries: Vec<CatalogEntry> =
        serde_json::from_str(json).map_err(|e| CatalogError::Malformed {
            message: format!("invalid catalog JSON: {e}"),
        })?;

    entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| entry.into_descriptor(position).map(Arc::new))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_fields_are_stringified() {
        let titles =
            parse_catalog(r#"[{"id": 7, "name": "Seven", "winver": 3, "macver": "3.1"}]"#)
                .unwrap();
        assert_eq!(titles[0].id.as_str(), "7");
        assert_eq!(titles[0].version(Platform::Windows), "3");
        assert_eq!(titles[0].version(Platform::MacOs), "3.1");
    }

    #[test]
    fn test_empty_urls_are_dropped() {
        let titles = parse_catalog(r#"[{"id": "g1", "windows": "", "mac": "http://x/g1.zip"}]"#)
            .unwrap();
        assert!(titles[0].download_url(Platform::Windows).is_none());
        assert_eq!(
            titles[0].download_url(Platform::MacOs),
            Some("http://x/g1.zip")
        );
    }

    #[test]
    fn test_missing_id_rejected() {
        let error = parse_catalog(r#"[{"id": "g1"}, {"name": "anonymous"}]"#).unwrap_err();
        assert!(matches!(
            error,
            Error::Catalog(CatalogError::Malformed { .. })
        ));
    }

    #[test]
    fn test_non_array_rejected() {
        assert!(parse_catalog(r#"{"id": "g1"}"#).is_err());
        assert!(parse_catalog("<html>").is_err());
    }
}
