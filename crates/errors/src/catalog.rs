//! Catalog error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {message}")]
    Unavailable { message: String },

    #[error("malformed catalog: {message}")]
    Malformed { message: String },

    #[error("title not found: {id}")]
    TitleNotFound { id: String },

    #[error("no title at catalog position {index}")]
    IndexOutOfRange { index: usize },
}

impl UserFacingError for CatalogError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Unavailable { .. } => {
                Some("Check your network connection; the catalog is refreshed periodically.")
            }
            Self::TitleNotFound { .. } | Self::IndexOutOfRange { .. } => {
                Some("Run `arcade list` to see the titles currently in the catalog.")
            }
            Self::Malformed { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Unavailable { .. } => "catalog.unavailable",
            Self::Malformed { .. } => "catalog.malformed",
            Self::TitleNotFound { .. } => "catalog.title_not_found",
            Self::IndexOutOfRange { .. } => "catalog.index_out_of_range",
        };
        Some(code)
    }
}
