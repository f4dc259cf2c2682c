//! Common types for the catalog source adapters

use crate::domain::BookItem;
use crate::http::HttpError;
use thiserror::Error;

/// One provider page of normalized results.
#[derive(Clone, Debug, Default)]
pub struct SearchPage {
    pub items: Vec<BookItem>,
    /// The provider's total match count, not the page length.
    pub total: u64,
}

impl SearchPage {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Metadata about a source
pub struct SourceMetadata {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub base_url: &'static str,
    pub page_scheme: PageScheme,
    pub requires_api_key: bool,
}

/// How a provider pages its results. The session hides this asymmetry
/// behind a single 1-based page notion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageScheme {
    /// 1-based page numbers.
    PageNumber,
    /// 0-based item offsets.
    Offset,
}
