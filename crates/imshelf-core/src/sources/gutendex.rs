//! Gutendex source adapter (Project Gutenberg catalog)
//!
//! API docs: https://gutendex.com/
//! Paging: 1-based page numbers. No API key.

use super::traits::{PageScheme, SearchPage, SourceError, SourceMetadata};
use crate::domain::{BookItem, Source};
use crate::http::{HttpClient, HttpError};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct GutendexResponse {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    results: Vec<GutendexBook>,
}

#[derive(Debug, Deserialize)]
struct GutendexBook {
    id: Option<u64>,
    title: Option<String>,
    #[serde(default)]
    authors: Vec<GutendexPerson>,
    #[serde(default)]
    subjects: Vec<String>,
    /// MIME type to downloadable-format URL.
    #[serde(default)]
    formats: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct GutendexPerson {
    name: Option<String>,
}

pub struct GutendexSource {
    client: HttpClient,
    base_url: String,
}

impl GutendexSource {
    pub fn new() -> Self {
        Self::with_base_url("https://gutendex.com")
    }

    /// Point the adapter at a different endpoint (tests, mirrors).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: HttpClient::new("imshelf/1.0"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn metadata() -> SourceMetadata {
        SourceMetadata {
            id: "gutendex",
            name: "Gutendex",
            description: "Search API over the Project Gutenberg public domain catalog",
            base_url: "https://gutendex.com",
            page_scheme: PageScheme::PageNumber,
            requires_api_key: false,
        }
    }

    /// Parse a Gutendex search response body.
    pub fn parse_search_response(json: &str) -> Result<SearchPage, SourceError> {
        let response: GutendexResponse = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Invalid Gutendex JSON: {}", e)))?;

        let items = response.results.into_iter().filter_map(parse_book).collect();
        Ok(SearchPage {
            items,
            total: response.count,
        })
    }

    /// Convert a raw provider response into a page. Non-success statuses
    /// and unreadable bodies soft-fail to an empty page.
    pub fn page_from_response(status: u16, body: &str) -> SearchPage {
        if !(200..300).contains(&status) {
            tracing::warn!("Gutendex returned status {}, treating as empty", status);
            return SearchPage::empty();
        }
        match Self::parse_search_response(body) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Gutendex response unreadable: {}, treating as empty", e);
                SearchPage::empty()
            }
        }
    }

    /// Search the catalog. `page` is 1-based.
    ///
    /// Provider outages soft-fail to an empty page so the other provider
    /// is never blocked; an empty query short-circuits without a request.
    pub async fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<SearchPage, SourceError> {
        if query.is_empty() {
            return Ok(SearchPage::empty());
        }

        let url = format!("{}/books", self.base_url);
        let page_param = page.to_string();
        let size_param = page_size.to_string();
        let params = [
            ("search", query),
            ("page", page_param.as_str()),
            ("page_size", size_param.as_str()),
        ];

        let response = match self.client.get_with_params(&url, &params).await {
            Ok(response) => response,
            Err(e @ HttpError::InvalidUrl { .. }) => return Err(e.into()),
            Err(e) => {
                tracing::warn!("Gutendex request failed: {}, treating as empty", e);
                return Ok(SearchPage::empty());
            }
        };

        Ok(Self::page_from_response(response.status, &response.body))
    }
}

impl Default for GutendexSource {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_book(book: GutendexBook) -> Option<BookItem> {
    let id = book.id?;
    let title = book.title?;

    let authors = book
        .authors
        .into_iter()
        .filter_map(|a| a.name)
        .collect::<Vec<_>>()
        .join(", ");

    let mut formats = book.formats;

    Some(BookItem {
        id: format!("gut-{}", id),
        title,
        authors,
        thumbnail: formats.remove("image/jpeg"),
        cover: None,
        pdf: formats.remove("application/pdf"),
        epub: formats.remove("application/epub+zip"),
        preview_link: None,
        tags: book.subjects,
        source: Source::Gutendex,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "count": 42,
        "results": [{
            "id": 1342,
            "title": "Pride and Prejudice",
            "authors": [{"name": "Austen, Jane"}],
            "subjects": ["Courtship -- Fiction", "England -- Fiction"],
            "formats": {
                "image/jpeg": "https://gutendex.com/cache/1342/cover.jpg",
                "application/epub+zip": "https://gutendex.com/ebooks/1342.epub",
                "text/html": "https://gutendex.com/ebooks/1342.html"
            }
        }]
    }"#;

    #[test]
    fn test_parse_search_response() {
        let page = GutendexSource::parse_search_response(SAMPLE_RESPONSE).unwrap();
        assert_eq!(page.total, 42);
        assert_eq!(page.items.len(), 1);

        let item = &page.items[0];
        assert_eq!(item.id, "gut-1342");
        assert_eq!(item.title, "Pride and Prejudice");
        assert_eq!(item.authors, "Austen, Jane");
        assert_eq!(
            item.thumbnail.as_deref(),
            Some("https://gutendex.com/cache/1342/cover.jpg")
        );
        assert_eq!(item.pdf, None);
        assert!(item.epub.is_some());
        assert_eq!(item.source, Source::Gutendex);
        assert_eq!(item.tags.len(), 2);
    }

    #[test]
    fn test_parse_tolerates_missing_optional_fields() {
        let json = r#"{"count": 1, "results": [{"id": 7, "title": "Bare"}]}"#;
        let page = GutendexSource::parse_search_response(json).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].authors, "");
        assert_eq!(page.items[0].thumbnail, None);
    }

    #[test]
    fn test_parse_skips_records_without_title() {
        let json = r#"{"count": 2, "results": [{"id": 7}, {"id": 8, "title": "Kept"}]}"#;
        let page = GutendexSource::parse_search_response(json).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "gut-8");
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        assert!(GutendexSource::parse_search_response("not json").is_err());
    }

    #[test]
    fn test_non_success_status_soft_fails() {
        let page = GutendexSource::page_from_response(500, "irrelevant");
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_unreadable_body_soft_fails() {
        let page = GutendexSource::page_from_response(200, "<html>rate limited</html>");
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits() {
        let source = GutendexSource::with_base_url("http://127.0.0.1:1");
        let page = source.search("", 1, 12).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }
}
