//! Google Books source adapter (volumes search)
//!
//! API docs: https://developers.google.com/books/docs/v1/using
//! Paging: 0-based start offsets. API key optional for search.

use super::traits::{PageScheme, SearchPage, SourceError, SourceMetadata};
use crate::domain::{BookItem, Source};
use crate::http::{HttpClient, HttpError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(rename = "totalItems", default)]
    total_items: u64,
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    id: Option<String>,
    #[serde(rename = "volumeInfo")]
    volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Deserialize)]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    #[serde(rename = "imageLinks")]
    image_links: Option<ImageLinks>,
    #[serde(rename = "previewLink")]
    preview_link: Option<String>,
    #[serde(default)]
    categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ImageLinks {
    thumbnail: Option<String>,
}

pub struct GoogleBooksSource {
    client: HttpClient,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksSource {
    pub fn new() -> Self {
        Self::with_base_url("https://www.googleapis.com/books/v1")
    }

    /// Point the adapter at a different endpoint (tests, proxies).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: HttpClient::new("imshelf/1.0"),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Send a Google Books API key on every request.
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn metadata() -> SourceMetadata {
        SourceMetadata {
            id: "google",
            name: "Google Books",
            description: "General book metadata from the Google Books volumes API",
            base_url: "https://www.googleapis.com/books/v1",
            page_scheme: PageScheme::Offset,
            requires_api_key: false,
        }
    }

    /// Parse a volumes search response body.
    pub fn parse_search_response(json: &str) -> Result<SearchPage, SourceError> {
        let response: VolumesResponse = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Invalid Google Books JSON: {}", e)))?;

        let items = response
            .items
            .into_iter()
            .filter_map(parse_volume)
            .collect();
        Ok(SearchPage {
            items,
            total: response.total_items,
        })
    }

    /// Convert a raw provider response into a page. Non-success statuses
    /// and unreadable bodies soft-fail to an empty page.
    pub fn page_from_response(status: u16, body: &str) -> SearchPage {
        if !(200..300).contains(&status) {
            tracing::warn!("Google Books returned status {}, treating as empty", status);
            return SearchPage::empty();
        }
        match Self::parse_search_response(body) {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Google Books response unreadable: {}, treating as empty", e);
                SearchPage::empty()
            }
        }
    }

    /// Search the catalog. `start_index` is a 0-based item offset.
    ///
    /// Provider outages soft-fail to an empty page so the other provider
    /// is never blocked; an empty query short-circuits without a request.
    pub async fn search(
        &self,
        query: &str,
        start_index: u32,
        max_results: u32,
    ) -> Result<SearchPage, SourceError> {
        if query.is_empty() {
            return Ok(SearchPage::empty());
        }

        let url = format!("{}/volumes", self.base_url);
        let start_param = start_index.to_string();
        let max_param = max_results.to_string();
        let mut params = vec![
            ("q", query),
            ("startIndex", start_param.as_str()),
            ("maxResults", max_param.as_str()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("key", key.as_str()));
        }

        let response = match self.client.get_with_params(&url, &params).await {
            Ok(response) => response,
            Err(e @ HttpError::InvalidUrl { .. }) => return Err(e.into()),
            Err(e) => {
                tracing::warn!("Google Books request failed: {}, treating as empty", e);
                return Ok(SearchPage::empty());
            }
        };

        Ok(Self::page_from_response(response.status, &response.body))
    }
}

impl Default for GoogleBooksSource {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_volume(volume: Volume) -> Option<BookItem> {
    let id = volume.id?;
    let info = volume.volume_info?;
    let title = info.title?;

    Some(BookItem {
        id: format!("gbook-{}", id),
        title,
        authors: info.authors.join(", "),
        thumbnail: info.image_links.and_then(|l| l.thumbnail),
        cover: None,
        pdf: None,
        epub: None,
        preview_link: info.preview_link,
        tags: info.categories,
        source: Source::Google,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "totalItems": 212,
        "items": [{
            "id": "s1gVAAAAYAAJ",
            "volumeInfo": {
                "title": "Pride and Prejudice",
                "authors": ["Jane Austen"],
                "imageLinks": {"thumbnail": "https://books.google.com/thumb?id=s1gVAAAAYAAJ"},
                "previewLink": "https://books.google.com/books?id=s1gVAAAAYAAJ",
                "categories": ["Fiction"]
            }
        }]
    }"#;

    #[test]
    fn test_parse_search_response() {
        let page = GoogleBooksSource::parse_search_response(SAMPLE_RESPONSE).unwrap();
        assert_eq!(page.total, 212);
        assert_eq!(page.items.len(), 1);

        let item = &page.items[0];
        assert_eq!(item.id, "gbook-s1gVAAAAYAAJ");
        assert_eq!(item.title, "Pride and Prejudice");
        assert_eq!(item.authors, "Jane Austen");
        assert!(item.thumbnail.is_some());
        assert!(item.preview_link.is_some());
        assert_eq!(item.pdf, None);
        assert_eq!(item.source, Source::Google);
    }

    #[test]
    fn test_parse_tolerates_missing_optional_fields() {
        let json = r#"{"totalItems": 1, "items": [{"id": "x", "volumeInfo": {"title": "Bare"}}]}"#;
        let page = GoogleBooksSource::parse_search_response(json).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].authors, "");
        assert_eq!(page.items[0].thumbnail, None);
        assert_eq!(page.items[0].preview_link, None);
    }

    #[test]
    fn test_parse_skips_volumes_without_title() {
        let json = r#"{"totalItems": 2, "items": [
            {"id": "a", "volumeInfo": {}},
            {"id": "b", "volumeInfo": {"title": "Kept"}}
        ]}"#;
        let page = GoogleBooksSource::parse_search_response(json).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "gbook-b");
    }

    #[test]
    fn test_parse_tolerates_missing_items_array() {
        let json = r#"{"totalItems": 0}"#;
        let page = GoogleBooksSource::parse_search_response(json).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_non_success_status_soft_fails() {
        let page = GoogleBooksSource::page_from_response(429, "slow down");
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits() {
        let source = GoogleBooksSource::with_base_url("http://127.0.0.1:1");
        let page = source.search("", 0, 12).await.unwrap();
        assert!(page.items.is_empty());
    }
}
