//! Test fixture loading utilities

use imshelf_core::{BookItem, Source};
use std::path::PathBuf;

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a mock API response fixture
pub fn load_response_fixture(name: &str) -> String {
    let path = fixture_path(&format!("responses/{}", name));
    std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", path.display()))
}

/// Build a bare item for merge and projection tests
pub fn remote_item(id: &str, title: &str, authors: &str, source: Source) -> BookItem {
    BookItem {
        id: id.to_string(),
        title: title.to_string(),
        authors: authors.to_string(),
        thumbnail: None,
        cover: None,
        pdf: None,
        epub: None,
        preview_link: None,
        tags: Vec::new(),
        source,
    }
}
