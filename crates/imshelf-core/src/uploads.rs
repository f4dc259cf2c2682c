//! Locally uploaded documents, kept on a shelf next to remote results.
//!
//! Uploads are ordinary [`BookItem`]s with `source = Upload` and the
//! document embedded as a data URI; they are created here, persisted
//! under one store key, and never fetched remotely.

use crate::aggregate::merge;
use crate::domain::{BookItem, Source};
use crate::store::{self, KvStore, StoreError};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::sync::Arc;
use thiserror::Error;

pub const UPLOADS_KEY: &str = "uploads";

const PDF_MIME: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Error, Debug)]
pub enum UploadError {
    /// Only PDF uploads are accepted; the check runs before any encoding
    /// work touches the bytes.
    #[error("Unsupported upload type: {0}")]
    UnsupportedType(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct UploadShelf {
    store: Arc<dyn KvStore>,
    items: Vec<BookItem>,
}

impl UploadShelf {
    /// Hydrate the shelf from `store`; an absent or corrupt uploads list
    /// starts empty.
    pub fn open(store: Arc<dyn KvStore>) -> Self {
        let items = store::load_json_or(store.as_ref(), UPLOADS_KEY, Vec::new());
        Self { store, items }
    }

    /// Add a PDF upload, newest first. `declared_mime` comes from the
    /// host's file picker; bytes carrying the `%PDF-` magic pass
    /// regardless of what was declared.
    pub fn add(
        &mut self,
        title: &str,
        authors: &str,
        bytes: &[u8],
        declared_mime: &str,
    ) -> Result<&BookItem, UploadError> {
        if declared_mime != PDF_MIME && !bytes.starts_with(PDF_MAGIC) {
            return Err(UploadError::UnsupportedType(declared_mime.to_string()));
        }

        let title = title.trim();
        let title = if title.is_empty() { "Untitled upload" } else { title };
        let authors = authors.trim();
        let authors = if authors.is_empty() { "Unknown" } else { authors };

        let item = BookItem {
            id: format!("upload-{}", chrono::Utc::now().timestamp_millis()),
            title: title.to_string(),
            authors: authors.to_string(),
            thumbnail: None,
            cover: None,
            pdf: Some(format!("data:{};base64,{}", PDF_MIME, STANDARD.encode(bytes))),
            epub: None,
            preview_link: None,
            tags: Vec::new(),
            source: Source::Upload,
        };

        self.items.insert(0, item);
        store::save_json(self.store.as_ref(), UPLOADS_KEY, &self.items)?;
        Ok(&self.items[0])
    }

    pub fn items(&self) -> &[BookItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&BookItem> {
        self.items.iter().find(|u| u.id == id)
    }

    /// Uploads whose title contains `query`, any case.
    pub fn matching(&self, query: &str) -> Vec<BookItem> {
        merge::uploads_matching(&self.items, query)
    }

    /// Remove an upload by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        let before = self.items.len();
        self.items.retain(|u| u.id != id);
        let removed = self.items.len() != before;
        if removed {
            store::save_json(self.store.as_ref(), UPLOADS_KEY, &self.items)?;
        }
        Ok(removed)
    }
}
