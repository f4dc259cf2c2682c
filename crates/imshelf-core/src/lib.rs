//! imshelf-core: aggregation and reconciliation core for the imshelf
//! book discovery and personal-library app
//!
//! This library provides pure Rust implementations of:
//! - Catalog clients for the Gutendex and Google Books search APIs
//! - Merging, deduplication, and ordering of concurrently fetched
//!   provider result sets
//! - Filterable, sortable view projection over an aggregated result set
//! - A per-item state ledger (favorites, download counts, ratings,
//!   notes, reading progress) written through to a pluggable key-value
//!   store
//! - Local uploads embedded as data URIs, backup export/import, and
//!   share-link payload encoding
//!
//! Rendering, caching, and event wiring belong to the embedding
//! application; everything here runs host-agnostic.

pub mod aggregate;
pub mod domain;
pub mod http;
pub mod ledger;
pub mod prefs;
pub mod projection;
pub mod share;
pub mod sources;
pub mod store;
pub mod uploads;

// Re-export main types for convenience
pub use aggregate::{
    QueryDebouncer, ResultTotals, SearchError, SearchOutcome, SearchSession, DEBOUNCE_WINDOW,
    DEFAULT_PAGE_SIZE, EXPLORE_QUERY,
};
pub use domain::{BookItem, Source};
pub use ledger::{
    ImportError, ImportReport, Ledger, ReadProgress, StateSnapshot, MAX_RATING,
};
pub use prefs::{load_theme, save_theme, Theme};
pub use projection::{project, SortOrder, SourceFilter};
pub use share::{decode_share_param, encode_share_param, ShareTarget};
pub use sources::{
    GoogleBooksSource, GutendexSource, PageScheme, SearchPage, SourceError, SourceMetadata,
};
pub use store::{load_json_or, save_json, FileStore, KvStore, MemoryStore, StoreError};
pub use uploads::{UploadError, UploadShelf};
