//! Per-item user state: favorites, download counts, ratings, notes, and
//! reading progress, written through to the local store on every change.
//!
//! Item identity (`BookItem.id`) is the sole association key here. Ledger
//! entries outlive the result sets that created them and may reference
//! ids no longer on screen. That is expected, not an error, and nothing
//! is ever pruned automatically.

mod snapshot;
mod types;

pub use snapshot::{ImportError, ImportReport};
pub use types::{ReadProgress, StateSnapshot};

use crate::store::{self, KvStore, StoreError};
use std::collections::HashMap;
use std::sync::Arc;

/// Storage keys. The names are load-bearing: state directories written by
/// earlier releases must keep loading unchanged.
pub const FAVORITES_KEY: &str = "favBooks";
pub const COUNTS_KEY: &str = "downloadCounts";
pub const PROGRESS_KEY: &str = "readProgress";
pub const RATINGS_KEY: &str = "ratings";
pub const NOTES_INDEX_KEY: &str = "notes_index";
pub const NOTE_KEY_PREFIX: &str = "notes_";

pub const MAX_RATING: u8 = 5;

pub struct Ledger {
    store: Arc<dyn KvStore>,
    favorites: Vec<String>,
    counts: HashMap<String, u32>,
    ratings: HashMap<String, u8>,
    progress: HashMap<String, ReadProgress>,
    notes_index: HashMap<String, bool>,
}

impl Ledger {
    /// Hydrate the ledger from `store`. Absent or corrupt collections
    /// start empty rather than failing the open.
    pub fn open(store: Arc<dyn KvStore>) -> Self {
        let favorites = store::load_json_or(store.as_ref(), FAVORITES_KEY, Vec::new());
        let counts = store::load_json_or(store.as_ref(), COUNTS_KEY, HashMap::new());
        let ratings = store::load_json_or(store.as_ref(), RATINGS_KEY, HashMap::new());
        let progress = store::load_json_or(store.as_ref(), PROGRESS_KEY, HashMap::new());
        let notes_index = store::load_json_or(store.as_ref(), NOTES_INDEX_KEY, HashMap::new());

        Self {
            store,
            favorites,
            counts,
            ratings,
            progress,
            notes_index,
        }
    }

    // ===== Favorites =====

    /// Flip favorite membership for `id`, persist, and return the new
    /// state (true = now favorited).
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, StoreError> {
        let now_favorite = match self.favorites.iter().position(|f| f == id) {
            Some(at) => {
                self.favorites.remove(at);
                false
            }
            None => {
                self.favorites.push(id.to_string());
                true
            }
        };
        store::save_json(self.store.as_ref(), FAVORITES_KEY, &self.favorites)?;
        Ok(now_favorite)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|f| f == id)
    }

    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn favorite_count(&self) -> usize {
        self.favorites.len()
    }

    // ===== Download counts =====

    /// Count one completed download-link activation. Never decrements.
    pub fn record_download(&mut self, id: &str) -> Result<u32, StoreError> {
        let count = self.counts.entry(id.to_string()).or_insert(0);
        *count += 1;
        let count = *count;
        store::save_json(self.store.as_ref(), COUNTS_KEY, &self.counts)?;
        Ok(count)
    }

    pub fn download_count(&self, id: &str) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    // ===== Ratings =====

    /// Store a rating for `id`, clamped to 0..=[`MAX_RATING`]. 0 means
    /// unrated. Returns the value actually stored.
    pub fn set_rating(&mut self, id: &str, value: u8) -> Result<u8, StoreError> {
        let value = value.min(MAX_RATING);
        self.ratings.insert(id.to_string(), value);
        store::save_json(self.store.as_ref(), RATINGS_KEY, &self.ratings)?;
        Ok(value)
    }

    pub fn rating(&self, id: &str) -> u8 {
        self.ratings
            .get(id)
            .copied()
            .map(|r| r.min(MAX_RATING))
            .unwrap_or(0)
    }

    // ===== Notes =====

    /// Store note text for `id`. Empty text clears the note: the text key
    /// keeps an empty string while the existence index drops its entry,
    /// keeping the annotated-item count accurate.
    pub fn set_note(&mut self, id: &str, text: &str) -> Result<(), StoreError> {
        store::save_json(self.store.as_ref(), &note_key(id), &text)?;
        if text.is_empty() {
            self.notes_index.remove(id);
        } else {
            self.notes_index.insert(id.to_string(), true);
        }
        store::save_json(self.store.as_ref(), NOTES_INDEX_KEY, &self.notes_index)
    }

    pub fn clear_note(&mut self, id: &str) -> Result<(), StoreError> {
        self.set_note(id, "")
    }

    /// Note text for `id`; empty string means no note.
    pub fn note(&self, id: &str) -> String {
        store::load_json_or(self.store.as_ref(), &note_key(id), String::new())
    }

    pub fn has_note(&self, id: &str) -> bool {
        self.notes_index.contains_key(id)
    }

    /// Number of items carrying a note, from the existence index.
    pub fn note_count(&self) -> usize {
        self.notes_index.len()
    }

    // ===== Reading progress =====

    /// Record the reading position for `id`, clamped to [0, 1] and
    /// stamped with the current time. Returns the stored fraction.
    pub fn set_progress(&mut self, id: &str, fraction: f64) -> Result<f64, StoreError> {
        let pos = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let entry = ReadProgress {
            pos,
            updated: chrono::Utc::now().timestamp_millis(),
        };
        self.progress.insert(id.to_string(), entry);
        store::save_json(self.store.as_ref(), PROGRESS_KEY, &self.progress)?;
        Ok(pos)
    }

    pub fn progress(&self, id: &str) -> Option<&ReadProgress> {
        self.progress.get(id)
    }

    // ===== Backup =====

    /// Snapshot of favorites, counts, and progress for external backup.
    pub fn export_state(&self) -> StateSnapshot {
        StateSnapshot {
            favorites: self.favorites.clone(),
            counts: self.counts.clone(),
            progress: self.progress.clone(),
        }
    }

    pub fn export_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(&self.export_state())
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Merge an exported document (or any object with a `favorites`
    /// string array) into the favorites set. Set union: nothing removed,
    /// nothing duplicated. Invalid payloads are rejected whole.
    pub fn import_favorites(&mut self, json: &str) -> Result<ImportReport, ImportError> {
        let incoming = snapshot::parse_favorites(json)?;

        let mut added = 0;
        for id in incoming {
            if !self.favorites.iter().any(|f| *f == id) {
                self.favorites.push(id);
                added += 1;
            }
        }

        if added > 0 {
            store::save_json(self.store.as_ref(), FAVORITES_KEY, &self.favorites)?;
        }

        tracing::debug!("Imported {} new favorites", added);
        Ok(ImportReport {
            added,
            total: self.favorites.len(),
        })
    }
}

fn note_key(id: &str) -> String {
    format!("{}{}", NOTE_KEY_PREFIX, id)
}
