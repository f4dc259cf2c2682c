//! Normalized catalog item shared by both providers and the local shelf

use serde::{Deserialize, Serialize};

/// Origin of a catalog item.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Gutendex,
    Google,
    Upload,
}

impl Source {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Gutendex => "gutendex",
            Source::Google => "google",
            Source::Upload => "upload",
        }
    }

    /// Badge text shown next to an item.
    pub fn label(&self) -> &'static str {
        match self {
            Source::Gutendex => "Gutendex",
            Source::Google => "Google",
            Source::Upload => "Upload",
        }
    }
}

/// A search result normalized to one shape regardless of where it came
/// from.
///
/// Remote items are ephemeral and rebuilt on every search; only uploads
/// are persisted. `id` is namespaced by origin (`gut-<n>`, `gbook-<id>`,
/// `upload-<millis>`) and is the sole key for state association in the
/// ledger. Merge deduplication uses a different key entirely (see
/// `aggregate::merge_key`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookItem {
    pub id: String,
    pub title: String,
    /// Comma-joined display form; not structured per author.
    pub authors: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "previewLink")]
    pub preview_link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub source: Source,
}

impl BookItem {
    /// The image to show for this item, preferring the thumbnail.
    pub fn cover_image(&self) -> Option<&str> {
        self.thumbnail.as_deref().or(self.cover.as_deref())
    }
}
