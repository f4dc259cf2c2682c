//! Merging and deduplication of provider result pages

use crate::domain::BookItem;
use std::collections::HashSet;

/// Deduplication fingerprint: case-insensitive `title|authors`.
///
/// The two providers assign unrelated ids to the same work, so identity
/// cannot dedup across them. Title+authors is a heuristic key with known
/// false negatives (near-duplicate titles) and rare false positives
/// (distinct works under a coincidentally identical string).
pub fn merge_key(item: &BookItem) -> String {
    format!("{}|{}", item.title, item.authors).to_lowercase()
}

/// Concatenate Gutendex results ahead of Google results and keep the
/// first item per merge key. Gutendex precedence is fixed, not
/// query-dependent.
pub fn dedup_results(gutendex: Vec<BookItem>, google: Vec<BookItem>) -> Vec<BookItem> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(gutendex.len() + google.len());

    for item in gutendex.into_iter().chain(google) {
        if seen.insert(merge_key(&item)) {
            out.push(item);
        }
    }

    out
}

/// Uploads whose title contains `query`, any case.
pub fn uploads_matching(uploads: &[BookItem], query: &str) -> Vec<BookItem> {
    let needle = query.to_lowercase();
    uploads
        .iter()
        .filter(|u| u.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// The full per-request result list: matching uploads prepended to the
/// deduplicated remote results. Uploads are never deduplicated against
/// remote items, even under an identical merge key.
pub fn assemble(
    uploads_matched: Vec<BookItem>,
    gutendex: Vec<BookItem>,
    google: Vec<BookItem>,
) -> Vec<BookItem> {
    let mut out = uploads_matched;
    out.extend(dedup_results(gutendex, google));
    out
}
