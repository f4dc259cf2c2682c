//! Derives the displayed list from the aggregated result set.
//!
//! Projection never mutates the underlying set: re-selecting a filter or
//! sort works off the cached results and needs no new fetch.

use crate::domain::{BookItem, Source};
use std::cmp::Reverse;
use unicode_normalization::UnicodeNormalization;

/// Source bucket selected by the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceFilter {
    #[default]
    All,
    Gutendex,
    Google,
    Upload,
}

impl SourceFilter {
    /// Parse a filter token (`all`, `gutendex`, `google`, `upload`).
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "all" => Some(SourceFilter::All),
            "gutendex" => Some(SourceFilter::Gutendex),
            "google" => Some(SourceFilter::Google),
            "upload" => Some(SourceFilter::Upload),
            _ => None,
        }
    }

    pub fn matches(&self, source: Source) -> bool {
        match self {
            SourceFilter::All => true,
            SourceFilter::Gutendex => source == Source::Gutendex,
            SourceFilter::Google => source == Source::Google,
            SourceFilter::Upload => source == Source::Upload,
        }
    }
}

/// Display order selected by the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Preserve aggregator order.
    #[default]
    Relevance,
    /// Ascending by folded title.
    Title,
    /// Descending by current download count; ties keep aggregator order.
    Downloads,
}

impl SortOrder {
    /// Parse a sort token (`relevance`, `title`, `downloads`).
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "relevance" => Some(SortOrder::Relevance),
            "title" => Some(SortOrder::Title),
            "downloads" => Some(SortOrder::Downloads),
            _ => None,
        }
    }
}

/// Apply `filter` then `sort` to `items` without mutating them.
///
/// `download_count` looks up the current count per item id. The
/// projection itself is pure and idempotent: the same inputs give the
/// same output, and ledger changes only show up on the next call. Both
/// sorts are stable.
pub fn project<F>(
    items: &[BookItem],
    filter: SourceFilter,
    sort: SortOrder,
    download_count: F,
) -> Vec<BookItem>
where
    F: Fn(&str) -> u32,
{
    let mut list: Vec<BookItem> = items
        .iter()
        .filter(|it| filter.matches(it.source))
        .cloned()
        .collect();

    match sort {
        SortOrder::Relevance => {}
        SortOrder::Title => list.sort_by_cached_key(|it| fold_title(&it.title)),
        SortOrder::Downloads => list.sort_by_key(|it| Reverse(download_count(&it.id))),
    }

    list
}

/// Case- and diacritic-insensitive collation key.
fn fold_title(title: &str) -> String {
    title
        .nfkd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn item(id: &str, title: &str, source: Source) -> BookItem {
        BookItem {
            id: id.to_string(),
            title: title.to_string(),
            authors: "Author".to_string(),
            thumbnail: None,
            cover: None,
            pdf: None,
            epub: None,
            preview_link: None,
            tags: Vec::new(),
            source,
        }
    }

    fn sample() -> Vec<BookItem> {
        vec![
            item("gut-1", "Zebra Stories", Source::Gutendex),
            item("gbook-a", "apple picking", Source::Google),
            item("upload-1", "Études", Source::Upload),
        ]
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(SourceFilter::parse("all"), Some(SourceFilter::All));
        assert_eq!(SourceFilter::parse("Google"), Some(SourceFilter::Google));
        assert_eq!(SourceFilter::parse("bogus"), None);
    }

    #[test]
    fn test_filter_buckets() {
        let items = sample();
        let counts = |_: &str| 0;

        let all = project(&items, SourceFilter::All, SortOrder::Relevance, counts);
        assert_eq!(all.len(), 3);

        let uploads = project(&items, SourceFilter::Upload, SortOrder::Relevance, counts);
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].id, "upload-1");
    }

    #[test]
    fn test_relevance_preserves_order() {
        let items = sample();
        let projected = project(&items, SourceFilter::All, SortOrder::Relevance, |_| 0);
        let ids: Vec<&str> = projected.iter().map(|it| it.id.as_str()).collect();
        assert_eq!(ids, vec!["gut-1", "gbook-a", "upload-1"]);
    }

    #[test]
    fn test_title_sort_folds_case_and_diacritics() {
        let items = sample();
        let projected = project(&items, SourceFilter::All, SortOrder::Title, |_| 0);
        let titles: Vec<&str> = projected.iter().map(|it| it.title.as_str()).collect();
        assert_eq!(titles, vec!["apple picking", "Études", "Zebra Stories"]);
    }

    #[test]
    fn test_downloads_sort_is_stable_on_ties() {
        let items = sample();
        let mut counts = HashMap::new();
        counts.insert("gbook-a".to_string(), 5u32);

        let lookup = |id: &str| counts.get(id).copied().unwrap_or(0);
        let projected = project(&items, SourceFilter::All, SortOrder::Downloads, lookup);
        let ids: Vec<&str> = projected.iter().map(|it| it.id.as_str()).collect();
        // gbook-a leads; the tied rest keep aggregator order.
        assert_eq!(ids, vec!["gbook-a", "gut-1", "upload-1"]);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let items = sample();
        let a = project(&items, SourceFilter::All, SortOrder::Title, |_| 0);
        let b = project(&items, SourceFilter::All, SortOrder::Title, |_| 0);
        let ids =
            |list: &[BookItem]| list.iter().map(|it| it.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn test_projection_does_not_mutate_input() {
        let items = sample();
        let _ = project(&items, SourceFilter::All, SortOrder::Title, |_| 0);
        assert_eq!(items[0].id, "gut-1");
    }
}
