//! Result aggregation: merging provider pages and session orchestration

pub mod merge;
pub mod session;

pub use merge::{assemble, dedup_results, merge_key, uploads_matching};
pub use session::{
    QueryDebouncer, ResultTotals, SearchError, SearchOutcome, SearchSession, DEBOUNCE_WINDOW,
    DEFAULT_PAGE_SIZE, EXPLORE_QUERY,
};
