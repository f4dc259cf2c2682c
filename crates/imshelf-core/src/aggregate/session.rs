//! Search session: owns the query/page/result state, runs both providers
//! concurrently, and discards stale in-flight responses.
//!
//! All search state lives in one explicit struct so merge and projection
//! logic can be exercised without any rendering or storage side effects.

use super::merge;
use crate::domain::BookItem;
use crate::ledger::Ledger;
use crate::projection::{self, SortOrder, SourceFilter};
use crate::sources::{GoogleBooksSource, GutendexSource, SearchPage, SourceError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// Results requested from each provider per page.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Quiescence window for typed queries.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(450);

/// Query used for the initial explore view.
pub const EXPLORE_QUERY: &str = "computer science";

#[derive(Error, Debug)]
pub enum SearchError {
    /// Both providers failed in a way soft-fail does not cover. The
    /// session stays usable; retrying needs no reset.
    #[error("Search failed: gutendex: {gutendex}; google: {google}")]
    Failed { gutendex: String, google: String },
}

/// Per-provider totals reported for the last fresh search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResultTotals {
    pub gutendex: u64,
    pub google: u64,
}

/// What a call to [`SearchSession::run_search`] produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results stored; `shown` items now in the result set.
    Fresh { shown: usize, totals: ResultTotals },
    /// A newer search started while this one was in flight; session state
    /// was left untouched.
    Stale,
}

#[derive(Debug)]
struct SessionState {
    query: String,
    page: u32,
    results: Vec<BookItem>,
    totals: ResultTotals,
    filter: SourceFilter,
    sort: SortOrder,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            results: Vec::new(),
            totals: ResultTotals::default(),
            filter: SourceFilter::All,
            sort: SortOrder::Relevance,
        }
    }
}

pub struct SearchSession {
    gutendex: GutendexSource,
    google: GoogleBooksSource,
    page_size: u32,
    seq: AtomicU64,
    state: Mutex<SessionState>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::with_sources(GutendexSource::new(), GoogleBooksSource::new())
    }

    /// Build a session over specific source adapters (tests, mirrors).
    pub fn with_sources(gutendex: GutendexSource, google: GoogleBooksSource) -> Self {
        Self {
            gutendex,
            google,
            page_size: DEFAULT_PAGE_SIZE,
            seq: AtomicU64::new(0),
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Run one search across both providers and store the merged result.
    ///
    /// `page` is 1-based; the Google offset is derived from it, hiding the
    /// providers' paging asymmetry. Both requests are issued together and
    /// joined; the merge never runs on a partial pair. Each request gets
    /// a sequence number; if a newer search starts while this one is in
    /// flight the response is discarded and [`SearchOutcome::Stale`] comes
    /// back with the session state untouched.
    ///
    /// `uploads` is the current local shelf; entries whose title contains
    /// the query are prepended to the merged remote results.
    pub async fn run_search(
        &self,
        query: &str,
        page: u32,
        uploads: &[BookItem],
    ) -> Result<SearchOutcome, SearchError> {
        let query = query.trim();
        let ticket = self.begin_request();

        if query.is_empty() {
            let totals = ResultTotals::default();
            let mut state = self.lock_state();
            state.query.clear();
            state.page = page.max(1);
            state.results.clear();
            state.totals = totals;
            return Ok(SearchOutcome::Fresh { shown: 0, totals });
        }

        let start_index = page.saturating_sub(1) * self.page_size;
        let (gutendex, google) = tokio::join!(
            self.gutendex.search(query, page, self.page_size),
            self.google.search(query, start_index, self.page_size),
        );

        // Join barrier passed; drop the response if a newer search
        // started while these requests were in flight.
        if !self.is_current(ticket) {
            tracing::debug!("Discarding stale response for '{}' (ticket {})", query, ticket);
            return Ok(SearchOutcome::Stale);
        }

        let (gut_page, goog_page) = match (gutendex, google) {
            (Err(gut_err), Err(goog_err)) => {
                return Err(SearchError::Failed {
                    gutendex: gut_err.to_string(),
                    google: goog_err.to_string(),
                })
            }
            (gutendex, google) => (
                page_or_empty(gutendex, "gutendex"),
                page_or_empty(google, "google"),
            ),
        };

        let matched = merge::uploads_matching(uploads, query);
        let results = merge::assemble(matched, gut_page.items, goog_page.items);
        let totals = ResultTotals {
            gutendex: gut_page.total,
            google: goog_page.total,
        };

        let mut state = self.lock_state();
        state.query = query.to_string();
        state.page = page.max(1);
        state.results = results;
        state.totals = totals;
        Ok(SearchOutcome::Fresh {
            shown: state.results.len(),
            totals,
        })
    }

    /// The displayed list: current filter and sort applied over the
    /// cached result set. Pure with respect to the ledger: a changed
    /// download count shows up on the next call, not before.
    pub fn visible_items(&self, ledger: &Ledger) -> Vec<BookItem> {
        let state = self.lock_state();
        projection::project(&state.results, state.filter, state.sort, |id| {
            ledger.download_count(id)
        })
    }

    pub fn set_filter(&self, filter: SourceFilter) {
        self.lock_state().filter = filter;
    }

    pub fn filter(&self) -> SourceFilter {
        self.lock_state().filter
    }

    pub fn set_sort(&self, sort: SortOrder) {
        self.lock_state().sort = sort;
    }

    pub fn sort(&self) -> SortOrder {
        self.lock_state().sort
    }

    /// The raw aggregated result set from the last fresh search.
    pub fn results(&self) -> Vec<BookItem> {
        self.lock_state().results.clone()
    }

    pub fn results_len(&self) -> usize {
        self.lock_state().results.len()
    }

    pub fn last_query(&self) -> String {
        self.lock_state().query.clone()
    }

    pub fn page(&self) -> u32 {
        self.lock_state().page
    }

    pub fn totals(&self) -> ResultTotals {
        self.lock_state().totals
    }

    fn begin_request(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.seq.load(Ordering::SeqCst) == ticket
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[cfg(test)]
    fn install_results(&self, items: Vec<BookItem>) {
        self.lock_state().results = items;
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

fn page_or_empty(result: Result<SearchPage, SourceError>, provider: &str) -> SearchPage {
    match result {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("{} failed past soft-fail: {}, treating as empty", provider, e);
            SearchPage::empty()
        }
    }
}

/// Debounces typed queries: a fetch should run only once input has been
/// idle for the quiescence window.
pub struct QueryDebouncer {
    window: Duration,
    generation: AtomicU64,
}

impl QueryDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: AtomicU64::new(0),
        }
    }

    /// Register a keystroke and wait out the quiescence window.
    ///
    /// Returns true when no newer keystroke arrived in the meantime, in
    /// which case the caller should run the search. Calls superseded by a
    /// later keystroke resolve false.
    pub async fn settle(&self) -> bool {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.window).await;
        self.generation.load(Ordering::SeqCst) == generation
    }
}

impl Default for QueryDebouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}
