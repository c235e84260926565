//! Search side of the app: the query string, the result list, and the
//! trending slice shown while no search is active.
//!
//! The controller never performs I/O. `submit` hands back a [`SearchTicket`]
//! describing the request to run; whoever runs it feeds the answer back
//! through [`SearchController::resolve`]. Only the most recent ticket is ever
//! applied, so a slow answer to an old query cannot clobber a newer one.

use tracing::{debug, warn};

use crate::api::SearchOutcome;
use crate::error::ApiError;
use crate::models::ResultSummary;

/// Trending keeps at most this many items.
pub const TRENDING_LIMIT: usize = 8;
/// Shown for transport failures instead of the raw cause.
pub const SEARCH_FAILED_MESSAGE: &str = "Failed to fetch movies. Please try again later.";
/// Shown when the API rejects a search without giving a reason.
pub const NO_RESULTS_MESSAGE: &str = "No results found";

/// What the search area is currently in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchView {
    /// No search yet (or the last error was dismissed).
    Idle,
    Loading,
    Results(Vec<ResultSummary>),
    /// A search completed without matches.
    Empty,
    Error(String),
}

/// Render decision derived from the view and the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Showing<'a> {
    Loading,
    Error(&'a str),
    Results(&'a [ResultSummary]),
    NoMatches,
    Trending(&'a [ResultSummary]),
}

/// A title search waiting to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Owns the query, the trending slice and the current [`SearchView`]. At
/// most one search is pending; its sequence number gates `resolve`.
#[derive(Debug)]
pub struct SearchController {
    query: String,
    trending: Vec<ResultSummary>,
    view: SearchView,
    next_seq: u64,
    pending: Option<u64>,
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchController {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            trending: Vec::new(),
            view: SearchView::Idle,
            next_seq: 0,
            pending: None,
        }
    }

    /// The query as typed, untrimmed.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn view(&self) -> &SearchView {
        &self.view
    }

    /// At most [`TRENDING_LIMIT`] items, empty until trending succeeds.
    pub fn trending(&self) -> &[ResultSummary] {
        &self.trending
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.view, SearchView::Loading)
    }

    /// Replace the query text while the user is typing. Does not search.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Empty the query. The trending set comes back on its own once there is
    /// neither a query nor a result list.
    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    /// Store the outcome of the one-off trending request. Failures leave the
    /// trending set empty and are only logged.
    pub fn apply_trending(&mut self, result: Result<SearchOutcome, ApiError>) {
        match result {
            Ok(SearchOutcome::Found(mut items)) => {
                items.truncate(TRENDING_LIMIT);
                debug!(count = items.len(), "trending loaded");
                self.trending = items;
            }
            Ok(SearchOutcome::Rejected(message)) => {
                warn!(message = message.as_deref().unwrap_or(""), "trending rejected");
            }
            Err(err) => {
                warn!(error = ?err, "trending request failed");
            }
        }
    }

    /// Start a search for `query`. Blank queries are ignored and leave every
    /// piece of state untouched.
    pub fn submit(&mut self, query: &str) -> Option<SearchTicket> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.query = query.to_string();
        self.next_seq += 1;
        self.pending = Some(self.next_seq);
        self.view = SearchView::Loading;

        Some(SearchTicket {
            seq: self.next_seq,
            query: trimmed.to_string(),
        })
    }

    /// Apply the answer for `ticket`. Returns `false` when the ticket is stale
    /// or was already resolved, in which case nothing changes.
    pub fn resolve(
        &mut self,
        ticket: &SearchTicket,
        result: Result<SearchOutcome, ApiError>,
    ) -> bool {
        if self.pending != Some(ticket.seq) {
            debug!(seq = ticket.seq, "dropping stale search response");
            return false;
        }
        self.pending = None;

        self.view = match result {
            Ok(SearchOutcome::Found(items)) if items.is_empty() => SearchView::Empty,
            Ok(SearchOutcome::Found(items)) => SearchView::Results(items),
            Ok(SearchOutcome::Rejected(Some(message))) => SearchView::Error(message),
            Ok(SearchOutcome::Rejected(None)) => SearchView::Empty,
            Err(err) => {
                warn!(
                    query = ticket.query.as_str(),
                    error = ?err,
                    "search request failed"
                );
                SearchView::Error(SEARCH_FAILED_MESSAGE.to_string())
            }
        };
        true
    }

    /// Dismiss an error and go back to the trending view without searching.
    pub fn clear_error(&mut self) {
        if matches!(self.view, SearchView::Error(_)) {
            self.view = SearchView::Idle;
        }
    }

    /// What the content area should draw. Trending fills in whenever there
    /// is nothing more specific to show.
    pub fn showing(&self) -> Showing<'_> {
        match &self.view {
            SearchView::Loading => Showing::Loading,
            SearchView::Error(message) => Showing::Error(message),
            SearchView::Results(items) => Showing::Results(items),
            SearchView::Empty if !self.query.trim().is_empty() => Showing::NoMatches,
            SearchView::Empty | SearchView::Idle => Showing::Trending(&self.trending),
        }
    }

    /// Cards currently on screen, in display order.
    pub fn visible_items(&self) -> &[ResultSummary] {
        match self.showing() {
            Showing::Results(items) | Showing::Trending(items) => items,
            Showing::Loading | Showing::Error(_) | Showing::NoMatches => &[],
        }
    }
}
