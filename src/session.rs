//! State of the current (or most recent) search.
//!
//! Every search is issued a ticket with a monotonically increasing sequence
//! number. A result is applied only if its ticket is the latest one issued,
//! so when searches overlap the most recently *started* one wins.
use crate::errors::CategorizedError;
use crate::models::MovieSummary;
use crate::omdb::{MovieDirectory, SearchPage};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    pub query: String,
    pub page: u32,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    query: String,
    page: u32,
    total_results: u32,
    total_pages: u32,
    results: Vec<MovieSummary>,
    status: SearchStatus,
    error: Option<CategorizedError>,
    latest_seq: u64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_results(&self) -> u32 {
        self.total_results
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn results(&self) -> &[MovieSummary] {
        &self.results
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn error(&self) -> Option<&CategorizedError> {
        self.error.as_ref()
    }

    pub fn has_previous(&self) -> bool {
        self.total_pages > 0 && self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Start a search. An empty query is ignored and yields no ticket.
    pub fn begin(&mut self, query: &str, page: u32) -> Option<SearchTicket> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.latest_seq += 1;
        self.query = query.to_string();
        self.page = page.max(1);
        self.status = SearchStatus::Loading;
        self.error = None;
        Some(SearchTicket {
            seq: self.latest_seq,
            query: self.query.clone(),
            page: self.page,
        })
    }

    /// Apply a finished search. Returns false when a newer search superseded it.
    pub fn complete(
        &mut self,
        ticket: &SearchTicket,
        result: Result<SearchPage, CategorizedError>,
    ) -> bool {
        if ticket.seq != self.latest_seq {
            debug!(
                "Discarding stale result for '{}' page {} (seq {} < {})",
                ticket.query, ticket.page, ticket.seq, self.latest_seq
            );
            return false;
        }
        match result {
            Ok(page) => {
                info!(
                    "Search '{}' page {}: {} of {} results",
                    ticket.query,
                    ticket.page,
                    page.movies.len(),
                    page.total_results
                );
                self.results = page.movies;
                self.total_results = page.total_results;
                self.total_pages = page.total_pages;
                self.page = ticket.page.min(page.total_pages).max(1);
                self.status = SearchStatus::Success;
                self.error = None;
            }
            Err(e) => {
                info!("Search '{}' failed: {}", ticket.query, e);
                self.results.clear();
                self.total_results = 0;
                self.total_pages = 0;
                self.status = SearchStatus::Error;
                self.error = Some(e);
            }
        }
        true
    }

    pub async fn run_search(&mut self, directory: &dyn MovieDirectory, query: &str, page: u32) {
        let Some(ticket) = self.begin(query, page) else {
            return;
        };
        let result = directory.search(&ticket.query, ticket.page).await;
        self.complete(&ticket, result);
    }

    /// Re-run the current query on `page` if it is in range.
    pub async fn go_to_page(&mut self, directory: &dyn MovieDirectory, page: u32) -> bool {
        if self.total_pages == 0 || page < 1 || page > self.total_pages {
            return false;
        }
        let query = self.query.clone();
        self.run_search(directory, &query, page).await;
        true
    }

    /// Back to idle. Searches still in flight are voided.
    pub fn clear(&mut self) {
        let latest_seq = self.latest_seq + 1;
        *self = Self {
            latest_seq,
            ..Self::default()
        };
    }
}
