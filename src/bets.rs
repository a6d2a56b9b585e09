//! Drill-down from a scorecard, one of its markets, or a paper strategy into the bets it
//! placed.
//!
//! At most one bets list is open. Every open issues a fresh ticket; a completion whose
//! ticket no longer matches the open list (closed, or replaced by another open) is dropped.
//! The whole list is fetched at once and paged locally.

use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::model::{Bet, BetsQuery};
use crate::pagination::Paginator;

/// Ticket identifying one issued bets fetch.
pub type BetsRequestId = u64;

#[derive(Debug, Clone, PartialEq)]
pub struct BetsView {
    pub query: BetsQuery,
    pub bets: Vec<Bet>,
    pub paginator: Paginator,
    request: BetsRequestId,
    loading: bool,
}

impl BetsView {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn title(&self) -> String {
        self.query.title()
    }

    /// Bets on the current page.
    pub fn page(&self) -> &[Bet] {
        let start = self.paginator.display_start.min(self.bets.len());
        let end = self.paginator.display_end().min(self.bets.len());
        &self.bets[start..end]
    }
}

#[derive(Debug)]
pub struct BetsBrowser {
    view: Option<BetsView>,
    next_request: BetsRequestId,
    page_size: usize,
    window_size: usize,
}

impl BetsBrowser {
    pub fn new(page_size: usize, window_size: usize) -> Self {
        Self {
            view: None,
            next_request: 0,
            page_size,
            window_size,
        }
    }

    pub fn view(&self) -> Option<&BetsView> {
        self.view.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.view.is_some()
    }

    /// Open a list for `query`, replacing any open one. Returns the ticket to fetch with.
    pub fn open(&mut self, query: BetsQuery) -> BetsRequestId {
        self.next_request += 1;
        let request = self.next_request;
        debug!(target: "bets", request, query = ?query, "opened");
        self.view = Some(BetsView {
            query,
            bets: Vec::new(),
            paginator: Paginator::new(self.page_size, self.window_size),
            request,
            loading: true,
        });
        request
    }

    /// Returns true if a list was open.
    pub fn close(&mut self) -> bool {
        self.view.take().is_some()
    }

    /// Apply the result of the fetch issued with `request`.
    ///
    /// Returns the number of bets listed, `Err(StaleResponse)` when the list was closed or
    /// replaced, or the fetch error after closing the list.
    pub fn complete(
        &mut self,
        request: BetsRequestId,
        result: GridResult<Vec<Bet>>,
    ) -> GridResult<usize> {
        let view = match self.view.as_mut() {
            Some(view) if view.request == request && view.loading => view,
            _ => {
                debug!(target: "bets", request, "stale bets discarded");
                return Err(GridError::StaleResponse);
            }
        };

        match result {
            Ok(bets) => {
                let count = bets.len();
                view.paginator.set_total_rows(count);
                view.bets = bets;
                view.loading = false;
                debug!(target: "bets", request, count, "listed");
                Ok(count)
            }
            Err(e) => {
                debug!(target: "bets", request, error = %e, "fetch failed");
                self.view = None;
                Err(e)
            }
        }
    }

    /// Apply a paging step to the open list. Returns true when the page changed.
    pub fn navigate(&mut self, step: impl FnOnce(&mut Paginator) -> bool) -> bool {
        match self.view.as_mut() {
            Some(view) if !view.loading => step(&mut view.paginator),
            _ => false,
        }
    }
}
