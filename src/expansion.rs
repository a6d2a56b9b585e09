//! Expand/collapse of grid rows into lazily fetched detail.
//!
//! Each row is `Collapsed`, `Loading` or `Expanded`. At most one detail fetch is
//! outstanding per row key: the in-flight table is kept apart from the visible state, so a
//! user who collapses a loading row and expands it again re-attaches to the fetch that is
//! already running instead of starting another one. Completions carry the ticket they were
//! issued with and are checked against the current state before anything is applied.

use std::collections::HashMap;
use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::model::{DetailSet, ParentId, Row, RowKey};

/// Ticket identifying one issued detail fetch.
pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ExpansionState {
    #[default]
    Collapsed,
    Loading {
        request: RequestId,
    },
    Expanded(DetailSet),
}

impl ExpansionState {
    pub fn is_collapsed(&self) -> bool {
        matches!(self, ExpansionState::Collapsed)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ExpansionState::Loading { .. })
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self, ExpansionState::Expanded(_))
    }
}

/// What the caller has to do after a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionEffect {
    /// Start a detail fetch for `parent_id` and report back with `request`.
    Fetch {
        row: RowKey,
        parent_id: ParentId,
        request: RequestId,
    },
    /// Row is loading again, waiting on the fetch already in flight.
    Rearmed { request: RequestId },
    /// Row was collapsed; any detail it held is gone.
    Collapsed,
}

static COLLAPSED: ExpansionState = ExpansionState::Collapsed;

#[derive(Debug, Default)]
pub struct RowExpansionController {
    states: HashMap<RowKey, ExpansionState>,
    in_flight: HashMap<RowKey, RequestId>,
    next_request: RequestId,
}

impl RowExpansionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, key: &RowKey) -> &ExpansionState {
        self.states.get(key).unwrap_or(&COLLAPSED)
    }

    pub fn detail(&self, key: &RowKey) -> Option<&DetailSet> {
        match self.states.get(key) {
            Some(ExpansionState::Expanded(detail)) => Some(detail),
            _ => None,
        }
    }

    /// Whether a fetch for this row has been issued and not yet completed.
    pub fn is_in_flight(&self, key: &RowKey) -> bool {
        self.in_flight.contains_key(key)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn expanded_count(&self) -> usize {
        self.states.values().filter(|s| s.is_expanded()).count()
    }

    /// User action on a row's control cell.
    pub fn toggle(&mut self, row: &Row) -> ExpansionEffect {
        let key = &row.key;
        match self.state(key) {
            ExpansionState::Collapsed => {
                if let Some(&request) = self.in_flight.get(key) {
                    debug!(target: "expansion", row = %key, request, "re-armed in-flight fetch");
                    self.states
                        .insert(key.clone(), ExpansionState::Loading { request });
                    return ExpansionEffect::Rearmed { request };
                }
                self.next_request += 1;
                let request = self.next_request;
                self.in_flight.insert(key.clone(), request);
                self.states
                    .insert(key.clone(), ExpansionState::Loading { request });
                debug!(target: "expansion", row = %key, parent = %row.parent_id, request, "fetch issued");
                ExpansionEffect::Fetch {
                    row: key.clone(),
                    parent_id: row.parent_id.clone(),
                    request,
                }
            }
            ExpansionState::Loading { request } => {
                debug!(target: "expansion", row = %key, request = *request, "collapsed while loading");
                self.states.remove(key);
                ExpansionEffect::Collapsed
            }
            ExpansionState::Expanded(_) => {
                debug!(target: "expansion", row = %key, "collapsed");
                self.states.remove(key);
                ExpansionEffect::Collapsed
            }
        }
    }

    /// Collapse every row, e.g. when the page is redrawn. Outstanding fetches stay
    /// registered so they cannot be duplicated; their results will be discarded.
    pub fn reset(&mut self) {
        self.states.clear();
    }

    /// Apply the result of the fetch issued with `request`.
    ///
    /// Returns the number of detail entries attached, `Err(StaleResponse)` when the row has
    /// moved on and the result was dropped, or the fetch error after reverting the row.
    pub fn complete(
        &mut self,
        key: &RowKey,
        request: RequestId,
        result: GridResult<DetailSet>,
    ) -> GridResult<usize> {
        if self.in_flight.get(key) == Some(&request) {
            self.in_flight.remove(key);
        }

        match self.state(key) {
            ExpansionState::Loading { request: current } if *current == request => {}
            _ => {
                debug!(target: "expansion", row = %key, request, "stale detail discarded");
                return Err(GridError::StaleResponse);
            }
        }

        match result {
            Ok(detail) => {
                let entries = detail.len();
                debug!(target: "expansion", row = %key, request, entries, "expanded");
                self.states
                    .insert(key.clone(), ExpansionState::Expanded(detail));
                Ok(entries)
            }
            Err(e) => {
                debug!(target: "expansion", row = %key, request, error = %e, "fetch failed");
                self.states.remove(key);
                Err(e)
            }
        }
    }
}
