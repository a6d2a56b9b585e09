//! Server-confirmed "active" state for toggleable entities.
//!
//! The local `ActiveSet` is only ever replaced by a successful refresh (`GET /active`).
//! Enable/disable requests are tracked as pending; their acknowledgment triggers a
//! refresh rather than patching the set, so changes made by other clients are picked up
//! too. A failed acknowledgment changes nothing, so the button falls back to what the
//! server last confirmed.

use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::error::{GridError, GridResult};
use crate::model::EntityId;

pub type ActiveSet = BTreeSet<EntityId>;

/// Ticket for one enable/disable request.
pub type MutationId = u64;

/// Sequence number of a refresh fetch; later refreshes supersede earlier ones.
pub type RefreshSeq = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    request: MutationId,
    desired: bool,
}

/// Request the caller must issue after `set_active`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleEffect {
    Enable { id: EntityId, request: MutationId },
    Disable { id: EntityId, request: MutationId },
    /// A request for this id is already outstanding.
    Ignored,
}

/// Visual emphasis of a toggle button, resolved to colours by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffordanceStyle {
    Active,
    Inactive,
    /// Hovering an active button: clicking will stop it.
    Danger,
    /// Hovering an inactive button: clicking will start it.
    Primary,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonAffordance {
    pub label: &'static str,
    pub style: AffordanceStyle,
}

/// Pure projection from confirmed state to button text and style.
pub fn affordance(active: bool, hovered: bool, pending: bool) -> ButtonAffordance {
    let (label, style) = match (pending, active, hovered) {
        (true, _, _) => ("Working", AffordanceStyle::Busy),
        (false, true, false) => ("Trading", AffordanceStyle::Active),
        (false, true, true) => ("Stop", AffordanceStyle::Danger),
        (false, false, false) => ("Idle", AffordanceStyle::Inactive),
        (false, false, true) => ("Start", AffordanceStyle::Primary),
    };
    ButtonAffordance { label, style }
}

#[derive(Debug, Default)]
pub struct ActiveSetSynchronizer {
    active: ActiveSet,
    known: BTreeSet<EntityId>,
    pending: HashMap<EntityId, Pending>,
    next_request: MutationId,
    issued_refresh: RefreshSeq,
    applied_refresh: RefreshSeq,
}

impl ActiveSetSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_set(&self) -> &ActiveSet {
        &self.active
    }

    pub fn is_active(&self, id: &EntityId) -> bool {
        self.active.contains(id)
    }

    pub fn is_pending(&self, id: &EntityId) -> bool {
        self.pending.contains_key(id)
    }

    /// Whether at least one refresh has been applied.
    pub fn is_loaded(&self) -> bool {
        self.applied_refresh > 0
    }

    /// Every entity the panel can show: the known list plus anything confirmed active.
    pub fn entities(&self) -> Vec<EntityId> {
        self.known.union(&self.active).cloned().collect()
    }

    pub fn set_known_entities(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        self.known = ids.into_iter().collect();
    }

    pub fn affordance(&self, id: &EntityId, hovered: bool) -> ButtonAffordance {
        affordance(self.is_active(id), hovered, self.is_pending(id))
    }

    /// Ask the server to make `id` active or inactive. The ActiveSet is untouched until
    /// the follow-up refresh lands.
    pub fn set_active(&mut self, id: &EntityId, desired: bool) -> ToggleEffect {
        if self.pending.contains_key(id) {
            debug!(target: "active", id = %id, "request already pending, ignored");
            return ToggleEffect::Ignored;
        }
        self.next_request += 1;
        let request = self.next_request;
        self.pending.insert(id.clone(), Pending { request, desired });
        debug!(target: "active", id = %id, desired, request, "mutation issued");
        if desired {
            ToggleEffect::Enable {
                id: id.clone(),
                request,
            }
        } else {
            ToggleEffect::Disable {
                id: id.clone(),
                request,
            }
        }
    }

    /// Flip the confirmed state of `id`.
    pub fn toggle(&mut self, id: &EntityId) -> ToggleEffect {
        let desired = !self.is_active(id);
        self.set_active(id, desired)
    }

    /// Apply the server's answer to a mutation. On success returns the sequence number of
    /// the refresh the caller must now issue; on failure returns the error with no state
    /// change beyond clearing the pending marker.
    pub fn acknowledge(
        &mut self,
        id: &EntityId,
        request: MutationId,
        result: GridResult<()>,
    ) -> GridResult<RefreshSeq> {
        match self.pending.get(id) {
            Some(p) if p.request == request => {}
            _ => {
                debug!(target: "active", id = %id, request, "stale acknowledgment discarded");
                return Err(GridError::StaleResponse);
            }
        }
        let pending = self.pending.remove(id);
        match result {
            Ok(()) => {
                debug!(target: "active", id = %id, request, desired = pending.map(|p| p.desired), "acknowledged");
                Ok(self.begin_refresh())
            }
            Err(e) => {
                debug!(target: "active", id = %id, request, error = %e, "mutation failed");
                Err(e)
            }
        }
    }

    /// Register a refresh about to be issued.
    pub fn begin_refresh(&mut self) -> RefreshSeq {
        self.issued_refresh += 1;
        self.issued_refresh
    }

    /// Replace the ActiveSet wholesale with a refresh result. Older refreshes arriving
    /// after a newer one was applied are stale.
    pub fn apply_refresh(
        &mut self,
        seq: RefreshSeq,
        result: GridResult<Vec<EntityId>>,
    ) -> GridResult<usize> {
        if seq <= self.applied_refresh {
            debug!(target: "active", seq, applied = self.applied_refresh, "stale refresh discarded");
            return Err(GridError::StaleResponse);
        }
        let ids = result?;
        self.active = ids.into_iter().collect();
        self.applied_refresh = seq;
        debug!(target: "active", seq, count = self.active.len(), "active set replaced");
        Ok(self.active.len())
    }
}
