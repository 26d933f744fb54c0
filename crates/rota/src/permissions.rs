//! The permission store: holds the live permissions model and the
//! last-committed-good copy, and runs the optimistic commit protocol.
//!
//! ## Commit protocol
//!
//! ```text
//!            commit(m)                      validator accepts
//!   Stable ────────────▶ Committing ─────────────────────────▶ Stable
//!   current == last_good   current = m      last_good := current
//!                              │
//!                              │ validator rejects
//!                              ▼
//!                            Stable   current := last_good (as of commit start)
//! ```
//!
//! The optimistic write is visible to readers as soon as `commit` is
//! called, before validation resolves. Commits are neither queued nor
//! rejected while another is in flight; how overlapping resolutions
//! interact is governed by [`CommitOrdering`].

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rota_core::{PermissionSet, PermissionsModel, Role};
use tracing::{debug, info, warn};

use crate::config::CommitOrdering;
use crate::error::{AccessError, Result};
use crate::validator::Validator;

/// Mutable state behind the store's lock.
#[derive(Debug)]
struct Slots {
    /// What readers see, possibly an unvalidated optimistic write.
    current: PermissionsModel,
    /// The newest model known to have passed validation (or been reset to).
    last_good: PermissionsModel,
    /// Sequence of the most recently started commit or reset.
    started: u64,
    /// Sequence that produced `current`.
    current_seq: u64,
    /// Sequence that produced `last_good`.
    good_seq: u64,
}

impl Slots {
    fn new(model: PermissionsModel) -> Self {
        Self {
            current: model.clone(),
            last_good: model,
            started: 0,
            current_seq: 0,
            good_seq: 0,
        }
    }
}

/// Authoritative holder of the permissions model.
///
/// One instance exists per running application; it is passed explicitly to
/// whatever owns the session lifecycle.
pub struct PermissionStore<V> {
    validator: V,
    ordering: CommitOrdering,
    slots: RwLock<Slots>,
}

impl<V: Validator> PermissionStore<V> {
    /// Create a store holding the default model.
    pub fn new(validator: V) -> Self {
        Self::with_model(PermissionsModel::default(), validator, CommitOrdering::default())
    }

    /// Create a store starting from `model`, treated as last-committed-good.
    pub fn with_model(model: PermissionsModel, validator: V, ordering: CommitOrdering) -> Self {
        Self {
            validator,
            ordering,
            slots: RwLock::new(Slots::new(model)),
        }
    }

    /// Snapshot of the current model, including any optimistic write.
    pub fn read(&self) -> PermissionsModel {
        self.slots().current.clone()
    }

    /// Snapshot of the last-committed-good model.
    pub fn last_good(&self) -> PermissionsModel {
        self.slots().last_good.clone()
    }

    /// Snapshot of one role's current permission set.
    pub fn permission_set(&self, role: Role) -> PermissionSet {
        self.slots().current.get(role).clone()
    }

    /// Run `f` against the current model without cloning it.
    pub fn with_current<T>(&self, f: impl FnOnce(&PermissionsModel) -> T) -> T {
        f(&self.slots().current)
    }

    /// Whether the current model equals the last-committed-good one.
    pub fn is_stable(&self) -> bool {
        let slots = self.slots();
        slots.current == slots.last_good
    }

    /// The resolution policy for overlapping commits.
    pub fn ordering(&self) -> CommitOrdering {
        self.ordering
    }

    /// Replace both the current and last-good model with the default table.
    ///
    /// Never fails. Under [`CommitOrdering::Sequenced`] this also supersedes
    /// every commit still in flight.
    pub fn reset(&self) {
        let mut slots = self.slots_mut();
        let defaults = PermissionsModel::default();

        slots.started += 1;
        slots.current = defaults.clone();
        slots.last_good = defaults;
        slots.current_seq = slots.started;
        slots.good_seq = slots.started;

        info!(seq = slots.started, "permissions reset to defaults");
    }

    /// Put back a previously observed state, superseding every commit
    /// still in flight as [`reset`](Self::reset) does.
    pub(crate) fn restore(&self, current: PermissionsModel, last_good: PermissionsModel) {
        let mut slots = self.slots_mut();

        slots.started += 1;
        slots.current = current;
        slots.last_good = last_good;
        slots.current_seq = slots.started;
        slots.good_seq = slots.started;

        warn!(seq = slots.started, "permissions restored to an earlier state");
    }

    /// Snapshot of the current and last-good models under one lock.
    pub(crate) fn snapshot(&self) -> (PermissionsModel, PermissionsModel) {
        let slots = self.slots();
        (slots.current.clone(), slots.last_good.clone())
    }

    /// Optimistically install `model`, then validate it.
    ///
    /// Readers observe `model` immediately. On acceptance the store
    /// promotes the current model to last-good. On rejection the current
    /// model is rolled back and [`AccessError::ValidationRejected`] is
    /// returned; the store is consistent again by the time the error is seen.
    pub async fn commit(&self, model: PermissionsModel) -> Result<()> {
        let (seq, rollback) = {
            let mut slots = self.slots_mut();
            slots.started += 1;
            let seq = slots.started;

            slots.current = model.clone();
            slots.current_seq = seq;
            (seq, slots.last_good.clone())
        };
        debug!(seq, "optimistic permissions write applied, awaiting validation");

        let verdict = self.validator.validate(&model).await;

        let mut slots = self.slots_mut();
        match verdict {
            Ok(()) => {
                match self.ordering {
                    CommitOrdering::LastWriteWins => {
                        slots.last_good = slots.current.clone();
                        slots.good_seq = slots.current_seq;
                    }
                    CommitOrdering::Sequenced => {
                        if seq > slots.good_seq {
                            slots.last_good = model;
                            slots.good_seq = seq;
                            if slots.current_seq < seq {
                                slots.current = slots.last_good.clone();
                                slots.current_seq = seq;
                            }
                        } else {
                            debug!(seq, good_seq = slots.good_seq, "stale acceptance ignored");
                        }
                    }
                }
                info!(seq, "permissions commit accepted");
                Ok(())
            }
            Err(rejection) => {
                match self.ordering {
                    CommitOrdering::LastWriteWins => {
                        slots.current = rollback;
                        slots.current_seq = slots.good_seq;
                    }
                    CommitOrdering::Sequenced => {
                        if slots.current_seq == seq {
                            slots.current = slots.last_good.clone();
                            slots.current_seq = slots.good_seq;
                        } else {
                            debug!(seq, current_seq = slots.current_seq, "stale rejection ignored");
                        }
                    }
                }
                warn!(seq, reason = %rejection, "permissions commit rejected, rolled back");
                Err(AccessError::ValidationRejected(rejection))
            }
        }
    }

    fn slots(&self) -> RwLockReadGuard<'_, Slots> {
        // Every write leaves the slots whole, so a poisoned lock is still usable.
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn slots_mut(&self) -> RwLockWriteGuard<'_, Slots> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }
}
