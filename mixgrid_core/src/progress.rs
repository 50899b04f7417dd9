// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Completion tracking for one animating operation.
//!
//! Every moving target either registers a pending completion
//! ([`TransitionJoin::bind`]) or is credited on the spot
//! ([`TransitionJoin::credit`]) because it will not visibly transition.
//! Once registration is over the join is [sealed](TransitionJoin::seal); from
//! then on it is complete as soon as every bound target has settled. A sealed
//! join with nothing bound is complete immediately.

use alloc::vec::Vec;

use crate::target::TargetId;

/// Join over the per-target transition completions of one operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionJoin {
    pending: Vec<TargetId>,
    bound: usize,
    credited: usize,
    sealed: bool,
}

impl TransitionJoin {
    /// Creates an empty, unsealed join.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a pending completion for `id`. Registering twice is a no-op.
    pub fn bind(&mut self, id: TargetId) {
        debug_assert!(!self.sealed, "bind after seal");
        if !self.pending.contains(&id) {
            self.pending.push(id);
            self.bound += 1;
        }
    }

    /// Counts a target that will not transition as already complete.
    pub fn credit(&mut self) {
        self.credited += 1;
    }

    /// Ends registration.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Settles the pending completion of `id`. Returns `false` if `id` was not
    /// pending.
    pub fn settle(&mut self, id: TargetId) -> bool {
        match self.pending.iter().position(|p| *p == id) {
            Some(i) => {
                self.pending.swap_remove(i);
                true
            }
            None => false,
        }
    }

    /// Whether `id` still has a pending completion.
    #[must_use]
    pub fn is_pending(&self, id: TargetId) -> bool {
        self.pending.contains(&id)
    }

    /// Whether the join is sealed and nothing is pending.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.sealed && self.pending.is_empty()
    }

    /// Number of bound targets.
    #[must_use]
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Number of bound targets that have settled.
    #[must_use]
    pub fn settled(&self) -> usize {
        self.bound - self.pending.len()
    }

    /// Number of immediately credited targets.
    #[must_use]
    pub fn credited(&self) -> usize {
        self.credited
    }
}
