// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public snapshots of a mixer's committed state.

use alloc::string::String;
use alloc::vec::Vec;

use crate::filter::FilterCommand;
use crate::sort::SortCommand;

/// An immutable snapshot produced by one operation.
///
/// Lists hold raw elements in container order. Targets removed by the
/// producing operation appear in none of them.
#[derive(Clone, Debug, PartialEq)]
pub struct State<E> {
    /// Monotonic per-mixer id.
    pub id: u64,
    /// The filter in effect.
    pub active_filter: FilterCommand<E>,
    /// The sort in effect.
    pub active_sort: SortCommand<E>,
    /// The container class in effect.
    pub active_container_class: String,
    /// Every target.
    pub targets: Vec<E>,
    /// Shown targets.
    pub show: Vec<E>,
    /// Hidden targets.
    pub hide: Vec<E>,
    /// Targets that passed the filter.
    pub matching: Vec<E>,
    /// `targets.len()`.
    pub total_targets: usize,
    /// `show.len()`.
    pub total_show: usize,
    /// `hide.len()`.
    pub total_hide: usize,
    /// `matching.len()`.
    pub total_matching: usize,
    /// Whether the filter matched nothing without being an explicit `none`.
    pub has_failed: bool,
    /// The element that triggered the operation, if any.
    pub trigger_element: Option<E>,
}

impl<E> State<E> {
    /// The state of a mixer before any operation ran.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            id: 0,
            active_filter: FilterCommand::all(),
            active_sort: SortCommand::default(),
            active_container_class: String::new(),
            targets: Vec::new(),
            show: Vec::new(),
            hide: Vec::new(),
            matching: Vec::new(),
            total_targets: 0,
            total_show: 0,
            total_hide: 0,
            total_matching: 0,
            has_failed: false,
            trigger_element: None,
        }
    }

    /// Recomputes the `total_*` counts from the lists.
    pub(crate) fn update_totals(&mut self) {
        self.total_targets = self.targets.len();
        self.total_show = self.show.len();
        self.total_hide = self.hide.len();
        self.total_matching = self.matching.len();
    }
}

impl<E> Default for State<E> {
    fn default() -> Self {
        Self::empty()
    }
}
