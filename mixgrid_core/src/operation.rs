// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The plan of one transition between two container states.

use alloc::string::String;
use alloc::vec::Vec;

use crate::command::MultimixCommand;
use crate::filter::FilterCommand;
use crate::sort::SortCommand;
use crate::state::State;
use crate::style::StyleSnapshot;
use crate::target::TargetId;

/// The three geometry snapshots of one target and the deltas derived from
/// them.
///
/// `pos_in` and `pos_out` are relative to `inter`, the layout the DOM is left
/// in while animating.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PosData {
    /// Before the DOM mutation.
    pub start: StyleSnapshot,
    /// With entering targets shown and leaving targets not yet hidden.
    pub inter: StyleSnapshot,
    /// After the DOM mutation.
    pub final_: StyleSnapshot,
    /// Styles the target animates from.
    pub pos_in: StyleSnapshot,
    /// Styles the target animates to.
    pub pos_out: StyleSnapshot,
    /// `pos_out - pos_in`.
    pub tween: StyleSnapshot,
}

/// A fully computed, not yet executed, transition plan.
///
/// Built by [`Mixer::get_operation`](crate::mixer::Mixer::get_operation) or
/// internally by every mixing call. Target lists are in container order.
#[derive(Clone, Debug)]
pub struct Operation<E> {
    /// Monotonic per-mixer id.
    pub id: u64,
    /// The command this plan was built from.
    pub command: MultimixCommand<E>,
    /// Committed state at build time.
    pub start_state: State<E>,
    /// State after commit.
    pub new_state: State<E>,

    /// Working order before the operation (committed order plus insertions).
    pub start_order: Vec<TargetId>,
    /// Order after the operation.
    pub new_order: Vec<TargetId>,
    /// Indexing order after the operation.
    pub new_orig_order: Vec<TargetId>,

    /// Targets shown after the operation.
    pub show: Vec<TargetId>,
    /// Targets hidden after the operation.
    pub hide: Vec<TargetId>,
    /// Targets that passed the filter.
    pub matching: Vec<TargetId>,
    /// Targets becoming visible.
    pub to_show: Vec<TargetId>,
    /// Targets becoming hidden.
    pub to_hide: Vec<TargetId>,
    /// Targets removed at commit.
    pub to_remove: Vec<TargetId>,
    /// Targets created by this operation's insertion.
    pub inserted: Vec<TargetId>,

    /// Geometry of each `show` target, index-aligned with `show`.
    pub show_pos_data: Vec<PosData>,
    /// Geometry of each `to_hide` target, index-aligned with `to_hide`.
    pub to_hide_pos_data: Vec<PosData>,

    /// Filter before.
    pub start_filter: FilterCommand<E>,
    /// Filter after.
    pub new_filter: FilterCommand<E>,
    /// Sort before.
    pub start_sort: SortCommand<E>,
    /// Sort after.
    pub new_sort: SortCommand<E>,
    /// Container class before.
    pub start_container_class: String,
    /// Container class after.
    pub new_container_class: String,

    /// Whether the order changes.
    pub will_sort: bool,
    /// Whether the container class changes.
    pub will_change_layout: bool,
    /// Whether any target changes visibility or position.
    pub has_effect: bool,
    /// Whether the filter matched nothing.
    pub has_failed: bool,

    /// Container content size before.
    pub start_width: f64,
    /// Container content size before.
    pub start_height: f64,
    /// Container content size after.
    pub new_width: f64,
    /// Container content size after.
    pub new_height: f64,

    /// The element that triggered the operation.
    pub trigger_element: Option<E>,
}

impl<E> Operation<E> {
    /// Geometry of a target, if it moves or changes visibility.
    #[must_use]
    pub fn pos_data(&self, id: TargetId) -> Option<&PosData> {
        if let Some(i) = self.show.iter().position(|s| *s == id) {
            return self.show_pos_data.get(i);
        }
        self.to_hide
            .iter()
            .position(|h| *h == id)
            .and_then(|i| self.to_hide_pos_data.get(i))
    }

    /// Whether the container size changes.
    #[must_use]
    pub fn resizes_container(&self) -> bool {
        self.start_width != self.new_width || self.start_height != self.new_height
    }
}
