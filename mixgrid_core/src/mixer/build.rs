// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Operation building.
//!
//! Building reads the committed targets and leaves them untouched: insertions
//! get new store entries and DOM nodes but only join the committed order at
//! commit. With animation enabled the builder captures three geometry
//! snapshots, mutating the DOM in between and restoring it afterwards:
//!
//! ```text
//!   start ─► show entering, swap class ─► inter
//!         ─► print new order, hide leaving ─► final
//!         ─► restore order, visibility and class
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::command::{InsertCommand, InsertPosition, MultimixCommand, Removal};
use crate::error::MixError;
use crate::filter::partition;
use crate::host::Host;
use crate::operation::{Operation, PosData};
use crate::sort::{sort_targets, will_sort};
use crate::state::State;
use crate::style::StyleSnapshot;
use crate::target::{Target, TargetId};

use super::Mixer;

/// Returns `a` unless it is zero.
fn or_else(a: f64, b: f64) -> f64 {
    if a == 0.0 { b } else { a }
}

impl<H: Host> Mixer<H> {
    /// Builds the plan for `command` against the committed state.
    pub(super) fn build_operation(
        &mut self,
        command: MultimixCommand<H::Element>,
        trigger: Option<H::Element>,
    ) -> Result<Operation<H::Element>, MixError> {
        let mut start_order = self.targets.clone();
        let mut orig_order = self.orig_order.clone();

        let inserted = match &command.insert {
            Some(insert) => self.insert_targets(insert, &mut start_order, &mut orig_order)?,
            None => Vec::new(),
        };

        let result = self.plan(command, trigger, start_order, orig_order, inserted.clone());
        if result.is_err() {
            self.rollback_inserts(&inserted);
        }
        result
    }

    fn plan(
        &mut self,
        command: MultimixCommand<H::Element>,
        trigger: Option<H::Element>,
        start_order: Vec<TargetId>,
        orig_order: Vec<TargetId>,
        inserted: Vec<TargetId>,
    ) -> Result<Operation<H::Element>, MixError> {
        let start_state = self.state.clone();

        let to_remove = match &command.remove {
            Some(removal) => self.resolve_removal(removal, &start_order),
            None => Vec::new(),
        };

        let start_sort = start_state.active_sort.clone();
        let new_sort = command.sort.clone().unwrap_or_else(|| start_sort.clone());
        let mut sorting = command.sort.is_some() && will_sort(&new_sort, &start_sort);
        let new_order = if sorting {
            sort_targets(
                &mut self.host,
                &mut self.store,
                &start_order,
                &orig_order,
                &new_sort,
                &mut self.reporter,
            )?
        } else {
            start_order.clone()
        };
        if new_order == start_order {
            sorting = false;
        }

        let start_filter = start_state.active_filter.clone();
        let new_filter = command
            .filter
            .clone()
            .unwrap_or_else(|| start_filter.clone());
        let split = partition(
            &self.host,
            &self.store,
            &new_order,
            &new_filter,
            &self.config.selectors.target,
            &to_remove,
        );

        let start_container_class = start_state.active_container_class.clone();
        let new_container_class = command
            .change_layout
            .as_ref()
            .map_or_else(
                || start_container_class.clone(),
                |c| c.container_class_name.clone(),
            );
        let will_change_layout = new_container_class != start_container_class;

        self.next_operation_id += 1;
        let mut operation = Operation {
            id: self.next_operation_id,
            command,
            new_state: State::empty(),
            start_state,
            start_order,
            new_order,
            new_orig_order: orig_order
                .into_iter()
                .filter(|id| !to_remove.contains(id))
                .collect(),
            has_effect: !split.to_show.is_empty()
                || !split.to_hide.is_empty()
                || sorting
                || will_change_layout,
            show: split.show,
            hide: split.hide,
            matching: split.matching,
            to_show: split.to_show,
            to_hide: split.to_hide,
            to_remove,
            inserted,
            show_pos_data: Vec::new(),
            to_hide_pos_data: Vec::new(),
            start_filter,
            new_filter,
            start_sort,
            new_sort,
            start_container_class,
            new_container_class,
            will_sort: sorting,
            will_change_layout,
            has_failed: split.has_failed,
            start_width: 0.0,
            start_height: 0.0,
            new_width: 0.0,
            new_height: 0.0,
            trigger_element: trigger,
        };

        if self.config.animation.enable && self.host.is_container_visible() {
            self.capture_geometry(&mut operation);
        } else {
            operation.show_pos_data = vec![PosData::default(); operation.show.len()];
            operation.to_hide_pos_data = vec![PosData::default(); operation.to_hide.len()];
        }

        operation.new_state = self.new_state(&operation);
        tracing::debug!(
            operation = operation.id,
            show = operation.show.len(),
            to_show = operation.to_show.len(),
            to_hide = operation.to_hide.len(),
            to_remove = operation.to_remove.len(),
            will_sort = operation.will_sort,
            "operation built"
        );
        Ok(operation)
    }

    /// Creates targets for an insertion, attaches their elements hidden at the
    /// requested position and splices them into the working orders.
    fn insert_targets(
        &mut self,
        insert: &InsertCommand<H::Element>,
        start_order: &mut Vec<TargetId>,
        orig_order: &mut Vec<TargetId>,
    ) -> Result<Vec<TargetId>, MixError> {
        if insert.collection.is_empty() {
            return Err(MixError::EmptyInsert);
        }
        for (i, el) in insert.collection.iter().enumerate() {
            if self.store.find_any(el).is_some() || insert.collection[..i].contains(el) {
                return Err(MixError::AlreadyTarget(self.host.describe(el)));
            }
        }

        let sibling = insert
            .sibling
            .as_ref()
            .map(|el| (el, self.store.find(start_order, el)));
        let index = match sibling {
            Some((_, Some(id))) => {
                let at = start_order.iter().position(|o| *o == id).unwrap_or(0);
                match insert.position {
                    InsertPosition::Before => at,
                    InsertPosition::After => at + 1,
                }
            }
            Some((_, None)) => start_order.len(),
            None => insert.index.min(start_order.len()),
        };

        let reference = match sibling {
            Some((el, None)) => match insert.position {
                InsertPosition::Before => Some(el.clone()),
                InsertPosition::After => self.host.next_element_sibling(el),
            },
            _ => match start_order.get(index) {
                Some(id) => Some(self.store[*id].element().clone()),
                None => start_order
                    .last()
                    .and_then(|id| self.host.next_element_sibling(self.store[*id].element())),
            },
        };

        let mut ids = Vec::with_capacity(insert.collection.len());
        for (offset, el) in insert.collection.iter().enumerate() {
            let target = Target::new(el.clone());
            target.hide(&mut self.host);
            self.host.insert_before(el, reference.as_ref());
            self.host.subscribe_transition_end(el);
            let id = self.store.insert(target);
            start_order.insert(index + offset, id);
            ids.push(id);
        }

        // Indexing order: before the first original target that follows.
        let after = start_order[index + ids.len()..]
            .iter()
            .find_map(|id| orig_order.iter().position(|o| o == id));
        let at = after.unwrap_or(orig_order.len());
        for (offset, id) in ids.iter().enumerate() {
            orig_order.insert(at + offset, *id);
        }

        Ok(ids)
    }

    pub(super) fn rollback_inserts(&mut self, inserted: &[TargetId]) {
        for &id in inserted {
            if let Some(target) = self.store.remove(id) {
                self.host.unsubscribe_transition_end(target.element());
                self.host.detach(target.element());
            }
        }
    }

    /// Rolls back targets created by operations that were built but never
    /// committed. Every live target outside the committed order is one.
    pub(super) fn drop_orphans(&mut self) {
        let orphans: Vec<TargetId> = self
            .store
            .ids()
            .filter(|id| !self.targets.contains(id))
            .collect();
        if !orphans.is_empty() {
            tracing::debug!(count = orphans.len(), "dropping uncommitted insertions");
            self.rollback_inserts(&orphans);
        }
    }

    fn resolve_removal(
        &self,
        removal: &Removal<H::Element>,
        order: &[TargetId],
    ) -> Vec<TargetId> {
        let mut ids: Vec<TargetId> = match removal {
            Removal::Selector(selector) => order
                .iter()
                .copied()
                .filter(|id| self.host.matches(self.store[*id].element(), selector))
                .collect(),
            Removal::Element(el) => self.store.find(order, el).into_iter().collect(),
            Removal::Collection(els) => els
                .iter()
                .filter_map(|el| self.store.find(order, el))
                .collect(),
            Removal::Index(i) => order.get(*i).copied().into_iter().collect(),
            Removal::Indices(indices) => indices
                .iter()
                .filter_map(|i| order.get(*i).copied())
                .collect(),
        };
        ids.sort_by_key(|id| order.iter().position(|o| o == id));
        ids.dedup();
        ids
    }

    /// Re-inserts targets so the DOM follows `order`, keeping non-target
    /// siblings after the last committed target in place.
    pub(super) fn print_order(&mut self, order: &[TargetId]) {
        let mut reference = self
            .targets
            .last()
            .and_then(|id| self.store.get(*id))
            .and_then(|t| self.host.next_element_sibling(t.element()));
        while let Some(r) = &reference {
            if self.store.find(order, r).is_none() {
                break;
            }
            reference = self.host.next_element_sibling(r);
        }
        for &id in order {
            let el = self.store[id].element().clone();
            self.host.insert_before(&el, reference.as_ref());
        }
    }

    fn capture(&self, ids: &[TargetId]) -> Vec<StyleSnapshot> {
        let resize = self.config.animation.animate_resize_targets;
        ids.iter()
            .map(|id| self.store[*id].pos_data(&self.host, resize))
            .collect()
    }

    /// Content size of the container.
    fn container_size(&self) -> (f64, f64) {
        let rect = self.host.container_rect();
        let style = self.host.container_box();
        if style.border_box {
            return (rect.width(), rect.height());
        }
        let pad = style.padding;
        let border = style.border;
        (
            rect.width() - pad.x0 - pad.x1 - border.x0 - border.x1,
            rect.height() - pad.y0 - pad.y1 - border.y0 - border.y1,
        )
    }

    fn capture_geometry(&mut self, op: &mut Operation<H::Element>) {
        let display = self.config.layout.display.clone();

        let start_show = self.capture(&op.show);
        let start_hide = self.capture(&op.to_hide);
        (op.start_width, op.start_height) = self.container_size();

        for &id in &op.to_show {
            self.store[id].show(&mut self.host, &display);
        }
        if op.will_change_layout {
            self.host.remove_container_class(&op.start_container_class);
            self.host.add_container_class(&op.new_container_class);
        }
        let inter_show = self.capture(&op.show);
        let inter_hide = self.capture(&op.to_hide);

        if op.will_sort {
            self.print_order(&op.new_order);
        }
        for &id in &op.to_hide {
            self.store[id].hide(&mut self.host);
        }
        let final_show = self.capture(&op.show);
        (op.new_width, op.new_height) = self.container_size();

        if op.will_sort {
            self.print_order(&op.start_order);
        }
        for &id in &op.to_show {
            self.store[id].hide(&mut self.host);
        }
        for &id in &op.to_hide {
            self.store[id].show(&mut self.host, &display);
        }
        if op.will_change_layout {
            self.host.remove_container_class(&op.new_container_class);
            self.host.add_container_class(&op.start_container_class);
        }

        op.show_pos_data = op
            .show
            .iter()
            .zip(start_show)
            .zip(inter_show)
            .zip(final_show)
            .map(|(((id, start), inter), final_)| {
                let entering = !self.store[*id].is_shown;
                self.tween_data(start, inter, final_, EnterOrLeave::Show { entering })
            })
            .collect();
        op.to_hide_pos_data = start_hide
            .into_iter()
            .zip(inter_hide)
            .map(|(start, inter)| {
                self.tween_data(start, inter, StyleSnapshot::zero(), EnterOrLeave::Hide)
            })
            .collect();
    }

    /// Derives `pos_in`/`pos_out` from the three snapshots.
    fn tween_data(
        &self,
        start: StyleSnapshot,
        inter: StyleSnapshot,
        final_: StyleSnapshot,
        kind: EnterOrLeave,
    ) -> PosData {
        let animation = &self.config.animation;
        let nudge = animation.nudge;
        let mut pos_in = StyleSnapshot {
            x: start.x - inter.x,
            y: start.y - inter.y,
            ..StyleSnapshot::default()
        };
        let mut pos_out = StyleSnapshot {
            x: final_.x - inter.x,
            y: final_.y - inter.y,
            ..StyleSnapshot::default()
        };

        match kind {
            EnterOrLeave::Show { entering: true } => {
                let effects = &self.effects.effects_in;
                pos_in.opacity = effects.opacity.unwrap_or(1.0);
                pos_in.transforms = effects.transforms;
                if nudge {
                    pos_in.x = 0.0;
                    pos_in.y = 0.0;
                } else {
                    pos_in.x = pos_out.x;
                    pos_in.y = pos_out.y;
                }
            }
            EnterOrLeave::Show { entering: false } => {}
            EnterOrLeave::Hide => {
                let effects = &self.effects.effects_out;
                pos_out.opacity = effects.opacity.unwrap_or(1.0);
                pos_out.transforms = effects.transforms;
                if nudge {
                    pos_out.x = 0.0;
                    pos_out.y = 0.0;
                } else {
                    pos_out.x = pos_in.x;
                    pos_out.y = pos_in.y;
                }
            }
        }

        if animation.animate_resize_targets {
            pos_in.width = start.width;
            pos_in.height = start.height;
            pos_in.margin_right =
                start.margin_right - (or_else(start.width, final_.width) - inter.width);
            pos_in.margin_bottom =
                start.margin_bottom - (or_else(start.height, final_.height) - inter.height);

            pos_out.width = final_.width;
            pos_out.height = final_.height;
            pos_out.margin_right =
                final_.margin_right - (or_else(final_.width, start.width) - inter.width);
            pos_out.margin_bottom =
                final_.margin_bottom - (or_else(final_.height, start.height) - inter.height);
        }

        let tween = pos_in.delta(&pos_out);
        PosData {
            start,
            inter,
            final_,
            pos_in,
            pos_out,
            tween,
        }
    }

    /// The state the operation commits.
    fn new_state(&mut self, op: &Operation<H::Element>) -> State<H::Element> {
        self.next_state_id += 1;
        let element = |id: &TargetId| self.store[*id].element().clone();
        let kept = |id: &&TargetId| !op.to_remove.contains(id);

        let mut state = State {
            id: self.next_state_id,
            active_filter: op.new_filter.clone(),
            active_sort: op.new_sort.clone(),
            active_container_class: op.new_container_class.clone(),
            targets: op.new_order.iter().filter(kept).map(element).collect(),
            show: op.show.iter().map(element).collect(),
            hide: op.hide.iter().filter(kept).map(element).collect(),
            matching: op.matching.iter().filter(kept).map(element).collect(),
            total_targets: 0,
            total_show: 0,
            total_hide: 0,
            total_matching: 0,
            has_failed: op.has_failed,
            trigger_element: op.trigger_element.clone(),
        };
        state.update_totals();
        state
    }
}

#[derive(Clone, Copy, Debug)]
enum EnterOrLeave {
    Show { entering: bool },
    Hide,
}
