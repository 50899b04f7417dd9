// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Operation execution: the two-phase style write, completion tracking and
//! commit.
//!
//! ```text
//!   execute ──► (no animation) ──────────────────────────► commit
//!      │
//!      └─► phase 1: styles in, request frame
//!                │
//!          advance_frame ─► phase 2: styles out, bind / credit, seal
//!                │
//!          handle_transition_end ─► settle ─► (join complete) ─► commit
//! ```

use alloc::format;
use alloc::vec::Vec;

use crate::hooks::{Extension, HookPayload, Phase};
use crate::host::{Host, MixEvent};
use crate::operation::{Operation, PosData};
use crate::progress::TransitionJoin;
use crate::promise::Deferred;
use crate::queue::Callback;
use crate::report::{MixEndEvent, MixStartEvent};
use crate::state::State;
use crate::style::px;
use crate::target::{Binding, Motion, MotionContext, StatusChange, TargetId};

use super::{ActiveMix, Mixer};

impl<H: Host> Mixer<H> {
    /// Whether `op` should animate. Container visibility is read now, since
    /// it can change between building and executing.
    fn should_animate(&self, op: &Operation<H::Element>) -> bool {
        let animation = &self.config.animation;
        let no_effects = animation.effects.trim().is_empty()
            && animation.effects_in.is_none()
            && animation.effects_out.is_none();
        animation.enable
            && self.capabilities.transitions
            && animation.duration > 0
            && !no_effects
            && op.has_effect
            && !(op.start_state.show.is_empty() && op.show.is_empty())
            && self.host.is_container_visible()
    }

    /// Starts executing a built operation.
    pub(super) fn execute(
        &mut self,
        operation: Operation<H::Element>,
        animate: bool,
        callback: Option<Callback<H::Element>>,
        deferred: Option<Deferred<State<H::Element>>>,
        origin: Extension,
    ) {
        let animated = animate && self.should_animate(&operation);

        self.reporter.mix_start(&MixStartEvent {
            operation: operation.id,
            start_state: operation.start_state.id,
            timestamp: self.host.now(),
            animated,
            to_show: operation.to_show.len(),
            to_hide: operation.to_hide.len(),
            to_remove: operation.to_remove.len(),
            will_sort: operation.will_sort,
        });
        self.hooks.run(
            Extension::MixStart,
            Phase::Before,
            &mut HookPayload::Operation(&operation),
        );
        self.host
            .dispatch(MixEvent::MixStart, &operation.start_state);

        let mut active = ActiveMix {
            motions: Vec::new(),
            join: TransitionJoin::new(),
            awaiting_frame: animated,
            animated,
            callback,
            deferred,
            origin,
            operation,
        };

        if !animated {
            self.commit(active, true);
            return;
        }

        active.motions = self.motions(&active.operation);
        self.write_styles_in(&active);
        self.active = Some(active);
        self.host.request_frame();
    }

    /// One motion per moving target: `show` first, then `to_hide`.
    fn motions(&self, op: &Operation<H::Element>) -> Vec<(TargetId, Motion)> {
        let animation = &self.config.animation;
        let fading = self.effects.is_fading();
        let mut stagger_index = 0;
        let mut motions = Vec::with_capacity(op.show.len() + op.to_hide.len());

        let showing = op.show.iter().zip(&op.show_pos_data).map(|(id, data)| {
            let status = if op.to_show.contains(id) {
                StatusChange::Show
            } else {
                StatusChange::None
            };
            (*id, data, status)
        });
        let hiding = op
            .to_hide
            .iter()
            .zip(&op.to_hide_pos_data)
            .map(|(id, data)| (*id, data, StatusChange::Hide));

        for (id, data, status) in showing.chain(hiding) {
            let will_transition = transitions(data, fading, animation.animate_resize_targets);
            let motion = Motion {
                pos_in: data.pos_in.clone(),
                pos_out: data.pos_out.clone(),
                status,
                stagger_index,
                duration: animation.duration,
                will_transition,
            };
            if will_transition {
                stagger_index += 1;
            }
            motions.push((id, motion));
        }
        motions
    }

    /// Phase 1: container clamp, layout class and start styles.
    fn write_styles_in(&mut self, active: &ActiveMix<H::Element>) {
        let animation = &self.config.animation;
        let caps = &self.capabilities;
        let op = &active.operation;

        if animation.apply_perspective {
            self.host
                .set_container_style(&caps.perspective_property, &animation.perspective_distance);
            self.host.set_container_style(
                &caps.perspective_origin_property,
                &animation.perspective_origin,
            );
        }
        if animation.clamp_height {
            self.host.set_container_style("height", &px(op.start_height));
            self.host.set_container_style("overflow", "hidden");
        }
        if animation.clamp_width {
            self.host.set_container_style("width", &px(op.start_width));
            self.host.set_container_style("overflow", "hidden");
        }
        if op.will_change_layout {
            self.host.remove_container_class(&op.start_container_class);
            self.host.add_container_class(&op.new_container_class);
        }

        let ctx = MotionContext {
            animation,
            effects: &self.effects,
            capabilities: caps,
        };
        let display = &self.config.layout.display;
        for (id, motion) in &active.motions {
            let target = &self.store[*id];
            target.show(&mut self.host, display);
            target.apply_styles_in(&mut self.host, motion, &ctx);
        }
        tracing::trace!(operation = op.id, "styles in");
    }

    /// Delivers the frame requested by an animating operation: writes end
    /// styles and transition rules, then commits if nothing needs to be
    /// awaited.
    pub fn advance_frame(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        if !active.awaiting_frame {
            self.active = Some(active);
            return;
        }
        active.awaiting_frame = false;

        let animation = &self.config.animation;
        let caps = &self.capabilities;
        let op = &active.operation;
        if animation.animate_resize_container {
            let rule = format!(
                "height {d}ms ease, width {d}ms ease",
                d = animation.duration
            );
            self.host
                .set_container_style(&caps.transition_property, &rule);
            if animation.clamp_height {
                self.host.set_container_style("height", &px(op.new_height));
            }
            if animation.clamp_width {
                self.host.set_container_style("width", &px(op.new_width));
            }
        }

        let ctx = MotionContext {
            animation,
            effects: &self.effects,
            capabilities: caps,
        };
        for (id, motion) in &active.motions {
            let Some(target) = self.store.get_mut(*id) else {
                active.join.credit();
                continue;
            };
            match target.apply_styles_out(&mut self.host, motion, &ctx) {
                Binding::Bound => active.join.bind(*id),
                Binding::Excluded | Binding::Immovable => active.join.credit(),
            }
        }
        active.join.seal();
        tracing::trace!(
            operation = op.id,
            bound = active.join.bound(),
            credited = active.join.credited(),
            "styles out"
        );

        if active.join.is_complete() {
            self.commit(active, true);
            self.drain_queue();
        } else {
            self.active = Some(active);
        }
    }

    /// Reports the end of a transition on `el`. Commits the animating
    /// operation when this was the last pending target.
    pub fn handle_transition_end(&mut self, el: &H::Element, property: &str) {
        let resize = self.config.animation.animate_resize_targets;
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.awaiting_frame {
            return;
        }
        let Some(id) = self.store.find(
            &active.motions.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
            el,
        ) else {
            return;
        };
        if !active.join.is_pending(id) || !self.store[id].handle_transition_end(property, resize)
        {
            return;
        }
        active.join.settle(id);
        if !active.join.is_complete() {
            return;
        }
        if let Some(active) = self.active.take() {
            self.commit(active, true);
            self.drain_queue();
        }
    }

    /// Writes interpolated styles for `factor` (clamped to `[0, 1]`) of the
    /// way through `operation`, without touching committed state.
    pub fn tween(&mut self, operation: &Operation<H::Element>, factor: f64) {
        let mut factor = if factor.is_nan() {
            0.0
        } else {
            factor.clamp(0.0, 1.0)
        };
        self.hooks.run(
            Extension::Tween,
            Phase::Before,
            &mut HookPayload::Factor(&mut factor),
        );
        let factor = factor.clamp(0.0, 1.0);

        if operation.will_change_layout {
            self.host
                .remove_container_class(&operation.start_container_class);
            self.host
                .add_container_class(&operation.new_container_class);
        }

        let ctx = MotionContext {
            animation: &self.config.animation,
            effects: &self.effects,
            capabilities: &self.capabilities,
        };
        let display = &self.config.layout.display;
        let moving: Vec<(&TargetId, &PosData)> = operation
            .show
            .iter()
            .zip(&operation.show_pos_data)
            .chain(operation.to_hide.iter().zip(&operation.to_hide_pos_data))
            .collect();
        for (id, data) in moving {
            let Some(target) = self.store.get(*id) else {
                continue;
            };
            if operation.to_show.contains(id) {
                target.show(&mut self.host, display);
            }
            target.apply_tween(&mut self.host, data, factor, &ctx);
        }
    }

    /// Commits an operation and notifies listeners when `notify` is set.
    pub(super) fn commit(&mut self, active: ActiveMix<H::Element>, notify: bool) {
        let ActiveMix {
            operation: op,
            animated,
            callback,
            deferred,
            origin,
            ..
        } = active;

        let ctx = MotionContext {
            animation: &self.config.animation,
            effects: &self.effects,
            capabilities: &self.capabilities,
        };
        for &id in op.show.iter().chain(&op.to_hide) {
            if let Some(target) = self.store.get_mut(id) {
                target.clean_up(&mut self.host, &ctx);
            }
        }

        if op.will_sort {
            self.print_order(&op.new_order);
        }
        let display = &self.config.layout.display;
        for &id in &op.to_show {
            let target = &mut self.store[id];
            target.show(&mut self.host, display);
            target.is_shown = true;
        }
        for &id in &op.to_hide {
            let target = &mut self.store[id];
            target.hide(&mut self.host);
            target.is_shown = false;
        }

        for &id in &op.to_remove {
            if let Some(target) = self.store.remove(id) {
                self.host.unsubscribe_transition_end(target.element());
                self.host.detach(target.element());
            }
        }
        self.targets = op
            .new_order
            .iter()
            .copied()
            .filter(|id| !op.to_remove.contains(id))
            .collect();
        self.orig_order.clone_from(&op.new_orig_order);
        self.drop_orphans();

        if animated {
            self.reset_container_styles();
        }
        if op.will_change_layout {
            self.host.remove_container_class(&op.start_container_class);
            self.host.add_container_class(&op.new_container_class);
        }
        let failed_class = &self.config.class_names.container_failed;
        if op.has_failed {
            self.host.add_container_class(failed_class);
        } else {
            self.host.remove_container_class(failed_class);
        }

        self.state = op.new_state;
        if notify {
            self.reporter.mix_end(&MixEndEvent {
                operation: op.id,
                state: self.state.id,
                timestamp: self.host.now(),
                total_show: self.state.total_show,
                has_failed: self.state.has_failed,
            });
            self.hooks
                .with_state(Extension::MixEnd, Phase::Before, &self.state);
            self.host.dispatch(MixEvent::MixEnd, &self.state);
            if self.state.has_failed {
                self.hooks
                    .with_state(Extension::MixFail, Phase::Before, &self.state);
                self.host.dispatch(MixEvent::MixFail, &self.state);
            }
            self.hooks.with_state(origin, Phase::After, &self.state);
        }

        if let Some(callback) = callback {
            callback(&self.state);
        }
        if let Some(deferred) = deferred {
            deferred.resolve(self.state.clone());
        }
    }

    /// Clears the inline container styles written while animating.
    pub(super) fn reset_container_styles(&mut self) {
        let caps = &self.capabilities;
        for property in [
            caps.perspective_property.as_str(),
            caps.perspective_origin_property.as_str(),
            caps.transition_property.as_str(),
            "height",
            "width",
            "overflow",
        ] {
            self.host.remove_container_style(property);
        }
    }
}

/// Whether a target with this geometry visibly transitions. Opacity only
/// counts when it is written, i.e. when either direction fades.
fn transitions(data: &PosData, fading: bool, resize: bool) -> bool {
    let (from, to) = (&data.pos_in, &data.pos_out);
    from.differs_in_position(to)
        || from.differs_in_transforms(to)
        || (fading && from.opacity != to.opacity)
        || (resize && from.differs_in_size(to))
}
