// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Targets: the engine's wrapper around one container child.
//!
//! A [`Target`] owns the show/hide/move/tween primitives for its element and
//! captures geometry for the three snapshots of an operation. Moving is a
//! two-phase write: [`Target::apply_styles_in`] writes the start state
//! synchronously, and [`Target::apply_styles_out`] writes the end state and
//! transition declaration one frame later.
//!
//! `is_shown` is committed state. [`Target::show`] and [`Target::hide`] only
//! change the display value; the mixer flips `is_shown` when an operation
//! commits.

mod id;
mod store;

pub use id::TargetId;
pub use store::TargetStore;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::config::AnimationConfig;
use crate::effects::Effects;
use crate::host::{Capabilities, Host};
use crate::operation::PosData;
use crate::style::{StyleSnapshot, TransformChannel, px, translate_css};

/// How a target's visibility changes during an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatusChange {
    /// Hidden before, shown after.
    Show,
    /// Shown before, hidden after.
    Hide,
    /// Shown before and after; may still move.
    None,
}

/// Outcome of writing end styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    /// The target transitions and its completion is awaited.
    Bound,
    /// The target transitions but is excluded from completion counting.
    Excluded,
    /// The target will not visibly transition.
    Immovable,
}

/// Everything needed to move one target from `pos_in` to `pos_out`.
#[derive(Clone, Debug, PartialEq)]
pub struct Motion {
    /// Start styles, relative to the intermediate layout.
    pub pos_in: StyleSnapshot,
    /// End styles, relative to the intermediate layout.
    pub pos_out: StyleSnapshot,
    /// Visibility change.
    pub status: StatusChange,
    /// Position in the stagger sequence.
    pub stagger_index: usize,
    /// Transition duration in milliseconds.
    pub duration: u32,
    /// Whether the target visibly transitions.
    pub will_transition: bool,
}

/// Read-only configuration shared by every target primitive.
#[derive(Clone, Copy, Debug)]
pub struct MotionContext<'a> {
    /// Animation settings.
    pub animation: &'a AnimationConfig,
    /// Parsed effects.
    pub effects: &'a Effects,
    /// Environment capabilities.
    pub capabilities: &'a Capabilities,
}

impl MotionContext<'_> {
    fn is_active(&self, channel: TransformChannel) -> bool {
        self.effects.effects_in.is_active(channel) || self.effects.effects_out.is_active(channel)
    }
}

/// One container child.
#[derive(Clone, Debug)]
pub struct Target<E> {
    element: E,
    /// Cached primary sort-key value from the most recent attribute sort.
    pub sort_string: String,
    /// Whether the target is shown in the committed state.
    pub is_shown: bool,
    /// Whether a transition-completion notification is awaited.
    pub is_bound: bool,
    /// Whether the target is left out of completion counting.
    pub is_excluded: bool,
}

impl<E> Target<E> {
    /// Wraps an element. The target starts hidden.
    #[must_use]
    pub fn new(element: E) -> Self {
        Self {
            element,
            sort_string: String::new(),
            is_shown: false,
            is_bound: false,
            is_excluded: false,
        }
    }

    /// The wrapped element.
    #[inline]
    #[must_use]
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Accepts a transition-completion notification for `property`.
    ///
    /// Returns `true` when the notification completes the target's pending
    /// transition. Unbound targets ignore every notification, which filters
    /// out transitions driven by stylesheets.
    pub fn handle_transition_end(&mut self, property: &str, can_resize: bool) -> bool {
        if !self.is_bound {
            return false;
        }
        let relevant = property.contains("transform")
            || property.contains("opacity")
            || (can_resize
                && (property.contains("height")
                    || property.contains("width")
                    || property.contains("margin")));
        if relevant {
            self.is_bound = false;
        }
        relevant
    }
}

impl<E> Target<E> {
    /// Writes the given display value.
    pub fn show<H: Host<Element = E>>(&self, host: &mut H, display: &str) {
        host.set_style(&self.element, "display", display);
    }

    /// Writes `display: none`.
    pub fn hide<H: Host<Element = E>>(&self, host: &mut H) {
        host.set_style(&self.element, "display", "none");
    }

    /// Captures the current geometry of the element.
    ///
    /// Margins are read only when `with_margins` is set, since they require
    /// a computed-style read.
    pub fn pos_data<H: Host<Element = E>>(&self, host: &H, with_margins: bool) -> StyleSnapshot {
        let pos = host.offset_position(&self.element);
        let size = host.bounding_size(&self.element);
        let mut data = StyleSnapshot {
            x: pos.x,
            y: pos.y,
            width: size.width,
            height: size.height,
            ..StyleSnapshot::default()
        };
        if with_margins {
            let style = host.computed_box(&self.element);
            data.margin_right = style.margin.x1;
            data.margin_bottom = style.margin.y1;
            data.opacity = style.opacity;
        }
        data
    }

    /// Writes start styles: size, opacity, translate and entrance transforms.
    pub fn apply_styles_in<H: Host<Element = E>>(
        &self,
        host: &mut H,
        motion: &Motion,
        ctx: &MotionContext<'_>,
    ) {
        let pos_in = &motion.pos_in;
        if ctx.animation.animate_resize_targets {
            self.write_size(host, pos_in);
        }
        if ctx.effects.is_fading() {
            host.set_style(&self.element, "opacity", &format!("{}", pos_in.opacity));
        }
        let mut values = Vec::new();
        values.push(translate_css(pos_in.x, pos_in.y));
        if motion.status == StatusChange::Show && ctx.effects.effects_in.has_transforms() {
            values.push(
                pos_in
                    .transforms
                    .to_css(|c| ctx.effects.effects_in.is_active(c)),
            );
        }
        host.set_style(
            &self.element,
            &ctx.capabilities.transform_property,
            &values.join(" "),
        );
    }

    /// Writes the transition declaration and end styles.
    ///
    /// Targets that will not visibly transition get no transition and report
    /// [`Binding::Immovable`]; the caller credits them immediately.
    pub fn apply_styles_out<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        motion: &Motion,
        ctx: &MotionContext<'_>,
    ) -> Binding {
        if !motion.will_transition {
            return Binding::Immovable;
        }

        let resize = ctx.animation.animate_resize_targets;
        let mut rules = Vec::new();
        rules.push(transition_rule(
            &ctx.capabilities.transform_rule,
            motion.stagger_index,
            motion.duration,
            ctx,
        ));
        if motion.status != StatusChange::None {
            rules.push(transition_rule(
                "opacity",
                motion.stagger_index,
                motion.duration,
                ctx,
            ));
        }
        if resize {
            for property in ["width", "height", "margin-right", "margin-bottom"] {
                rules.push(transition_rule(
                    property,
                    motion.stagger_index,
                    motion.duration,
                    ctx,
                ));
            }
        }

        let binding = if self.is_excluded {
            Binding::Excluded
        } else {
            self.is_bound = true;
            Binding::Bound
        };

        host.set_style(
            &self.element,
            &ctx.capabilities.transition_property,
            &rules.join(", "),
        );

        let pos_out = &motion.pos_out;
        if resize {
            self.write_size(host, pos_out);
        }
        if ctx.effects.is_fading() {
            host.set_style(&self.element, "opacity", &format!("{}", pos_out.opacity));
        }

        let nudge = ctx.animation.nudge;
        let translate = translate_css(pos_out.x, pos_out.y);
        let mut values = Vec::new();
        if !nudge && motion.status == StatusChange::Hide {
            // Translate first so exit transforms cannot move the target sideways.
            values.push(translate.clone());
        }
        if motion.status == StatusChange::Hide && ctx.effects.effects_out.has_transforms() {
            values.push(
                pos_out
                    .transforms
                    .to_css(|c| ctx.effects.effects_out.is_active(c)),
            );
        }
        if nudge || motion.status != StatusChange::Hide {
            values.push(translate);
        }
        host.set_style(
            &self.element,
            &ctx.capabilities.transform_property,
            &values.join(" "),
        );

        binding
    }

    /// Writes the styles at `factor` of the way from `pos_in` to `pos_out`.
    pub fn apply_tween<H: Host<Element = E>>(
        &self,
        host: &mut H,
        pos_data: &PosData,
        factor: f64,
        ctx: &MotionContext<'_>,
    ) {
        let current = pos_data.pos_in.lerp(&pos_data.tween, factor);
        if ctx.animation.animate_resize_targets {
            self.write_size(host, &current);
        }
        if ctx.effects.is_fading() {
            host.set_style(&self.element, "opacity", &format!("{}", current.opacity));
        }
        let mut value = translate_css(current.x, current.y);
        let effects = current.transforms.to_css(|c| ctx.is_active(c));
        if !effects.is_empty() {
            value.push(' ');
            value.push_str(&effects);
        }
        host.set_style(&self.element, &ctx.capabilities.transform_property, &value);
    }

    /// Clears every inline style written by the move and tween primitives.
    pub fn clean_up<H: Host<Element = E>>(&mut self, host: &mut H, ctx: &MotionContext<'_>) {
        host.remove_style(&self.element, &ctx.capabilities.transform_property);
        host.remove_style(&self.element, &ctx.capabilities.transition_property);
        host.remove_style(&self.element, "opacity");
        if ctx.animation.animate_resize_targets {
            for property in ["width", "height", "margin-right", "margin-bottom"] {
                host.remove_style(&self.element, property);
            }
        }
        self.is_bound = false;
    }

    fn write_size<H: Host<Element = E>>(&self, host: &mut H, data: &StyleSnapshot) {
        host.set_style(&self.element, "width", &px(data.width));
        host.set_style(&self.element, "height", &px(data.height));
        host.set_style(&self.element, "margin-right", &px(data.margin_right));
        host.set_style(&self.element, "margin-bottom", &px(data.margin_bottom));
    }
}

/// Formats one transition rule: `property duration delay easing`.
///
/// Opacity always eases linearly; the delay is the stagger step times the
/// target's stagger index.
#[must_use]
pub fn transition_rule(
    property: &str,
    stagger_index: usize,
    duration: u32,
    ctx: &MotionContext<'_>,
) -> String {
    let delay = stagger_index as f64 * ctx.effects.stagger_ms;
    let easing = if property == "opacity" {
        "linear"
    } else {
        ctx.animation.easing.as_str()
    };
    format!("{property} {duration}ms {delay}ms {easing}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::FakeHost;

    fn motion(status: StatusChange) -> Motion {
        Motion {
            pos_in: StyleSnapshot {
                x: 10.0,
                y: 0.0,
                ..StyleSnapshot::default()
            },
            pos_out: StyleSnapshot {
                opacity: 0.0,
                ..StyleSnapshot::default()
            },
            status,
            stagger_index: 2,
            duration: 300,
            will_transition: true,
        }
    }

    #[test]
    fn transition_rule_staggers_and_uses_linear_opacity() {
        let animation = AnimationConfig::default();
        let effects = Effects {
            stagger_ms: 30.0,
            ..Effects::from_config(&animation)
        };
        let caps = Capabilities::standard();
        let ctx = MotionContext {
            animation: &animation,
            effects: &effects,
            capabilities: &caps,
        };
        assert_eq!(
            transition_rule("transform", 2, 600, &ctx),
            "transform 600ms 60ms ease"
        );
        assert_eq!(
            transition_rule("opacity", 0, 600, &ctx),
            "opacity 600ms 0ms linear"
        );
    }

    #[test]
    fn transition_end_filters_properties() {
        let mut target = Target::new(0_usize);
        assert!(!target.handle_transition_end("transform", false));
        target.is_bound = true;
        assert!(!target.handle_transition_end("color", false));
        assert!(!target.handle_transition_end("width", false));
        assert!(target.is_bound);
        assert!(target.handle_transition_end("width", true));
        assert!(!target.is_bound);
        target.is_bound = true;
        assert!(target.handle_transition_end("opacity", false));
    }

    #[test]
    fn hide_without_nudge_translates_first() {
        let mut host = FakeHost::grid(1, 100.0, 1);
        let el = host.element(0);
        let animation = AnimationConfig {
            nudge: false,
            effects: String::from("fade translateX(30px)"),
            ..AnimationConfig::default()
        };
        let effects = Effects::from_config(&animation);
        let caps = Capabilities::standard();
        let ctx = MotionContext {
            animation: &animation,
            effects: &effects,
            capabilities: &caps,
        };
        let mut target = Target::new(el);
        let mut m = motion(StatusChange::Hide);
        m.pos_out.transforms = effects.effects_out.transforms;
        assert_eq!(target.apply_styles_out(&mut host, &m, &ctx), Binding::Bound);
        assert_eq!(
            host.style(el, "transform").as_deref(),
            Some("translate(0px, 0px) translateX(30px)")
        );

        let nudging = AnimationConfig {
            nudge: true,
            ..animation.clone()
        };
        let ctx = MotionContext {
            animation: &nudging,
            ..ctx
        };
        target.apply_styles_out(&mut host, &m, &ctx);
        assert_eq!(
            host.style(el, "transform").as_deref(),
            Some("translateX(30px) translate(0px, 0px)")
        );
    }

    #[test]
    fn immovable_targets_are_not_bound() {
        let mut host = FakeHost::grid(1, 100.0, 1);
        let el = host.element(0);
        let animation = AnimationConfig::default();
        let effects = Effects::from_config(&animation);
        let caps = Capabilities::standard();
        let ctx = MotionContext {
            animation: &animation,
            effects: &effects,
            capabilities: &caps,
        };
        let mut target = Target::new(el);
        let mut m = motion(StatusChange::None);
        m.will_transition = false;
        assert_eq!(
            target.apply_styles_out(&mut host, &m, &ctx),
            Binding::Immovable
        );
        assert!(!target.is_bound);
        assert_eq!(host.style(el, "transition"), None);

        target.is_excluded = true;
        m.will_transition = true;
        assert_eq!(
            target.apply_styles_out(&mut host, &m, &ctx),
            Binding::Excluded
        );
        assert!(!target.is_bound);
    }
}
