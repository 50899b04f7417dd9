// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for environment integrations.
//!
//! The engine never touches a document directly. Everything it needs from the
//! environment goes through the [`Host`] trait:
//!
//! - **Geometry provider**: offset positions, bounding sizes and computed box
//!   styles of targets and the container.
//! - **Mutation helpers**: inline style writes, container classes, child
//!   insertion and detachment.
//! - **Transition-completion notifier**: per-element subscription; the host
//!   reports each `transitionend` back through
//!   [`Mixer::handle_transition_end`](crate::mixer::Mixer::handle_transition_end).
//! - **Frame primitive**: [`Host::request_frame`] asks for one callback
//!   before the next paint, delivered as
//!   [`Mixer::advance_frame`](crate::mixer::Mixer::advance_frame).
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! // once
//! let mixer = Rc::new(RefCell::new(Mixer::new(host, config, capabilities)?));
//!
//! // on every requested animation frame
//! mixer.borrow_mut().advance_frame();
//!
//! // on every transitionend event of a subscribed element
//! mixer.borrow_mut().handle_transition_end(&element, &event.property_name());
//! ```

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;

use kurbo::{Insets, Point, Rect, Size};

use crate::state::State;

/// Computed box-model values of one element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxStyle {
    /// Margins (`x0` left, `y0` top, `x1` right, `y1` bottom).
    pub margin: Insets,
    /// Padding.
    pub padding: Insets,
    /// Border widths.
    pub border: Insets,
    /// Whether `box-sizing` is `border-box`.
    pub border_box: bool,
    /// Computed opacity.
    pub opacity: f64,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            margin: Insets::ZERO,
            padding: Insets::ZERO,
            border: Insets::ZERO,
            border_box: false,
            opacity: 1.0,
        }
    }
}

/// Host-level notifications, mirrored as custom events by DOM hosts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MixEvent {
    /// An operation is about to start.
    MixStart,
    /// An operation committed.
    MixEnd,
    /// An operation committed with a filter that matched nothing.
    MixFail,
    /// A call was rejected because the mixer was busy.
    MixBusy,
}

impl MixEvent {
    /// The DOM custom event name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MixStart => "mixStart",
            Self::MixEnd => "mixEnd",
            Self::MixFail => "mixFail",
            Self::MixBusy => "mixBusy",
        }
    }
}

/// Environment capabilities, detected once and shared by every mixer.
///
/// Wrap in an `Rc` and hand the same value to each
/// [`Mixer`](crate::mixer::Mixer); nothing in the engine reads ambient
/// feature flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Whether CSS transitions are supported.
    pub transitions: bool,
    /// Inline style property used for transforms.
    pub transform_property: String,
    /// Property name written inside transition rules for transforms.
    pub transform_rule: String,
    /// Inline style property used for transitions.
    pub transition_property: String,
    /// Inline style property used for perspective.
    pub perspective_property: String,
    /// Inline style property used for perspective origin.
    pub perspective_origin_property: String,
    /// Name of the transition-completion event.
    pub transition_end_event: String,
}

impl Capabilities {
    /// Unprefixed standard capabilities.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            transitions: true,
            transform_property: String::from("transform"),
            transform_rule: String::from("transform"),
            transition_property: String::from("transition"),
            perspective_property: String::from("perspective"),
            perspective_origin_property: String::from("perspective-origin"),
            transition_end_event: String::from("transitionend"),
        }
    }

    /// Capabilities of an environment without transitions; every operation
    /// commits synchronously.
    #[must_use]
    pub fn without_transitions() -> Self {
        Self {
            transitions: false,
            ..Self::standard()
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::standard()
    }
}

/// The environment a [`Mixer`](crate::mixer::Mixer) runs in.
///
/// Implementations own a single container element. `Element` handles must
/// compare equal exactly when they refer to the same node.
pub trait Host {
    /// Handle to one element.
    type Element: Clone + PartialEq + Debug;

    // -- queries --

    /// Whether the host is attached to a container element.
    fn has_container(&self) -> bool {
        true
    }

    /// Returns the container's descendants matching `selector`, in document
    /// order. With `nested == false` only direct children are returned.
    fn query_targets(&self, selector: &str, nested: bool) -> Vec<Self::Element>;

    /// Whether `el` matches a CSS selector.
    fn matches(&self, el: &Self::Element, selector: &str) -> bool;

    /// Reads a `data-*` attribute by its camel-cased dataset key.
    fn data_attribute(&self, el: &Self::Element, key: &str) -> Option<String>;

    /// The next element sibling of `el`, if any.
    fn next_element_sibling(&self, el: &Self::Element) -> Option<Self::Element>;

    /// A short human-readable description of `el` for diagnostics.
    fn describe(&self, el: &Self::Element) -> String {
        alloc::format!("{el:?}")
    }

    // -- geometry --

    /// Offset of `el` relative to its nearest positioned ancestor.
    fn offset_position(&self, el: &Self::Element) -> Point;

    /// Bounding-box size of `el`.
    fn bounding_size(&self, el: &Self::Element) -> Size;

    /// Computed box style of `el`.
    fn computed_box(&self, el: &Self::Element) -> BoxStyle;

    /// Bounding rectangle of the container.
    fn container_rect(&self) -> Rect;

    /// Computed box style of the container.
    fn container_box(&self) -> BoxStyle;

    /// Whether the container is rendered. Invisible containers never
    /// receive transition-completion events.
    fn is_container_visible(&self) -> bool;

    // -- mutation --

    /// Writes an inline style property of `el`.
    fn set_style(&mut self, el: &Self::Element, property: &str, value: &str);

    /// Clears an inline style property of `el`.
    fn remove_style(&mut self, el: &Self::Element, property: &str);

    /// Writes an inline style property of the container.
    fn set_container_style(&mut self, property: &str, value: &str);

    /// Clears an inline style property of the container.
    fn remove_container_style(&mut self, property: &str);

    /// Adds a class to the container. Empty names are ignored.
    fn add_container_class(&mut self, class: &str);

    /// Removes a class from the container. Empty names are ignored.
    fn remove_container_class(&mut self, class: &str);

    /// Inserts `el` into the container before `reference`, or at the end
    /// when `reference` is `None`. Moves `el` if it is already attached.
    fn insert_before(&mut self, el: &Self::Element, reference: Option<&Self::Element>);

    /// Detaches `el` from the document.
    fn detach(&mut self, el: &Self::Element);

    // -- notifications --

    /// Starts delivering transition-completion events of `el`.
    fn subscribe_transition_end(&mut self, el: &Self::Element);

    /// Stops delivering transition-completion events of `el`.
    fn unsubscribe_transition_end(&mut self, el: &Self::Element);

    /// Requests one [`Mixer::advance_frame`](crate::mixer::Mixer::advance_frame)
    /// call before the next paint.
    fn request_frame(&mut self);

    /// Publishes a host-level notification. Default: ignored.
    fn dispatch(&mut self, event: MixEvent, state: &State<Self::Element>) {
        _ = (event, state);
    }

    // -- environment --

    /// Monotonic time in milliseconds, used for diagnostics.
    fn now(&self) -> f64 {
        0.0
    }

    /// A uniformly distributed number in `[0, 1)`.
    fn random(&mut self) -> f64;
}
