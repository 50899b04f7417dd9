// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Host`] implementation over a live DOM container.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Insets, Point, Rect, Size};
use mixgrid_core::host::{BoxStyle, Capabilities, Host, MixEvent};
use mixgrid_core::state::State;
use mixgrid_core::style::parse_leading_float;
use wasm_bindgen::JsCast as _;
use web_sys::{CssStyleDeclaration, CustomEvent, CustomEventInit, HtmlElement, Node};

use crate::convert::state_to_js;
use crate::events::TransitionBridge;
use crate::raf::{FrameRequest, performance_now};

/// Drives one container element.
///
/// Frame requests go through a [`FrameRequest`] and `transitionend`
/// subscriptions through a [`TransitionBridge`]; both are shared handles, so
/// whoever owns the mixer installs their callbacks after moving the host
/// in (see [`WebMixer`](crate::WebMixer)).
pub struct DomHost {
    container: HtmlElement,
    frames: FrameRequest,
    bridge: TransitionBridge,
}

impl core::fmt::Debug for DomHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomHost")
            .field("container", &self.container.tag_name())
            .field("frames", &self.frames)
            .field("bridge", &self.bridge)
            .finish()
    }
}

impl DomHost {
    /// Wraps `container`, listening for the transition-end event named by
    /// `capabilities`.
    #[must_use]
    pub fn new(container: HtmlElement, capabilities: &Capabilities) -> Self {
        Self {
            container,
            frames: FrameRequest::new(),
            bridge: TransitionBridge::new(&capabilities.transition_end_event),
        }
    }

    /// The container element.
    #[must_use]
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// The frame request handle.
    #[must_use]
    pub fn frames(&self) -> &FrameRequest {
        &self.frames
    }

    /// The transition-end bridge.
    #[must_use]
    pub fn bridge(&self) -> &TransitionBridge {
        &self.bridge
    }

    fn computed(&self, el: &HtmlElement) -> Option<CssStyleDeclaration> {
        web_sys::window()?.get_computed_style(el).ok().flatten()
    }
}

/// Reads a box style through a computed-style property lookup.
pub(crate) fn box_style(read: impl Fn(&str) -> String) -> BoxStyle {
    let length = |property: &str| parse_leading_float(&read(property)).unwrap_or(0.0);
    let insets = |prefix: &str, suffix: &str| Insets {
        x0: length(&format!("{prefix}-left{suffix}")),
        y0: length(&format!("{prefix}-top{suffix}")),
        x1: length(&format!("{prefix}-right{suffix}")),
        y1: length(&format!("{prefix}-bottom{suffix}")),
    };
    BoxStyle {
        margin: insets("margin", ""),
        padding: insets("padding", ""),
        border: insets("border", "-width"),
        border_box: read("box-sizing").trim() == "border-box",
        opacity: parse_leading_float(&read("opacity")).unwrap_or(1.0),
    }
}

fn as_html(el: Option<web_sys::Element>) -> Option<HtmlElement> {
    el?.dyn_into::<HtmlElement>().ok()
}

impl Host for DomHost {
    type Element = HtmlElement;

    fn query_targets(&self, selector: &str, nested: bool) -> Vec<HtmlElement> {
        let Ok(list) = self.container.query_selector_all(selector) else {
            tracing::warn!(%selector, "invalid target selector");
            return Vec::new();
        };
        let container: &Node = self.container.as_ref();
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter(|node| nested || node.parent_node().as_ref() == Some(container))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect()
    }

    fn matches(&self, el: &HtmlElement, selector: &str) -> bool {
        el.matches(selector).unwrap_or(false)
    }

    fn data_attribute(&self, el: &HtmlElement, key: &str) -> Option<String> {
        el.dataset().get(key)
    }

    fn next_element_sibling(&self, el: &HtmlElement) -> Option<HtmlElement> {
        as_html(el.next_element_sibling())
    }

    fn describe(&self, el: &HtmlElement) -> String {
        let class = el.class_name();
        if class.is_empty() {
            format!("<{}>", el.tag_name().to_lowercase())
        } else {
            format!("<{} class=\"{class}\">", el.tag_name().to_lowercase())
        }
    }

    fn offset_position(&self, el: &HtmlElement) -> Point {
        Point::new(f64::from(el.offset_left()), f64::from(el.offset_top()))
    }

    fn bounding_size(&self, el: &HtmlElement) -> Size {
        let rect = el.get_bounding_client_rect();
        Size::new(rect.width(), rect.height())
    }

    fn computed_box(&self, el: &HtmlElement) -> BoxStyle {
        self.computed(el).map_or_else(BoxStyle::default, |style| {
            box_style(|p| style.get_property_value(p).unwrap_or_default())
        })
    }

    fn container_rect(&self) -> Rect {
        let rect = self.container.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.right(), rect.bottom())
    }

    fn container_box(&self) -> BoxStyle {
        self.computed_box(&self.container)
    }

    fn is_container_visible(&self) -> bool {
        self.container.offset_parent().is_some()
    }

    fn set_style(&mut self, el: &HtmlElement, property: &str, value: &str) {
        let _ = el.style().set_property(property, value);
    }

    fn remove_style(&mut self, el: &HtmlElement, property: &str) {
        let _ = el.style().remove_property(property);
    }

    fn set_container_style(&mut self, property: &str, value: &str) {
        let _ = self.container.style().set_property(property, value);
    }

    fn remove_container_style(&mut self, property: &str) {
        let _ = self.container.style().remove_property(property);
    }

    fn add_container_class(&mut self, class: &str) {
        if !class.is_empty() {
            let _ = self.container.class_list().add_1(class);
        }
    }

    fn remove_container_class(&mut self, class: &str) {
        if !class.is_empty() {
            let _ = self.container.class_list().remove_1(class);
        }
    }

    fn insert_before(&mut self, el: &HtmlElement, reference: Option<&HtmlElement>) {
        let reference: Option<&Node> = reference.map(AsRef::as_ref);
        let _ = self.container.insert_before(el, reference);
    }

    fn detach(&mut self, el: &HtmlElement) {
        el.remove();
    }

    fn subscribe_transition_end(&mut self, el: &HtmlElement) {
        self.bridge.subscribe(el);
    }

    fn unsubscribe_transition_end(&mut self, el: &HtmlElement) {
        self.bridge.unsubscribe(el);
    }

    fn request_frame(&mut self) {
        self.frames.request();
    }

    fn dispatch(&mut self, event: MixEvent, state: &State<HtmlElement>) {
        let init = CustomEventInit::new();
        init.set_bubbles(true);
        init.set_detail(&state_to_js(state));
        match CustomEvent::new_with_event_init_dict(event.name(), &init) {
            Ok(custom) => {
                let _ = self.container.dispatch_event(&custom);
            }
            Err(_) => tracing::warn!(event = event.name(), "custom event rejected"),
        }
    }

    fn now(&self) -> f64 {
        performance_now()
    }

    fn random(&mut self) -> f64 {
        js_sys::Math::random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_style_parses_computed_lengths() {
        let style = box_style(|p| {
            String::from(match p {
                "margin-right" => "12px",
                "margin-bottom" => "4.5px",
                "padding-left" => "10px",
                "border-top-width" => "2px",
                "box-sizing" => "border-box",
                "opacity" => "0.5",
                _ => "",
            })
        });
        assert_eq!(style.margin.x1, 12.0);
        assert_eq!(style.margin.y1, 4.5);
        assert_eq!(style.padding.x0, 10.0);
        assert_eq!(style.border.y0, 2.0);
        assert!(style.border_box);
        assert_eq!(style.opacity, 0.5);
    }

    #[test]
    fn box_style_defaults_missing_values() {
        let style = box_style(|_| String::new());
        assert_eq!(style, BoxStyle::default());
    }
}
