// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host for tests.
//!
//! Elements are indices into a node table. Displayed children are laid out
//! on a fixed grid of square cells, so geometry follows order and
//! visibility the way a flow layout would.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};

use crate::host::{BoxStyle, Host, MixEvent};
use crate::state::State;

#[derive(Debug, Default)]
struct Node {
    classes: Vec<String>,
    data: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
}

/// A container with a grid layout.
#[derive(Debug)]
pub(crate) struct FakeHost {
    nodes: Vec<Node>,
    children: Vec<usize>,
    cell: f64,
    columns: usize,
    pub(crate) container: bool,
    pub(crate) container_classes: Vec<String>,
    pub(crate) container_styles: BTreeMap<String, String>,
    pub(crate) visible: bool,
    pub(crate) frames_requested: usize,
    pub(crate) events: Vec<MixEvent>,
    pub(crate) subscribed: Vec<usize>,
    seed: u64,
}

impl FakeHost {
    fn empty(cell: f64, columns: usize) -> Self {
        Self {
            nodes: Vec::new(),
            children: Vec::new(),
            cell,
            columns: columns.max(1),
            container: true,
            container_classes: Vec::new(),
            container_styles: BTreeMap::new(),
            visible: true,
            frames_requested: 0,
            events: Vec::new(),
            subscribed: Vec::new(),
            seed: 0x2545_f491_4f6c_dd1d,
        }
    }

    /// `n` attached `.mix` children.
    pub(crate) fn grid(n: usize, cell: f64, columns: usize) -> Self {
        let mut host = Self::empty(cell, columns);
        for _ in 0..n {
            let el = host.create("mix", &[]);
            host.children.push(el);
        }
        host
    }

    /// One `.mix` child per entry, with the entry's classes added.
    pub(crate) fn categories(classes: &[&str]) -> Self {
        let mut host = Self::empty(100.0, 4);
        for class in classes {
            let el = host.create(&alloc::format!("mix {class}"), &[]);
            host.children.push(el);
        }
        host
    }

    /// One `.mix` child per entry, with the entry's data attributes.
    pub(crate) fn with_data(data: &[&[(&str, &str)]]) -> Self {
        let mut host = Self::empty(100.0, 4);
        for attrs in data {
            let el = host.create("mix", attrs);
            host.children.push(el);
        }
        host
    }

    /// Creates a detached element.
    pub(crate) fn create(&mut self, classes: &str, data: &[(&str, &str)]) -> usize {
        self.nodes.push(Node {
            classes: classes.split_whitespace().map(ToString::to_string).collect(),
            data: data
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            styles: BTreeMap::new(),
        });
        self.nodes.len() - 1
    }

    /// The `i`th child.
    pub(crate) fn element(&self, i: usize) -> usize {
        self.children[i]
    }

    /// Children in document order.
    pub(crate) fn children(&self) -> Vec<usize> {
        self.children.clone()
    }

    /// An inline style of `el`.
    pub(crate) fn style(&self, el: usize, property: &str) -> Option<String> {
        self.nodes[el].styles.get(property).cloned()
    }

    /// Whether `el` is rendered.
    pub(crate) fn is_displayed(&self, el: usize) -> bool {
        self.children.contains(&el) && self.style(el, "display").as_deref() != Some("none")
    }

    /// Displayed children in document order.
    pub(crate) fn displayed(&self) -> Vec<usize> {
        self.children
            .iter()
            .copied()
            .filter(|el| self.is_displayed(*el))
            .collect()
    }

    fn is_list(&self) -> bool {
        self.container_classes.iter().any(|c| c == "list")
    }

    fn effective_columns(&self) -> usize {
        if self.is_list() { 1 } else { self.columns }
    }

    fn slot(&self, el: usize) -> Option<usize> {
        self.displayed().iter().position(|other| *other == el)
    }

    fn matches_compound(&self, el: usize, selector: &str) -> bool {
        if selector == "*" {
            return true;
        }
        let classes: Vec<&str> = selector.split('.').filter(|s| !s.is_empty()).collect();
        selector.starts_with('.')
            && !classes.is_empty()
            && classes
                .iter()
                .all(|class| self.nodes[el].classes.iter().any(|c| c == class))
    }
}

impl Host for FakeHost {
    type Element = usize;

    fn has_container(&self) -> bool {
        self.container
    }

    fn query_targets(&self, selector: &str, _nested: bool) -> Vec<usize> {
        self.children
            .iter()
            .copied()
            .filter(|el| self.matches(el, selector))
            .collect()
    }

    fn matches(&self, el: &usize, selector: &str) -> bool {
        selector
            .split(',')
            .map(str::trim)
            .any(|part| self.matches_compound(*el, part))
    }

    fn data_attribute(&self, el: &usize, key: &str) -> Option<String> {
        self.nodes[*el].data.get(key).cloned()
    }

    fn next_element_sibling(&self, el: &usize) -> Option<usize> {
        let i = self.children.iter().position(|other| other == el)?;
        self.children.get(i + 1).copied()
    }

    fn offset_position(&self, el: &usize) -> Point {
        let columns = self.effective_columns();
        self.slot(*el).map_or(Point::ZERO, |slot| {
            Point::new(
                (slot % columns) as f64 * self.cell,
                (slot / columns) as f64 * self.cell,
            )
        })
    }

    fn bounding_size(&self, el: &usize) -> Size {
        if !self.is_displayed(*el) {
            Size::ZERO
        } else if self.is_list() {
            // List rows span the container.
            Size::new(self.columns as f64 * self.cell, self.cell)
        } else {
            Size::new(self.cell, self.cell)
        }
    }

    fn computed_box(&self, _el: &usize) -> BoxStyle {
        BoxStyle::default()
    }

    fn container_rect(&self) -> Rect {
        let columns = self.effective_columns();
        let rows = self.displayed().len().div_ceil(columns);
        Rect::new(
            0.0,
            0.0,
            self.columns as f64 * self.cell,
            rows as f64 * self.cell,
        )
    }

    fn container_box(&self) -> BoxStyle {
        BoxStyle::default()
    }

    fn is_container_visible(&self) -> bool {
        self.visible
    }

    fn set_style(&mut self, el: &usize, property: &str, value: &str) {
        self.nodes[*el]
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn remove_style(&mut self, el: &usize, property: &str) {
        self.nodes[*el].styles.remove(property);
    }

    fn set_container_style(&mut self, property: &str, value: &str) {
        self.container_styles
            .insert(property.to_string(), value.to_string());
    }

    fn remove_container_style(&mut self, property: &str) {
        self.container_styles.remove(property);
    }

    fn add_container_class(&mut self, class: &str) {
        if !class.is_empty() && !self.container_classes.iter().any(|c| c == class) {
            self.container_classes.push(class.to_string());
        }
    }

    fn remove_container_class(&mut self, class: &str) {
        self.container_classes.retain(|c| c != class);
    }

    fn insert_before(&mut self, el: &usize, reference: Option<&usize>) {
        self.children.retain(|other| other != el);
        let at = reference
            .and_then(|r| self.children.iter().position(|other| other == r))
            .unwrap_or(self.children.len());
        self.children.insert(at, *el);
    }

    fn detach(&mut self, el: &usize) {
        self.children.retain(|other| other != el);
    }

    fn subscribe_transition_end(&mut self, el: &usize) {
        self.subscribed.push(*el);
    }

    fn unsubscribe_transition_end(&mut self, el: &usize) {
        self.subscribed.retain(|other| other != el);
    }

    fn request_frame(&mut self) {
        self.frames_requested += 1;
    }

    fn dispatch(&mut self, event: MixEvent, _state: &State<usize>) {
        self.events.push(event);
    }

    fn random(&mut self) -> f64 {
        // xorshift64*
        self.seed ^= self.seed >> 12;
        self.seed ^= self.seed << 25;
        self.seed ^= self.seed >> 27;
        let bits = self.seed.wrapping_mul(0x2545_f491_4f6c_dd1d) >> 11;
        bits as f64 / (1_u64 << 53) as f64
    }
}
