// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filter commands and show/hide partitioning.

use alloc::string::String;
use alloc::vec::Vec;

use crate::host::Host;
use crate::target::{TargetId, TargetStore};

/// What a filter tests each target against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterPredicate<E> {
    /// Every target (the configured target selector).
    All,
    /// No target.
    None,
    /// A CSS selector. An empty selector matches nothing.
    Selector(String),
    /// A single element.
    Element(E),
    /// A set of elements.
    Collection(Vec<E>),
}

/// Whether matching targets are shown or hidden.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterAction {
    /// Matching targets are shown; the rest are hidden.
    #[default]
    Show,
    /// Matching targets are hidden; the rest are shown.
    Hide,
}

/// A filter request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterCommand<E> {
    /// The test.
    pub predicate: FilterPredicate<E>,
    /// What to do with targets that pass the test.
    pub action: FilterAction,
}

impl<E> FilterCommand<E> {
    /// Parses a selector string: `"all"`, `"none"`, or a CSS selector.
    /// An empty string is treated as `"none"`.
    #[must_use]
    pub fn parse(selector: &str) -> Self {
        let predicate = match selector.trim() {
            "all" => FilterPredicate::All,
            "none" | "" => FilterPredicate::None,
            s => FilterPredicate::Selector(String::from(s)),
        };
        Self {
            predicate,
            action: FilterAction::Show,
        }
    }

    /// Shows every target.
    #[must_use]
    pub fn all() -> Self {
        Self::from(FilterPredicate::All)
    }

    /// Hides every target.
    #[must_use]
    pub fn none() -> Self {
        Self::from(FilterPredicate::None)
    }

    /// Shows one element and hides the rest.
    #[must_use]
    pub fn element(el: E) -> Self {
        Self::from(FilterPredicate::Element(el))
    }

    /// Shows the given elements and hides the rest.
    #[must_use]
    pub fn collection(els: Vec<E>) -> Self {
        Self::from(FilterPredicate::Collection(els))
    }

    /// Inverts the command: matching targets are hidden instead.
    #[must_use]
    pub fn hiding(mut self) -> Self {
        self.action = FilterAction::Hide;
        self
    }

    /// Whether this command explicitly shows nothing.
    #[must_use]
    pub fn is_none(&self) -> bool {
        match &self.predicate {
            FilterPredicate::None => true,
            FilterPredicate::Selector(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl<E> From<FilterPredicate<E>> for FilterCommand<E> {
    fn from(predicate: FilterPredicate<E>) -> Self {
        Self {
            predicate,
            action: FilterAction::Show,
        }
    }
}

impl<E> Default for FilterCommand<E> {
    fn default() -> Self {
        Self::all()
    }
}

/// Show/hide partition of an ordered target list.
///
/// Each list keeps the relative order of the input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    /// Targets visible after the operation.
    pub show: Vec<TargetId>,
    /// Targets hidden after the operation.
    pub hide: Vec<TargetId>,
    /// Targets that passed the filter, before removals were applied.
    pub matching: Vec<TargetId>,
    /// Targets in `show` that are currently hidden.
    pub to_show: Vec<TargetId>,
    /// Targets in `hide` that are currently shown.
    pub to_hide: Vec<TargetId>,
    /// Whether the filter matched nothing without being an explicit `none`.
    pub has_failed: bool,
}

/// Partitions `order` by `command`.
///
/// Targets in `removing` are placed in `hide` (and in `to_hide` when currently
/// shown) regardless of the test, so their removal animates as a hide.
pub fn partition<H: Host>(
    host: &H,
    store: &TargetStore<H::Element>,
    order: &[TargetId],
    command: &FilterCommand<H::Element>,
    target_selector: &str,
    removing: &[TargetId],
) -> Partition {
    let mut out = Partition::default();

    for &id in order {
        let target = &store[id];
        let el = target.element();
        let test = match &command.predicate {
            FilterPredicate::All => host.matches(el, target_selector),
            FilterPredicate::None => false,
            FilterPredicate::Selector(s) => !s.is_empty() && host.matches(el, s),
            FilterPredicate::Element(other) => el == other,
            FilterPredicate::Collection(els) => els.contains(el),
        };
        let passes = match command.action {
            FilterAction::Show => test,
            FilterAction::Hide => !test,
        };
        if passes {
            out.matching.push(id);
        }

        if passes && !removing.contains(&id) {
            out.show.push(id);
            if !target.is_shown {
                out.to_show.push(id);
            }
        } else {
            out.hide.push(id);
            if target.is_shown {
                out.to_hide.push(id);
            }
        }
    }

    out.has_failed = out.matching.is_empty() && !command.is_none();
    out
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::mock::FakeHost;
    use crate::target::Target;

    fn setup(host: &FakeHost) -> (TargetStore<usize>, Vec<TargetId>) {
        let mut store = TargetStore::new();
        let ids = host
            .children()
            .into_iter()
            .map(|el| {
                let mut t = Target::new(el);
                t.is_shown = true;
                store.insert(t)
            })
            .collect();
        (store, ids)
    }

    #[test]
    fn parse_keywords() {
        assert_eq!(FilterCommand::<usize>::parse("all").predicate, FilterPredicate::All);
        assert!(FilterCommand::<usize>::parse("none").is_none());
        assert!(FilterCommand::<usize>::parse("").is_none());
        assert_eq!(
            FilterCommand::<usize>::parse(".a").predicate,
            FilterPredicate::Selector(String::from(".a"))
        );
    }

    #[test]
    fn selector_partitions_in_order() {
        let host = FakeHost::categories(&["a", "b", "a", "b"]);
        let (store, ids) = setup(&host);
        let p = partition(&host, &store, &ids, &FilterCommand::parse(".a"), ".mix", &[]);
        assert_eq!(p.show, [ids[0], ids[2]]);
        assert_eq!(p.hide, [ids[1], ids[3]]);
        assert_eq!(p.matching, p.show);
        assert!(p.to_show.is_empty());
        assert_eq!(p.to_hide, [ids[1], ids[3]]);
        assert!(!p.has_failed);
    }

    #[test]
    fn hide_action_inverts() {
        let host = FakeHost::categories(&["a", "b", "a"]);
        let (store, ids) = setup(&host);
        let cmd = FilterCommand::parse(".a").hiding();
        let p = partition(&host, &store, &ids, &cmd, ".mix", &[]);
        assert_eq!(p.show, [ids[1]]);
    }

    #[test]
    fn no_match_fails_unless_none() {
        let host = FakeHost::categories(&["a", "b"]);
        let (store, ids) = setup(&host);
        let p = partition(&host, &store, &ids, &FilterCommand::parse(".c"), ".mix", &[]);
        assert!(p.show.is_empty());
        assert!(p.has_failed);
        let p = partition(&host, &store, &ids, &FilterCommand::none(), ".mix", &[]);
        assert!(p.show.is_empty());
        assert!(!p.has_failed);
    }

    #[test]
    fn removed_targets_move_to_hide() {
        let host = FakeHost::categories(&["a", "a", "a"]);
        let (store, ids) = setup(&host);
        let p = partition(&host, &store, &ids, &FilterCommand::all(), ".mix", &[ids[1]]);
        assert_eq!(p.matching, ids);
        assert_eq!(p.show, [ids[0], ids[2]]);
        assert_eq!(p.hide, [ids[1]]);
        assert_eq!(p.to_hide, [ids[1]]);
    }

    #[test]
    fn collection_and_element_predicates() {
        let host = FakeHost::categories(&["a", "b", "c"]);
        let (store, ids) = setup(&host);
        let els = host.children();
        let p = partition(
            &host,
            &store,
            &ids,
            &FilterCommand::collection(vec![els[2], els[0]]),
            ".mix",
            &[],
        );
        assert_eq!(p.show, [ids[0], ids[2]]);
        let p = partition(&host, &store, &ids, &FilterCommand::element(els[1]), ".mix", &[]);
        assert_eq!(p.show, [ids[1]]);
    }
}
