// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sort commands and ordering.
//!
//! A sort string is a space-separated chain of `key:direction` pairs, e.g.
//! `"published:desc name:asc"`. Keys name `data-*` attributes and are
//! camel-cased before lookup. Two keys are special and end the chain:
//! `default` (indexing order) and `random` (uniform shuffle).

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::error::MixError;
use crate::host::Host;
use crate::report::{Reporter, Warning};
use crate::target::{TargetId, TargetStore};

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
    /// Uniform shuffle.
    Random,
}

/// A parsed sort request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortCommand<E> {
    /// The chain this command was parsed from, starting at this key.
    pub sort_string: String,
    /// Camel-cased attribute key; empty for `default` and `random`.
    pub attribute: String,
    /// Direction.
    pub order: SortOrder,
    /// Explicit order, when sorting by a list of elements.
    pub collection: Option<Vec<E>>,
    /// Tie-breaker.
    pub next: Option<Box<Self>>,
}

impl<E> SortCommand<E> {
    /// Parses a sort string. Empty input yields `default:asc`.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        if tokens.is_empty() {
            return Self::default();
        }
        Self::parse_tokens(&tokens)
    }

    fn parse_tokens(tokens: &[&str]) -> Self {
        let (first, rest) = match tokens.split_first() {
            Some(split) => split,
            None => return Self::default(),
        };
        let (key, direction) = first.split_once(':').unwrap_or((first, "asc"));
        let order = match (key, direction) {
            ("random", _) => SortOrder::Random,
            (_, "desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        };
        let attribute = match key {
            "default" | "random" => String::new(),
            key => camel_case(key),
        };
        let next = if attribute.is_empty() || rest.is_empty() {
            None
        } else {
            Some(Box::new(Self::parse_tokens(rest)))
        };
        Self {
            sort_string: tokens.join(" "),
            attribute,
            order,
            collection: None,
            next,
        }
    }

    /// Sorts into the given explicit order.
    #[must_use]
    pub fn from_collection(collection: Vec<E>) -> Self {
        Self {
            sort_string: String::new(),
            attribute: String::new(),
            order: SortOrder::Asc,
            collection: Some(collection),
            next: None,
        }
    }

    /// Whether this is the `default` order (either direction).
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.attribute.is_empty() && self.order != SortOrder::Random && self.collection.is_none()
    }
}

impl<E> Default for SortCommand<E> {
    fn default() -> Self {
        Self {
            sort_string: String::from("default:asc"),
            attribute: String::new(),
            order: SortOrder::Asc,
            collection: None,
            next: None,
        }
    }
}

/// Whether moving from `current` to `new` can change the order.
#[must_use]
pub fn will_sort<E: PartialEq>(new: &SortCommand<E>, current: &SortCommand<E>) -> bool {
    new.attribute != current.attribute
        || new.order != current.order
        || new.order == SortOrder::Random
        || current.order == SortOrder::Random
        || new.collection.is_some()
        || current.collection.is_some()
        || new.next != current.next
}

/// Orders `current` according to `command`.
///
/// `default_order` is the indexing order used by `default`. Attribute sorts
/// cache each target's primary key value in its `sort_string`.
pub fn sort_targets<H: Host>(
    host: &mut H,
    store: &mut TargetStore<H::Element>,
    current: &[TargetId],
    default_order: &[TargetId],
    command: &SortCommand<H::Element>,
    reporter: &mut Reporter,
) -> Result<Vec<TargetId>, MixError> {
    if let Some(collection) = &command.collection {
        return sort_by_collection(host, store, current, collection);
    }

    match command.order {
        SortOrder::Random => {
            let mut order = current.to_vec();
            shuffle(host, &mut order);
            Ok(order)
        }
        _ if command.attribute.is_empty() => {
            let mut order: Vec<TargetId> = default_order
                .iter()
                .copied()
                .filter(|id| current.contains(id))
                .collect();
            if command.order == SortOrder::Desc {
                order.reverse();
            }
            Ok(order)
        }
        _ => Ok(sort_by_attributes(host, store, current, command, reporter)),
    }
}

fn sort_by_collection<H: Host>(
    host: &H,
    store: &TargetStore<H::Element>,
    current: &[TargetId],
    collection: &[H::Element],
) -> Result<Vec<TargetId>, MixError> {
    let mut order = Vec::with_capacity(current.len());
    for el in collection {
        let id = store
            .find(current, el)
            .ok_or_else(|| MixError::UnknownSortElement(host.describe(el)))?;
        if !order.contains(&id) {
            order.push(id);
        }
    }
    for &id in current {
        if !order.contains(&id) {
            order.push(id);
        }
    }
    Ok(order)
}

/// Fisher–Yates shuffle driven by [`Host::random`].
fn shuffle<H: Host>(host: &mut H, order: &mut [TargetId]) {
    for i in (1..order.len()).rev() {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "the product is in [0, i + 1)"
        )]
        let j = ((host.random() * (i + 1) as f64) as usize).min(i);
        order.swap(i, j);
    }
}

fn sort_by_attributes<H: Host>(
    host: &H,
    store: &mut TargetStore<H::Element>,
    current: &[TargetId],
    command: &SortCommand<H::Element>,
    reporter: &mut Reporter,
) -> Vec<TargetId> {
    let mut chain = Vec::new();
    let mut link = Some(command);
    while let Some(cmd) = link {
        if cmd.attribute.is_empty() {
            break;
        }
        chain.push(cmd);
        link = cmd.next.as_deref();
    }

    let mut keyed: Vec<(TargetId, Vec<String>)> = Vec::with_capacity(current.len());
    for &id in current {
        let el = store[id].element().clone();
        let values: Vec<String> = chain
            .iter()
            .map(|cmd| {
                host.data_attribute(&el, &cmd.attribute)
                    .unwrap_or_else(|| {
                        reporter.warn(
                            &Warning::MissingSortAttribute {
                                attribute: cmd.attribute.clone(),
                                element: host.describe(&el),
                            },
                            host.now(),
                        );
                        String::from("0")
                    })
            })
            .collect();
        if let Some(primary) = values.first() {
            store[id].sort_string.clone_from(primary);
        }
        keyed.push((id, values));
    }

    keyed.sort_by(|(_, a), (_, b)| {
        for (level, cmd) in chain.iter().enumerate() {
            let ord = compare_values(&a[level], &b[level]);
            let ord = if cmd.order == SortOrder::Desc {
                ord.reverse()
            } else {
                ord
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });

    keyed.into_iter().map(|(id, _)| id).collect()
}

/// Numeric comparison when both values are numbers in full, otherwise a
/// case-insensitive string comparison.
#[must_use]
pub fn compare_values(a: &str, b: &str) -> Ordering {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

/// Reads a whole value as a number. Blank values count as zero.
fn as_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Some(0.0);
    }
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Converts a dashed key to a dataset key: `published-date` → `publishedDate`.
#[must_use]
pub fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for ch in key.chars() {
        if ch == '-' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::config::DebugConfig;
    use crate::mock::FakeHost;
    use crate::target::Target;

    fn setup(host: &FakeHost) -> (TargetStore<usize>, Vec<TargetId>) {
        let mut store = TargetStore::new();
        let ids = host
            .children()
            .into_iter()
            .map(|el| store.insert(Target::new(el)))
            .collect();
        (store, ids)
    }

    #[test]
    fn parses_chains() {
        let cmd = SortCommand::<usize>::parse("published-date:desc name");
        assert_eq!(cmd.attribute, "publishedDate");
        assert_eq!(cmd.order, SortOrder::Desc);
        assert_eq!(cmd.sort_string, "published-date:desc name");
        let next = cmd.next.as_deref().map(|n| (n.attribute.as_str(), n.order));
        assert_eq!(next, Some(("name", SortOrder::Asc)));

        let cmd = SortCommand::<usize>::parse("random name:asc");
        assert_eq!(cmd.order, SortOrder::Random);
        assert!(cmd.next.is_none());
        assert!(SortCommand::<usize>::parse("").is_default());
    }

    #[test]
    fn will_sort_detects_changes() {
        let a = SortCommand::<usize>::parse("default:asc");
        assert!(!will_sort(&a, &SortCommand::default()));
        assert!(will_sort(&SortCommand::parse("default:desc"), &a));
        assert!(will_sort(
            &SortCommand::<usize>::parse("random"),
            &SortCommand::parse("random")
        ));
        assert!(will_sort(
            &SortCommand::<usize>::parse("a:asc b:asc"),
            &SortCommand::parse("a:asc")
        ));
        assert!(will_sort(&SortCommand::from_collection(vec![1]), &a));
    }

    #[test]
    fn multi_key_sort_cascades() {
        let mut host = FakeHost::with_data(&[
            &[("published", "2"), ("name", "delta")],
            &[("published", "10"), ("name", "bravo")],
            &[("published", "2"), ("name", "Alpha")],
            &[("published", "10"), ("name", "charlie")],
        ]);
        let (mut store, ids) = setup(&host);
        let mut reporter = Reporter::new(DebugConfig::default());
        let cmd = SortCommand::parse("published:desc name:asc");
        let order =
            sort_targets(&mut host, &mut store, &ids, &ids, &cmd, &mut reporter).unwrap();
        assert_eq!(order, [ids[1], ids[3], ids[2], ids[0]]);
        assert_eq!(store[ids[1]].sort_string, "10");
    }

    #[test]
    fn missing_attribute_sorts_as_zero() {
        let mut host = FakeHost::with_data(&[&[("rank", "5")], &[], &[("rank", "-1")]]);
        let (mut store, ids) = setup(&host);
        let mut reporter = Reporter::new(DebugConfig::default());
        let order = sort_targets(
            &mut host,
            &mut store,
            &ids,
            &ids,
            &SortCommand::parse("rank"),
            &mut reporter,
        )
        .unwrap();
        assert_eq!(order, [ids[2], ids[1], ids[0]]);
    }

    #[test]
    fn default_order_and_reverse() {
        let mut host = FakeHost::grid(4, 10.0, 2);
        let (mut store, ids) = setup(&host);
        let mut reporter = Reporter::new(DebugConfig::default());
        let shuffled = [ids[2], ids[0], ids[3], ids[1]];
        let asc = sort_targets(
            &mut host,
            &mut store,
            &shuffled,
            &ids,
            &SortCommand::parse("default:asc"),
            &mut reporter,
        )
        .unwrap();
        assert_eq!(asc, ids);
        let desc = sort_targets(
            &mut host,
            &mut store,
            &shuffled,
            &ids,
            &SortCommand::parse("default:desc"),
            &mut reporter,
        )
        .unwrap();
        assert_eq!(desc, [ids[3], ids[2], ids[1], ids[0]]);
    }

    #[test]
    fn collection_lists_first_and_rejects_strangers() {
        let mut host = FakeHost::grid(3, 10.0, 3);
        let (mut store, ids) = setup(&host);
        let mut reporter = Reporter::new(DebugConfig::default());
        let els = host.children();
        let cmd = SortCommand::from_collection(vec![els[2]]);
        let order =
            sort_targets(&mut host, &mut store, &ids, &ids, &cmd, &mut reporter).unwrap();
        assert_eq!(order, [ids[2], ids[0], ids[1]]);

        let cmd = SortCommand::from_collection(vec![99]);
        let err = sort_targets(&mut host, &mut store, &ids, &ids, &cmd, &mut reporter);
        assert!(matches!(err, Err(MixError::UnknownSortElement(_))));
    }

    #[test]
    fn random_is_a_permutation() {
        let mut host = FakeHost::grid(10, 10.0, 5);
        let (mut store, ids) = setup(&host);
        let mut reporter = Reporter::new(DebugConfig::default());
        let order = sort_targets(
            &mut host,
            &mut store,
            &ids,
            &ids,
            &SortCommand::parse("random"),
            &mut reporter,
        )
        .unwrap();
        assert_ne!(order, ids);
        let mut sorted = order.clone();
        sorted.sort_by_key(|id| id.index());
        assert_eq!(sorted, ids);
    }

    #[test]
    fn value_comparison() {
        assert_eq!(compare_values("10", "9"), Ordering::Greater);
        assert_eq!(compare_values("b", "A"), Ordering::Greater);
        assert_eq!(compare_values(" 2 ", "2"), Ordering::Equal);
        assert_eq!(compare_values("-1.5", ""), Ordering::Less);
    }

    #[test]
    fn partly_numeric_values_compare_as_text() {
        assert_eq!(compare_values("10a", "9b"), Ordering::Less);
        assert_eq!(compare_values("2px", "2"), Ordering::Greater);
        assert_eq!(compare_values("inf", "5"), Ordering::Greater);
    }
}
