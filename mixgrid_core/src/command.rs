// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Commands accepted by [`Mixer::multimix`](crate::mixer::Mixer::multimix).

use alloc::string::String;
use alloc::vec::Vec;

use crate::filter::FilterCommand;
use crate::sort::SortCommand;

/// Where inserted elements go relative to a sibling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InsertPosition {
    /// Before the reference.
    #[default]
    Before,
    /// After the reference.
    After,
}

/// Insertion of new elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertCommand<E> {
    /// Index into the target list; ignored when `sibling` is set.
    pub index: usize,
    /// Elements to insert, in order.
    pub collection: Vec<E>,
    /// Placement relative to the reference.
    pub position: InsertPosition,
    /// Explicit reference element.
    pub sibling: Option<E>,
}

impl<E> InsertCommand<E> {
    /// Inserts `collection` at `index`.
    #[must_use]
    pub fn at(index: usize, collection: Vec<E>) -> Self {
        Self {
            index,
            collection,
            position: InsertPosition::Before,
            sibling: None,
        }
    }

    /// Inserts `collection` next to `sibling`.
    #[must_use]
    pub fn next_to(sibling: E, collection: Vec<E>, position: InsertPosition) -> Self {
        Self {
            index: 0,
            collection,
            position,
            sibling: Some(sibling),
        }
    }
}

/// Targets to remove.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Removal<E> {
    /// Every target matching a selector.
    Selector(String),
    /// One element.
    Element(E),
    /// A set of elements.
    Collection(Vec<E>),
    /// The target at an index of the current order.
    Index(usize),
    /// The targets at several indices of the current order.
    Indices(Vec<usize>),
}

/// A container class change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeLayoutCommand {
    /// Class to apply; an empty string removes the current one.
    pub container_class_name: String,
}

/// Every change one operation can carry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultimixCommand<E> {
    /// New filter.
    pub filter: Option<FilterCommand<E>>,
    /// New sort.
    pub sort: Option<SortCommand<E>>,
    /// Elements to insert.
    pub insert: Option<InsertCommand<E>>,
    /// Targets to remove.
    pub remove: Option<Removal<E>>,
    /// Container class change.
    pub change_layout: Option<ChangeLayoutCommand>,
}

impl<E> Default for MultimixCommand<E> {
    fn default() -> Self {
        Self {
            filter: None,
            sort: None,
            insert: None,
            remove: None,
            change_layout: None,
        }
    }
}

impl<E> MultimixCommand<E> {
    /// An empty command.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the filter.
    #[must_use]
    pub fn filter(mut self, filter: FilterCommand<E>) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the sort.
    #[must_use]
    pub fn sort(mut self, sort: SortCommand<E>) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sets the insertion.
    #[must_use]
    pub fn insert(mut self, insert: InsertCommand<E>) -> Self {
        self.insert = Some(insert);
        self
    }

    /// Sets the removal.
    #[must_use]
    pub fn remove(mut self, remove: Removal<E>) -> Self {
        self.remove = Some(remove);
        self
    }

    /// Sets the container class.
    #[must_use]
    pub fn change_layout(mut self, class: impl Into<String>) -> Self {
        self.change_layout = Some(ChangeLayoutCommand {
            container_class_name: class.into(),
        });
        self
    }
}
