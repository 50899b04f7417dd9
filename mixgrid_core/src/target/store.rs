// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot storage for targets with generational handles.

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use super::Target;
use super::id::TargetId;

/// Owns every [`Target`] of one mixer.
///
/// Targets are addressed by [`TargetId`] handles. Removed targets free their
/// slot for reuse, and generation counters prevent stale handle access.
/// Ordering lives outside the store, in plain `Vec<TargetId>` lists.
#[derive(Debug)]
pub struct TargetStore<E> {
    slots: Vec<Option<Target<E>>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
}

impl<E> Default for TargetStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TargetStore<E> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Stores a target and returns its handle.
    pub fn insert(&mut self, target: Target<E>) -> TargetId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.slots[idx as usize] = Some(target);
            idx
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "a container never holds u32::MAX targets"
            )]
            let idx = self.slots.len() as u32;
            self.slots.push(Some(target));
            self.generation.push(0);
            idx
        };
        TargetId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Removes a target, freeing its slot. Returns `None` for stale handles.
    pub fn remove(&mut self, id: TargetId) -> Option<Target<E>> {
        if !self.is_alive(id) {
            return None;
        }
        let target = self.slots[id.idx as usize].take();
        // Bump generation so old handles immediately fail validation.
        self.generation[id.idx as usize] += 1;
        self.free_list.push(id.idx);
        target
    }

    /// Returns whether the given handle refers to a live target.
    #[must_use]
    pub fn is_alive(&self, id: TargetId) -> bool {
        (id.idx as usize) < self.slots.len()
            && self.generation[id.idx as usize] == id.generation
            && self.slots[id.idx as usize].is_some()
    }

    /// Returns the target for a live handle.
    #[must_use]
    pub fn get(&self, id: TargetId) -> Option<&Target<E>> {
        if self.is_alive(id) {
            self.slots[id.idx as usize].as_ref()
        } else {
            None
        }
    }

    /// Returns the target for a live handle, mutably.
    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut Target<E>> {
        if self.is_alive(id) {
            self.slots[id.idx as usize].as_mut()
        } else {
            None
        }
    }

    /// Number of live targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether the store holds no targets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Handles of every live target, in slot order.
    pub fn ids(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.as_ref()?;
            #[expect(
                clippy::cast_possible_truncation,
                reason = "slot count fits in u32, see insert"
            )]
            let idx = idx as u32;
            Some(TargetId {
                idx,
                generation: self.generation[idx as usize],
            })
        })
    }

    /// Drops every target.
    pub fn clear(&mut self) {
        for idx in 0..self.slots.len() {
            if self.slots[idx].take().is_some() {
                self.generation[idx] += 1;
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "slot count fits in u32, see insert"
                )]
                self.free_list.push(idx as u32);
            }
        }
    }
}

impl<E: PartialEq> TargetStore<E> {
    /// Finds the handle among `ids` whose target wraps `el`.
    #[must_use]
    pub fn find(&self, ids: &[TargetId], el: &E) -> Option<TargetId> {
        ids.iter()
            .copied()
            .find(|id| self.get(*id).is_some_and(|t| t.element() == el))
    }

    /// Finds the live handle wrapping `el`, whether or not it is committed.
    #[must_use]
    pub fn find_any(&self, el: &E) -> Option<TargetId> {
        self.ids().find(|id| self[*id].element() == el)
    }
}

impl<E> Index<TargetId> for TargetStore<E> {
    type Output = Target<E>;

    /// # Panics
    ///
    /// Panics if the handle is stale.
    fn index(&self, id: TargetId) -> &Target<E> {
        match self.get(id) {
            Some(target) => target,
            None => panic!("stale TargetId: {id:?}"),
        }
    }
}

impl<E> IndexMut<TargetId> for TargetStore<E> {
    fn index_mut(&mut self, id: TargetId) -> &mut Target<E> {
        match self.get_mut(id) {
            Some(target) => target,
            None => panic!("stale TargetId: {id:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn insert_and_remove() {
        let mut store = TargetStore::new();
        let id = store.insert(Target::new(7_u32));
        assert!(store.is_alive(id));
        assert_eq!(*store[id].element(), 7);
        assert_eq!(store.remove(id).map(|t| *t.element()), Some(7));
        assert!(!store.is_alive(id));
        assert!(store.remove(id).is_none());
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut store = TargetStore::new();
        let id1 = store.insert(Target::new(1_u32));
        store.remove(id1);
        let id2 = store.insert(Target::new(2_u32));
        // id2 reuses the same slot but has a different generation.
        assert!(!store.is_alive(id1));
        assert!(store.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
        assert!(store.get(id1).is_none());
    }

    #[test]
    fn find_by_element() {
        let mut store = TargetStore::new();
        let ids = vec![
            store.insert(Target::new(10_u32)),
            store.insert(Target::new(20_u32)),
        ];
        assert_eq!(store.find(&ids, &20), Some(ids[1]));
        assert_eq!(store.find(&ids[..1], &20), None);
        assert_eq!(store.len(), 2);
        assert_eq!(store.find_any(&20), Some(ids[1]));
        store.remove(ids[1]);
        assert_eq!(store.find_any(&20), None);
        assert_eq!(store.ids().collect::<Vec<_>>(), [ids[0]]);
    }

    #[test]
    #[should_panic(expected = "stale TargetId")]
    fn stale_index_panics() {
        let mut store = TargetStore::new();
        let id = store.insert(Target::new(1_u32));
        store.clear();
        let _ = &store[id];
    }
}
