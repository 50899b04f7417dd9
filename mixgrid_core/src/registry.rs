// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordination between mixers that share a page.
//!
//! Whoever creates the mixers owns one [`Registry`] and hands the same
//! [`SharedRegistry`] to each of them. Mixers register on creation and
//! release on [`destroy`](crate::mixer::Mixer::destroy).

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

/// Registry shared by reference between mixers.
pub type SharedRegistry = Rc<RefCell<Registry>>;

/// Identifies one registered mixer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

/// Live mixers and how many are bound to each target selector.
#[derive(Debug, Default)]
pub struct Registry {
    next_id: u64,
    instances: Vec<(InstanceId, String)>,
    bound: BTreeMap<String, usize>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry ready to share.
    #[must_use]
    pub fn shared() -> SharedRegistry {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Registers a mixer bound to `selector`.
    pub fn register(&mut self, selector: &str) -> InstanceId {
        let id = InstanceId(self.next_id);
        self.next_id += 1;
        self.instances.push((id, String::from(selector)));
        *self.bound.entry(String::from(selector)).or_insert(0) += 1;
        id
    }

    /// Releases a mixer. Returns `false` if it was not registered.
    pub fn release(&mut self, id: InstanceId) -> bool {
        let Some(i) = self.instances.iter().position(|(other, _)| *other == id) else {
            return false;
        };
        let (_, selector) = self.instances.swap_remove(i);
        if let Some(count) = self.bound.get_mut(&selector) {
            *count -= 1;
            if *count == 0 {
                self.bound.remove(&selector);
            }
        }
        true
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn is_registered(&self, id: InstanceId) -> bool {
        self.instances.iter().any(|(other, _)| *other == id)
    }

    /// Number of live mixers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no mixer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Number of live mixers bound to `selector`.
    #[must_use]
    pub fn bound_count(&self, selector: &str) -> usize {
        self.bound.get(selector).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_follow_registration() {
        let shared = Registry::shared();
        let a = shared.borrow_mut().register(".mix");
        let b = shared.borrow_mut().register(".mix");
        let c = shared.borrow_mut().register(".card");
        assert_ne!(a, b);
        assert_eq!(shared.borrow().bound_count(".mix"), 2);
        assert!(shared.borrow_mut().release(a));
        assert!(!shared.borrow_mut().release(a));
        assert_eq!(shared.borrow().bound_count(".mix"), 1);
        assert!(shared.borrow_mut().release(c));
        assert_eq!(shared.borrow().bound_count(".card"), 0);
        assert!(shared.borrow().is_registered(b));
        assert_eq!(shared.borrow().len(), 1);
    }
}
