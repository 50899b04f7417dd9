// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bounded FIFO of calls made while mixing.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use core::fmt;

use crate::command::MultimixCommand;
use crate::hooks::Extension;
use crate::promise::Deferred;
use crate::state::State;

/// Invoked with the committed state when an operation finishes.
pub type Callback<E> = Box<dyn FnOnce(&State<E>)>;

/// One deferred call with all of its original arguments.
pub struct QueueEntry<E> {
    /// The command to build once dequeued.
    pub command: MultimixCommand<E>,
    /// Whether to animate.
    pub animate: bool,
    /// Completion callback.
    pub callback: Option<Callback<E>>,
    /// Resolves the promise handed to the caller.
    pub deferred: Deferred<State<E>>,
    /// Trigger element at queueing time.
    pub trigger_element: Option<E>,
    /// The public operation the call came through.
    pub origin: Extension,
}

impl<E: fmt::Debug> fmt::Debug for QueueEntry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueEntry")
            .field("command", &self.command)
            .field("animate", &self.animate)
            .field("has_callback", &self.callback.is_some())
            .field("trigger_element", &self.trigger_element)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Bounded FIFO of [`QueueEntry`] values.
pub struct MixQueue<E> {
    entries: VecDeque<QueueEntry<E>>,
    limit: usize,
}

impl<E> fmt::Debug for MixQueue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MixQueue")
            .field("len", &self.entries.len())
            .field("limit", &self.limit)
            .finish()
    }
}

impl<E> MixQueue<E> {
    /// Creates a queue holding at most `limit` entries.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    /// Appends an entry, or hands it back when the queue is full.
    pub fn push(&mut self, entry: QueueEntry<E>) -> Result<(), QueueEntry<E>> {
        if self.is_full() {
            return Err(entry);
        }
        self.entries.push_back(entry);
        Ok(())
    }

    /// Removes the oldest entry.
    pub fn pop(&mut self) -> Option<QueueEntry<E>> {
        self.entries.pop_front()
    }

    /// Whether no further entry fits.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.limit
    }

    /// Number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capacity.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Drops every entry. Their promises resolve as cancelled.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promise::{MixPromise, deferred};

    fn entry(animate: bool) -> (QueueEntry<usize>, MixPromise<State<usize>>) {
        let (deferred, promise) = deferred();
        let entry = QueueEntry {
            command: MultimixCommand::new(),
            animate,
            callback: None,
            deferred,
            trigger_element: None,
            origin: Extension::Multimix,
        };
        (entry, promise)
    }

    #[test]
    fn fifo_within_limit() {
        let mut queue = MixQueue::new(2);
        assert!(queue.push(entry(true).0).is_ok());
        assert!(queue.push(entry(false).0).is_ok());
        assert!(queue.is_full());
        assert!(queue.push(entry(true).0).is_err());
        assert_eq!(queue.pop().map(|e| e.animate), Some(true));
        assert_eq!(queue.pop().map(|e| e.animate), Some(false));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn zero_limit_rejects_everything() {
        let mut queue = MixQueue::<usize>::new(0);
        assert!(queue.push(entry(true).0).is_err());
    }

    #[test]
    fn clear_cancels_promises() {
        let mut queue = MixQueue::new(1);
        let (e, mut promise) = entry(true);
        queue.push(e).unwrap();
        queue.clear();
        assert!(matches!(promise.try_take(), Some(Err(_))));
    }
}
