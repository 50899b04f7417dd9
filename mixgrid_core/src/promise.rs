// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caller-facing completion handles.
//!
//! Every mixing call returns a [`MixPromise`] that resolves with the state
//! the call produced. The mixer keeps the matching [`Deferred`] until the
//! operation commits. Any executor can poll the promise; synchronous callers
//! use [`MixPromise::try_take`].

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures_channel::oneshot;

/// The mixer dropped the [`Deferred`] without resolving it, e.g. because a
/// queued call was discarded by
/// [`Mixer::destroy`](crate::mixer::Mixer::destroy).
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("operation was dropped before it completed")]
pub struct Cancelled;

/// The resolving half.
#[derive(Debug)]
pub struct Deferred<T> {
    tx: oneshot::Sender<T>,
}

/// The awaiting half.
#[derive(Debug)]
#[must_use = "a promise does nothing unless polled or taken"]
pub struct MixPromise<T> {
    rx: oneshot::Receiver<T>,
}

/// Creates a connected pair.
pub fn deferred<T>() -> (Deferred<T>, MixPromise<T>) {
    let (tx, rx) = oneshot::channel();
    (Deferred { tx }, MixPromise { rx })
}

impl<T> Deferred<T> {
    /// Resolves the promise. A dropped promise is ignored.
    pub fn resolve(self, value: T) {
        _ = self.tx.send(value);
    }

    /// Whether the promise side has been dropped.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.tx.is_canceled()
    }
}

impl<T> MixPromise<T> {
    /// A promise that is already resolved.
    pub fn resolved(value: T) -> Self {
        let (tx, promise) = deferred();
        tx.resolve(value);
        promise
    }

    /// Takes the value without blocking. Returns `None` while pending.
    pub fn try_take(&mut self) -> Option<Result<T, Cancelled>> {
        match self.rx.try_recv() {
            Ok(Some(value)) => Some(Ok(value)),
            Ok(None) => None,
            Err(oneshot::Canceled) => Some(Err(Cancelled)),
        }
    }
}

impl<T> Future for MixPromise<T> {
    type Output = Result<T, Cancelled>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map_err(|_| Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_once() {
        let (tx, mut promise) = deferred();
        assert_eq!(promise.try_take(), None);
        tx.resolve(5);
        assert_eq!(promise.try_take(), Some(Ok(5)));
    }

    #[test]
    fn dropped_deferred_cancels() {
        let (tx, promise) = deferred::<u8>();
        drop(tx);
        assert_eq!(futures::executor::block_on(promise), Err(Cancelled));
    }

    #[test]
    fn resolved_promise_is_ready() {
        let promise = MixPromise::resolved("done");
        assert_eq!(futures::executor::block_on(promise), Ok("done"));
    }
}
