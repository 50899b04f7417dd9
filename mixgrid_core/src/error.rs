// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Usage errors.
//!
//! Only misuse surfaces as an error. Contention (a call arriving while the
//! queue is full) resolves with the current state instead, and a filter that
//! matches nothing is reported through [`State::has_failed`].
//!
//! [`State::has_failed`]: crate::state::State::has_failed

use alloc::string::String;

/// Errors returned synchronously by [`Mixer`](crate::mixer::Mixer) methods.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MixError {
    /// The host has no container element to mix.
    #[error("mixer requires a container element")]
    MissingContainer,
    /// An insert command carried no elements.
    #[error("insert requires at least one element")]
    EmptyInsert,
    /// An element passed to insert is already a target of this mixer.
    #[error("element {0} is already a target of this mixer")]
    AlreadyTarget(String),
    /// An explicit sort order named an element that is not a target.
    #[error("sort collection contains {0}, which is not a target of this mixer")]
    UnknownSortElement(String),
    /// An operation was built against a state that is no longer current.
    #[error("operation {operation} was built against state {built}, current state is {current}")]
    StaleOperation {
        /// The operation id.
        operation: u64,
        /// The state id the operation started from.
        built: u64,
        /// The mixer's current state id.
        current: u64,
    },
    /// The mixer has been destroyed.
    #[error("mixer has been destroyed")]
    Destroyed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_element() {
        let err = MixError::AlreadyTarget(String::from("#item-3"));
        assert_eq!(
            err.to_string(),
            "element #item-3 is already a target of this mixer"
        );
    }
}
