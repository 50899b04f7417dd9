// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extension points.
//!
//! Hooks are registered per `(Extension, Phase)` and run in registration order.
//! `Before` hooks of a public operation see the command it is about to build
//! and may rewrite it; `After` hooks see the state it committed. Lifecycle
//! extensions (`MixStart`, `MixEnd`, `MixFail`, `MixBusy`) only have a
//! `Before` phase in practice and are invoked by the execution engine.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use crate::command::MultimixCommand;
use crate::operation::Operation;
use crate::state::State;

/// A hookable operation or lifecycle event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Extension {
    /// [`Mixer::filter`](crate::mixer::Mixer::filter).
    Filter,
    /// [`Mixer::sort`](crate::mixer::Mixer::sort).
    Sort,
    /// [`Mixer::multimix`](crate::mixer::Mixer::multimix).
    Multimix,
    /// The insert family.
    Insert,
    /// [`Mixer::remove`](crate::mixer::Mixer::remove).
    Remove,
    /// [`Mixer::change_layout`](crate::mixer::Mixer::change_layout).
    ChangeLayout,
    /// [`Mixer::toggle_on`](crate::mixer::Mixer::toggle_on) and
    /// [`Mixer::toggle_off`](crate::mixer::Mixer::toggle_off).
    Toggle,
    /// [`Mixer::get_operation`](crate::mixer::Mixer::get_operation).
    GetOperation,
    /// [`Mixer::tween`](crate::mixer::Mixer::tween).
    Tween,
    /// [`Mixer::destroy`](crate::mixer::Mixer::destroy).
    Destroy,
    /// An operation starts executing.
    MixStart,
    /// An operation committed.
    MixEnd,
    /// An operation committed with a filter that matched nothing.
    MixFail,
    /// A call was rejected.
    MixBusy,
}

/// When a hook runs relative to its extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Before the work; payloads are mutable.
    Before,
    /// After the work.
    After,
}

/// What a hook receives.
#[derive(Debug)]
pub enum HookPayload<'a, E> {
    /// The command about to be built.
    Command(&'a mut MultimixCommand<E>),
    /// A built operation.
    Operation(&'a Operation<E>),
    /// A committed (or, for `MixBusy`, current) state.
    State(&'a State<E>),
    /// The interpolation factor of a tween.
    Factor(&'a mut f64),
    /// No data.
    Empty,
}

/// A registered hook.
pub type Hook<E> = Box<dyn FnMut(&mut HookPayload<'_, E>)>;

/// Ordered hook lists keyed by `(Extension, Phase)`.
pub struct HookRegistry<E> {
    hooks: BTreeMap<(Extension, Phase), Vec<Hook<E>>>,
}

impl<E> fmt::Debug for HookRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (key, list) in &self.hooks {
            map.entry(key, &list.len());
        }
        map.finish()
    }
}

impl<E> Default for HookRegistry<E> {
    fn default() -> Self {
        Self {
            hooks: BTreeMap::new(),
        }
    }
}

impl<E> HookRegistry<E> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a hook.
    pub fn on(
        &mut self,
        extension: Extension,
        phase: Phase,
        hook: impl FnMut(&mut HookPayload<'_, E>) + 'static,
    ) {
        self.hooks
            .entry((extension, phase))
            .or_default()
            .push(Box::new(hook));
    }

    /// Removes every hook of one key, returning how many were removed.
    pub fn off(&mut self, extension: Extension, phase: Phase) -> usize {
        self.hooks.remove(&(extension, phase)).map_or(0, |l| l.len())
    }

    /// Number of hooks registered for a key.
    #[must_use]
    pub fn count(&self, extension: Extension, phase: Phase) -> usize {
        self.hooks.get(&(extension, phase)).map_or(0, Vec::len)
    }

    /// Runs the hooks of a key in registration order.
    pub fn run(&mut self, extension: Extension, phase: Phase, payload: &mut HookPayload<'_, E>) {
        if let Some(list) = self.hooks.get_mut(&(extension, phase)) {
            for hook in list.iter_mut() {
                hook(payload);
            }
        }
    }

    /// Runs `Before` hooks over a command.
    pub(crate) fn before_command(&mut self, extension: Extension, command: &mut MultimixCommand<E>) {
        self.run(extension, Phase::Before, &mut HookPayload::Command(command));
    }

    /// Runs hooks over a state.
    pub(crate) fn with_state(&mut self, extension: Extension, phase: Phase, state: &State<E>) {
        self.run(extension, phase, &mut HookPayload::State(state));
    }

    /// Drops every hook.
    pub fn clear(&mut self) {
        self.hooks.clear();
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::RefCell;

    use super::*;
    use crate::filter::FilterCommand;

    #[test]
    fn hooks_run_in_order_and_rewrite_commands() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut hooks = HookRegistry::<usize>::new();
        let l = log.clone();
        hooks.on(Extension::Filter, Phase::Before, move |p| {
            l.borrow_mut().push(1);
            if let HookPayload::Command(cmd) = p {
                cmd.filter = Some(FilterCommand::parse(".b"));
            }
        });
        let l = log.clone();
        hooks.on(Extension::Filter, Phase::Before, move |_| l.borrow_mut().push(2));
        hooks.on(Extension::Sort, Phase::Before, |_| unreachable!());

        let mut cmd = MultimixCommand::new().filter(FilterCommand::parse(".a"));
        hooks.before_command(Extension::Filter, &mut cmd);
        assert_eq!(*log.borrow(), [1, 2]);
        assert_eq!(cmd.filter, Some(FilterCommand::parse(".b")));
        assert_eq!(hooks.count(Extension::Filter, Phase::Before), 2);
        assert_eq!(hooks.count(Extension::Filter, Phase::After), 0);
    }

    #[test]
    fn off_removes_one_key() {
        let mut hooks = HookRegistry::<usize>::new();
        hooks.on(Extension::MixEnd, Phase::Before, |_| {});
        hooks.on(Extension::MixEnd, Phase::Before, |_| {});
        hooks.on(Extension::MixFail, Phase::Before, |_| {});
        assert_eq!(hooks.off(Extension::MixEnd, Phase::Before), 2);
        assert_eq!(hooks.count(Extension::MixFail, Phase::Before), 1);
    }

    #[test]
    fn tween_factor_is_adjustable() {
        let mut hooks = HookRegistry::<usize>::new();
        hooks.on(Extension::Tween, Phase::Before, |p| {
            if let HookPayload::Factor(f) = p {
                **f *= 0.5;
            }
        });
        let mut factor = 0.8;
        hooks.run(Extension::Tween, Phase::Before, &mut HookPayload::Factor(&mut factor));
        assert_eq!(factor, 0.4);
    }
}
