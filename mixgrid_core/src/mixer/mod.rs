// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The mixer: public operations, queueing and lifecycle.
//!
//! A [`Mixer`] owns one container's targets through its [`Host`]. Every
//! mixing call builds an [`Operation`], then either commits it synchronously
//! or animates it across one requested frame and the targets'
//! transition-completion notifications. Calls made while animating are
//! queued up to the configured limit; beyond it they resolve immediately
//! with the current state.
//!
//! ```rust,ignore
//! let mut mixer = Mixer::new(host, MixerConfig::default(), caps)?;
//! let promise = mixer.filter(FilterCommand::parse(".category-a"), true)?;
//! // host: requestAnimationFrame → mixer.advance_frame()
//! // host: transitionend        → mixer.handle_transition_end(&el, prop)
//! let state = promise.await?;
//! ```

mod build;
mod execute;

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::command::{InsertCommand, InsertPosition, MultimixCommand, Removal};
use crate::config::MixerConfig;
use crate::effects::Effects;
use crate::error::MixError;
use crate::filter::FilterCommand;
use crate::hooks::{Extension, HookPayload, HookRegistry, Phase};
use crate::host::{Capabilities, Host, MixEvent};
use crate::operation::Operation;
use crate::progress::TransitionJoin;
use crate::promise::{Deferred, MixPromise, deferred};
use crate::queue::{Callback, MixQueue, QueueEntry};
use crate::registry::{InstanceId, Registry, SharedRegistry};
use crate::report::{BusyEvent, QueuedEvent, ReportSink, Reporter, Warning};
use crate::sort::SortCommand;
use crate::state::State;
use crate::target::{Motion, MotionContext, Target, TargetId, TargetStore};

/// The operation currently animating.
struct ActiveMix<E> {
    operation: Operation<E>,
    motions: Vec<(TargetId, Motion)>,
    join: TransitionJoin,
    awaiting_frame: bool,
    animated: bool,
    callback: Option<Callback<E>>,
    deferred: Option<Deferred<State<E>>>,
    origin: Extension,
}

/// Filters, sorts, inserts and removes the targets of one container.
pub struct Mixer<H: Host> {
    host: H,
    config: MixerConfig,
    effects: Effects,
    capabilities: Rc<Capabilities>,
    registry: SharedRegistry,
    instance: InstanceId,
    store: TargetStore<H::Element>,
    /// Committed order.
    targets: Vec<TargetId>,
    /// Indexing order, used by `default` sorts.
    orig_order: Vec<TargetId>,
    state: State<H::Element>,
    next_state_id: u64,
    next_operation_id: u64,
    toggles: Vec<String>,
    trigger_element: Option<H::Element>,
    hooks: HookRegistry<H::Element>,
    reporter: Reporter,
    queue: MixQueue<H::Element>,
    active: Option<ActiveMix<H::Element>>,
    destroyed: bool,
}

impl<H: Host> fmt::Debug for Mixer<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mixer")
            .field("instance", &self.instance)
            .field("state", &self.state.id)
            .field("targets", &self.targets.len())
            .field("mixing", &self.active.is_some())
            .field("queue", &self.queue)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl<H: Host> Mixer<H> {
    /// Indexes the container's targets and applies the load filter and sort
    /// without animation.
    pub fn new(
        host: H,
        config: MixerConfig,
        capabilities: Rc<Capabilities>,
    ) -> Result<Self, MixError> {
        Self::with_registry(host, config, capabilities, Registry::shared())
    }

    /// Like [`new`](Self::new), registering with a shared registry.
    pub fn with_registry(
        mut host: H,
        config: MixerConfig,
        capabilities: Rc<Capabilities>,
        registry: SharedRegistry,
    ) -> Result<Self, MixError> {
        if !host.has_container() {
            return Err(MixError::MissingContainer);
        }
        let instance = registry.borrow_mut().register(&config.selectors.target);
        if !config.layout.container_class_name.is_empty() {
            host.add_container_class(&config.layout.container_class_name);
        }

        let mut state = State::empty();
        state
            .active_container_class
            .clone_from(&config.layout.container_class_name);

        let mut mixer = Self {
            host,
            effects: Effects::from_config(&config.animation),
            queue: MixQueue::new(config.animation.effective_queue_limit()),
            reporter: Reporter::new(config.debug),
            config,
            capabilities,
            registry,
            instance,
            store: TargetStore::new(),
            targets: Vec::new(),
            orig_order: Vec::new(),
            state,
            next_state_id: 0,
            next_operation_id: 0,
            toggles: Vec::new(),
            trigger_element: None,
            hooks: HookRegistry::new(),
            active: None,
            destroyed: false,
        };

        mixer.index_targets();
        let command = MultimixCommand::new()
            .filter(FilterCommand::parse(&mixer.config.load.filter))
            .sort(SortCommand::parse(&mixer.config.load.sort));
        mixer.settle(command)?;
        tracing::debug!(
            targets = mixer.targets.len(),
            shown = mixer.state.total_show,
            "mixer ready"
        );
        Ok(mixer)
    }

    // -- mixing --

    /// Applies a filter.
    pub fn filter(
        &mut self,
        filter: FilterCommand<H::Element>,
        animate: bool,
    ) -> Result<MixPromise<State<H::Element>>, MixError> {
        self.mix(
            Extension::Filter,
            MultimixCommand::new().filter(filter),
            animate,
            None,
        )
    }

    /// Applies a sort.
    pub fn sort(
        &mut self,
        sort: SortCommand<H::Element>,
        animate: bool,
    ) -> Result<MixPromise<State<H::Element>>, MixError> {
        self.mix(
            Extension::Sort,
            MultimixCommand::new().sort(sort),
            animate,
            None,
        )
    }

    /// Replaces the container class.
    pub fn change_layout(
        &mut self,
        class: &str,
        animate: bool,
    ) -> Result<MixPromise<State<H::Element>>, MixError> {
        self.mix(
            Extension::ChangeLayout,
            MultimixCommand::new().change_layout(class),
            animate,
            None,
        )
    }

    /// Applies any combination of filter, sort, insert, remove and layout
    /// change as one operation. `callback` runs with the committed state.
    pub fn multimix(
        &mut self,
        command: MultimixCommand<H::Element>,
        animate: bool,
        callback: Option<Callback<H::Element>>,
    ) -> Result<MixPromise<State<H::Element>>, MixError> {
        self.mix(Extension::Multimix, command, animate, callback)
    }

    /// Inserts elements at an index of the target list.
    pub fn insert(
        &mut self,
        index: usize,
        elements: Vec<H::Element>,
        animate: bool,
    ) -> Result<MixPromise<State<H::Element>>, MixError> {
        self.mix_insert(InsertCommand::at(index, elements), animate)
    }

    /// Inserts elements before a reference element.
    pub fn insert_before(
        &mut self,
        reference: H::Element,
        elements: Vec<H::Element>,
        animate: bool,
    ) -> Result<MixPromise<State<H::Element>>, MixError> {
        self.mix_insert(
            InsertCommand::next_to(reference, elements, InsertPosition::Before),
            animate,
        )
    }

    /// Inserts elements after a reference element.
    pub fn insert_after(
        &mut self,
        reference: H::Element,
        elements: Vec<H::Element>,
        animate: bool,
    ) -> Result<MixPromise<State<H::Element>>, MixError> {
        self.mix_insert(
            InsertCommand::next_to(reference, elements, InsertPosition::After),
            animate,
        )
    }

    /// Inserts elements before every target.
    pub fn prepend(
        &mut self,
        elements: Vec<H::Element>,
        animate: bool,
    ) -> Result<MixPromise<State<H::Element>>, MixError> {
        self.insert(0, elements, animate)
    }

    /// Inserts elements after every target.
    pub fn append(
        &mut self,
        elements: Vec<H::Element>,
        animate: bool,
    ) -> Result<MixPromise<State<H::Element>>, MixError> {
        self.insert(usize::MAX, elements, animate)
    }

    fn mix_insert(
        &mut self,
        insert: InsertCommand<H::Element>,
        animate: bool,
    ) -> Result<MixPromise<State<H::Element>>, MixError> {
        self.mix(
            Extension::Insert,
            MultimixCommand::new().insert(insert),
            animate,
            None,
        )
    }

    /// Removes targets. Removal animates as a hide; elements are detached at
    /// commit.
    pub fn remove(
        &mut self,
        removal: Removal<H::Element>,
        animate: bool,
    ) -> Result<MixPromise<State<H::Element>>, MixError> {
        self.mix(
            Extension::Remove,
            MultimixCommand::new().remove(removal),
            animate,
            None,
        )
    }

    /// Adds a selector to the active toggles and filters by all of them.
    ///
    /// The toggle list only changes when the call runs or is queued.
    pub fn toggle_on(
        &mut self,
        selector: &str,
        animate: bool,
    ) -> Result<MixPromise<State<H::Element>>, MixError> {
        let previous = self.toggles.clone();
        if !self.toggles.iter().any(|s| s == selector) {
            self.toggles.push(String::from(selector));
        }
        self.apply_toggles(previous, animate)
    }

    /// Removes a selector from the active toggles. With no toggle left, the
    /// configured toggle default applies.
    pub fn toggle_off(
        &mut self,
        selector: &str,
        animate: bool,
    ) -> Result<MixPromise<State<H::Element>>, MixError> {
        let previous = self.toggles.clone();
        self.toggles.retain(|s| s != selector);
        self.apply_toggles(previous, animate)
    }

    fn apply_toggles(
        &mut self,
        previous: Vec<String>,
        animate: bool,
    ) -> Result<MixPromise<State<H::Element>>, MixError> {
        let filter = if self.toggles.is_empty() {
            FilterCommand::parse(&self.config.controls.toggle_default)
        } else {
            FilterCommand::parse(&self.toggles.join(", "))
        };
        let command = MultimixCommand::new().filter(filter);
        match self.mix_inner(Extension::Toggle, command, animate, None) {
            Ok((promise, true)) => Ok(promise),
            Ok((promise, false)) => {
                self.toggles = previous;
                Ok(promise)
            }
            Err(err) => {
                self.toggles = previous;
                Err(err)
            }
        }
    }

    /// Active toggle selectors.
    #[must_use]
    pub fn toggles(&self) -> &[String] {
        &self.toggles
    }

    fn mix(
        &mut self,
        origin: Extension,
        command: MultimixCommand<H::Element>,
        animate: bool,
        callback: Option<Callback<H::Element>>,
    ) -> Result<MixPromise<State<H::Element>>, MixError> {
        self.mix_inner(origin, command, animate, callback)
            .map(|(promise, _)| promise)
    }

    /// Runs, queues or rejects a call. The flag is `false` for rejections.
    fn mix_inner(
        &mut self,
        origin: Extension,
        mut command: MultimixCommand<H::Element>,
        animate: bool,
        callback: Option<Callback<H::Element>>,
    ) -> Result<(MixPromise<State<H::Element>>, bool), MixError> {
        self.ensure_alive()?;
        self.hooks.before_command(origin, &mut command);
        let trigger = self.trigger_element.take();

        let (deferred, promise) = deferred();
        if self.active.is_some() {
            let entry = QueueEntry {
                command,
                animate,
                callback,
                deferred,
                trigger_element: trigger,
                origin,
            };
            let accepted = self.enqueue(entry);
            return Ok((promise, accepted));
        }

        self.run(origin, command, animate, callback, Some(deferred), trigger)?;
        self.drain_queue();
        Ok((promise, true))
    }

    fn enqueue(&mut self, entry: QueueEntry<H::Element>) -> bool {
        let limit = self.queue.limit();
        match self.queue.push(entry) {
            Ok(()) => {
                self.reporter.queued(&QueuedEvent {
                    timestamp: self.host.now(),
                    queue_len: self.queue.len(),
                    limit,
                });
                true
            }
            Err(entry) => {
                self.reject_busy();
                entry.deferred.resolve(self.state.clone());
                false
            }
        }
    }

    /// Fires the busy warning and notifications once.
    fn reject_busy(&mut self) {
        let limit = self.queue.limit();
        let now = self.host.now();
        let warning = if limit == 0 {
            Warning::BusyWithoutQueue
        } else {
            Warning::QueueFull { limit }
        };
        self.reporter.warn(&warning, now);
        self.reporter.busy(&BusyEvent {
            timestamp: now,
            queue_len: self.queue.len(),
            limit,
        });
        self.hooks
            .with_state(Extension::MixBusy, Phase::Before, &self.state);
        self.host.dispatch(MixEvent::MixBusy, &self.state);
    }

    fn run(
        &mut self,
        origin: Extension,
        command: MultimixCommand<H::Element>,
        animate: bool,
        callback: Option<Callback<H::Element>>,
        deferred: Option<Deferred<State<H::Element>>>,
        trigger: Option<H::Element>,
    ) -> Result<(), MixError> {
        let operation = self.build_operation(command, trigger)?;
        self.execute(operation, animate, callback, deferred, origin);
        Ok(())
    }

    /// Runs queued calls until one animates or the queue is empty.
    fn drain_queue(&mut self) {
        while self.active.is_none() {
            let Some(entry) = self.queue.pop() else {
                break;
            };
            let QueueEntry {
                command,
                animate,
                callback,
                deferred,
                trigger_element,
                origin,
            } = entry;
            if let Err(err) = self.run(
                origin,
                command,
                animate,
                callback,
                Some(deferred),
                trigger_element,
            ) {
                tracing::error!(%err, "queued operation failed");
            }
        }
    }

    // -- operations --

    /// Builds the operation a command would run, without running it.
    ///
    /// Returns `Ok(None)` while mixing. The returned operation can be scrubbed
    /// with [`tween`](Self::tween) and finalized with
    /// [`run_operation`](Self::run_operation).
    pub fn get_operation(
        &mut self,
        mut command: MultimixCommand<H::Element>,
    ) -> Result<Option<Operation<H::Element>>, MixError> {
        self.ensure_alive()?;
        if self.active.is_some() {
            self.reporter
                .warn(&Warning::OperationWhileMixing, self.host.now());
            return Ok(None);
        }
        self.hooks
            .before_command(Extension::GetOperation, &mut command);
        let trigger = self.trigger_element.take();
        let operation = self.build_operation(command, trigger)?;
        self.hooks.run(
            Extension::GetOperation,
            Phase::After,
            &mut HookPayload::Operation(&operation),
        );
        Ok(Some(operation))
    }

    /// Executes an operation from [`get_operation`](Self::get_operation).
    ///
    /// Fails with [`MixError::StaleOperation`] when another operation has
    /// committed since it was built.
    pub fn run_operation(
        &mut self,
        operation: Operation<H::Element>,
        animate: bool,
    ) -> Result<MixPromise<State<H::Element>>, MixError> {
        self.ensure_alive()?;
        if operation.start_state.id != self.state.id {
            let err = MixError::StaleOperation {
                operation: operation.id,
                built: operation.start_state.id,
                current: self.state.id,
            };
            self.discard_operation(operation);
            return Err(err);
        }
        if self.active.is_some() {
            self.reject_busy();
            return Ok(MixPromise::resolved(self.state.clone()));
        }
        let (deferred, promise) = deferred();
        self.execute(
            operation,
            animate,
            None,
            Some(deferred),
            Extension::GetOperation,
        );
        self.drain_queue();
        Ok(promise)
    }

    /// Drops an operation from [`get_operation`](Self::get_operation)
    /// without running it, detaching the elements its insertion attached.
    ///
    /// Uncommitted insertions are also rolled back by the next commit.
    pub fn discard_operation(&mut self, operation: Operation<H::Element>) {
        let orphans: Vec<TargetId> = operation
            .inserted
            .into_iter()
            .filter(|id| !self.targets.contains(id))
            .collect();
        self.rollback_inserts(&orphans);
    }

    // -- environment --

    /// Re-indexes targets after external DOM changes and re-applies the
    /// current filter and sort without animation. Ignored while mixing.
    pub fn force_refresh(&mut self) -> Result<(), MixError> {
        self.ensure_alive()?;
        if self.active.is_some() {
            self.reporter
                .warn(&Warning::OperationWhileMixing, self.host.now());
            return Ok(());
        }
        self.index_targets();
        let command = MultimixCommand::new()
            .filter(self.state.active_filter.clone())
            .sort(self.state.active_sort.clone());
        self.settle(command)
    }

    /// Leaves a target out of completion counting, for elements the caller
    /// animates itself. Returns `false` if `el` is not a target.
    pub fn set_excluded(&mut self, el: &H::Element, excluded: bool) -> bool {
        let Some(id) = self.store.find(&self.targets, el) else {
            return false;
        };
        self.store[id].is_excluded = excluded;
        true
    }

    /// Sets the element reported as the trigger of the next call.
    pub fn set_trigger_element(&mut self, el: Option<H::Element>) {
        self.trigger_element = el;
    }

    /// Tears the mixer down: stops listening, discards queued calls, clears
    /// inline styles and optionally hides every target. Later calls fail with
    /// [`MixError::Destroyed`].
    pub fn destroy(&mut self, hide_all: bool) -> Result<(), MixError> {
        self.ensure_alive()?;
        self.hooks
            .run(Extension::Destroy, Phase::Before, &mut HookPayload::Empty);

        let was_animating = self.active.take().is_some();
        self.queue.clear();
        self.drop_orphans();
        if was_animating {
            self.reset_container_styles();
        }

        let ctx = MotionContext {
            animation: &self.config.animation,
            effects: &self.effects,
            capabilities: &self.capabilities,
        };
        for &id in &self.targets {
            let Some(target) = self.store.get_mut(id) else {
                continue;
            };
            target.clean_up(&mut self.host, &ctx);
            if hide_all {
                target.hide(&mut self.host);
            }
            self.host.unsubscribe_transition_end(target.element());
        }
        self.host
            .remove_container_class(&self.config.class_names.container_failed);

        self.store.clear();
        self.targets.clear();
        self.orig_order.clear();
        self.toggles.clear();
        self.registry.borrow_mut().release(self.instance);
        self.destroyed = true;

        self.hooks
            .run(Extension::Destroy, Phase::After, &mut HookPayload::Empty);
        tracing::debug!(instance = self.instance.0, "mixer destroyed");
        Ok(())
    }

    fn ensure_alive(&self) -> Result<(), MixError> {
        if self.destroyed {
            Err(MixError::Destroyed)
        } else {
            Ok(())
        }
    }

    /// Scans the container for targets. Known elements keep their target,
    /// vanished ones are dropped and new ones are appended to the indexing
    /// order.
    fn index_targets(&mut self) {
        let found = self.host.query_targets(
            &self.config.selectors.target,
            self.config.layout.allow_nested_targets,
        );

        let mut targets = Vec::with_capacity(found.len());
        for el in found {
            let id = match self.store.find(&self.targets, &el) {
                Some(id) => id,
                None => {
                    self.host.subscribe_transition_end(&el);
                    let id = self.store.insert(Target::new(el));
                    self.orig_order.push(id);
                    id
                }
            };
            targets.push(id);
        }

        for &id in &self.targets {
            if !targets.contains(&id) {
                if let Some(target) = self.store.remove(id) {
                    self.host.unsubscribe_transition_end(target.element());
                }
            }
        }
        self.orig_order.retain(|id| targets.contains(id));
        self.targets = targets;
    }

    /// Builds and commits a command synchronously, then writes `display` on
    /// every target so the DOM matches the state regardless of stylesheets.
    fn settle(&mut self, command: MultimixCommand<H::Element>) -> Result<(), MixError> {
        let operation = self.build_operation(command, None)?;
        self.commit(
            ActiveMix {
                operation,
                motions: Vec::new(),
                join: TransitionJoin::new(),
                awaiting_frame: false,
                animated: false,
                callback: None,
                deferred: None,
                origin: Extension::Multimix,
            },
            false,
        );
        for &id in &self.targets {
            let target = &self.store[id];
            if target.is_shown {
                target.show(&mut self.host, &self.config.layout.display);
            } else {
                target.hide(&mut self.host);
            }
        }
        Ok(())
    }

    // -- accessors --

    /// The committed state.
    #[must_use]
    pub fn get_state(&self) -> State<H::Element> {
        self.state.clone()
    }

    /// Whether an operation is animating.
    #[must_use]
    pub fn is_mixing(&self) -> bool {
        self.active.is_some()
    }

    /// Number of queued calls.
    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// The extension registry.
    pub fn hooks_mut(&mut self) -> &mut HookRegistry<H::Element> {
        &mut self.hooks
    }

    /// Installs a diagnostics sink.
    pub fn set_report_sink(&mut self, sink: Box<dyn ReportSink>) {
        self.reporter.set_sink(sink);
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &MixerConfig {
        &self.config
    }

    /// The shared capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &Rc<Capabilities> {
        &self.capabilities
    }

    /// This mixer's registry handle.
    #[must_use]
    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: Host> Drop for Mixer<H> {
    fn drop(&mut self) {
        if !self.destroyed {
            if let Ok(mut registry) = self.registry.try_borrow_mut() {
                registry.release(self.instance);
            }
        }
    }
}
