// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics for the operation lifecycle.
//!
//! A [`ReportSink`] receives one call per lifecycle event and per non-fatal
//! [`Warning`]. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! [`Reporter`] owns an optional boxed sink and gates dispatch on the
//! mixer's [`DebugConfig`]: lifecycle events reach the sink only with
//! `debug.enable`, warnings only with `debug.show_warnings`. Every event is
//! logged through `tracing` regardless of the gates.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;
use core::fmt;

use crate::config::DebugConfig;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Emitted when an operation starts executing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MixStartEvent {
    /// Operation id.
    pub operation: u64,
    /// Id of the state the operation starts from.
    pub start_state: u64,
    /// Host time in milliseconds.
    pub timestamp: f64,
    /// Whether the operation animates.
    pub animated: bool,
    /// Number of targets being shown.
    pub to_show: usize,
    /// Number of targets being hidden.
    pub to_hide: usize,
    /// Number of targets being removed.
    pub to_remove: usize,
    /// Whether the order changes.
    pub will_sort: bool,
}

/// Emitted when an operation commits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MixEndEvent {
    /// Operation id.
    pub operation: u64,
    /// Id of the committed state.
    pub state: u64,
    /// Host time in milliseconds.
    pub timestamp: f64,
    /// Shown targets in the committed state.
    pub total_show: usize,
    /// Whether the filter matched nothing.
    pub has_failed: bool,
}

/// Emitted when a call made while mixing is queued.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QueuedEvent {
    /// Host time in milliseconds.
    pub timestamp: f64,
    /// Queue length after queueing.
    pub queue_len: usize,
    /// Queue capacity.
    pub limit: usize,
}

/// Emitted when a call made while mixing is rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BusyEvent {
    /// Host time in milliseconds.
    pub timestamp: f64,
    /// Queue length at rejection.
    pub queue_len: usize,
    /// Queue capacity.
    pub limit: usize,
}

/// A non-fatal data-quality or contention warning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    /// A target lacks the attribute a sort was requested on; `"0"` was used.
    MissingSortAttribute {
        /// The camel-cased attribute key.
        attribute: String,
        /// Description of the element.
        element: String,
    },
    /// A call was rejected because the queue is full.
    QueueFull {
        /// Queue capacity.
        limit: usize,
    },
    /// A call was rejected because queueing is disabled.
    BusyWithoutQueue,
    /// An operation was requested while another one was animating.
    OperationWhileMixing,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSortAttribute { attribute, element } => write!(
                f,
                "sort attribute `{attribute}` missing on {element}, using 0"
            ),
            Self::QueueFull { limit } => {
                write!(f, "queue limit of {limit} reached, call rejected")
            }
            Self::BusyWithoutQueue => f.write_str("mixer is busy and queueing is disabled"),
            Self::OperationWhileMixing => {
                f.write_str("operations cannot be requested while mixing")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ReportSink trait
// ---------------------------------------------------------------------------

/// Receives lifecycle events and warnings.
pub trait ReportSink {
    /// Called when an operation starts executing.
    fn on_mix_start(&mut self, e: &MixStartEvent) {
        _ = e;
    }

    /// Called when an operation commits.
    fn on_mix_end(&mut self, e: &MixEndEvent) {
        _ = e;
    }

    /// Called when a call is queued.
    fn on_queued(&mut self, e: &QueuedEvent) {
        _ = e;
    }

    /// Called when a call is rejected.
    fn on_busy(&mut self, e: &BusyEvent) {
        _ = e;
    }

    /// Called with a non-fatal warning.
    fn on_warning(&mut self, warning: &Warning, timestamp: f64) {
        _ = (warning, timestamp);
    }
}

/// A [`ReportSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl ReportSink for NoopSink {}

impl<S: ReportSink + ?Sized> ReportSink for Rc<RefCell<S>> {
    fn on_mix_start(&mut self, e: &MixStartEvent) {
        self.borrow_mut().on_mix_start(e);
    }

    fn on_mix_end(&mut self, e: &MixEndEvent) {
        self.borrow_mut().on_mix_end(e);
    }

    fn on_queued(&mut self, e: &QueuedEvent) {
        self.borrow_mut().on_queued(e);
    }

    fn on_busy(&mut self, e: &BusyEvent) {
        self.borrow_mut().on_busy(e);
    }

    fn on_warning(&mut self, warning: &Warning, timestamp: f64) {
        self.borrow_mut().on_warning(warning, timestamp);
    }
}

// ---------------------------------------------------------------------------
// Reporter wrapper
// ---------------------------------------------------------------------------

/// Config-gated wrapper around an optional boxed [`ReportSink`].
pub struct Reporter {
    sink: Option<Box<dyn ReportSink>>,
    config: DebugConfig,
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("has_sink", &self.sink.is_some())
            .field("config", &self.config)
            .finish()
    }
}

impl Reporter {
    /// Creates a reporter without a sink.
    #[must_use]
    pub fn new(config: DebugConfig) -> Self {
        Self { sink: None, config }
    }

    /// Installs a sink, returning the previous one.
    pub fn set_sink(&mut self, sink: Box<dyn ReportSink>) -> Option<Box<dyn ReportSink>> {
        self.sink.replace(sink)
    }

    /// Removes and returns the installed sink.
    pub fn take_sink(&mut self) -> Option<Box<dyn ReportSink>> {
        self.sink.take()
    }

    fn events(&mut self) -> Option<&mut (dyn ReportSink + 'static)> {
        if self.config.enable {
            self.sink.as_deref_mut()
        } else {
            None
        }
    }

    /// Reports an operation start.
    pub fn mix_start(&mut self, e: &MixStartEvent) {
        tracing::debug!(
            operation = e.operation,
            animated = e.animated,
            to_show = e.to_show,
            to_hide = e.to_hide,
            will_sort = e.will_sort,
            "mix start"
        );
        if let Some(s) = self.events() {
            s.on_mix_start(e);
        }
    }

    /// Reports an operation commit.
    pub fn mix_end(&mut self, e: &MixEndEvent) {
        tracing::debug!(
            operation = e.operation,
            state = e.state,
            total_show = e.total_show,
            has_failed = e.has_failed,
            "mix end"
        );
        if let Some(s) = self.events() {
            s.on_mix_end(e);
        }
    }

    /// Reports a queued call.
    pub fn queued(&mut self, e: &QueuedEvent) {
        tracing::debug!(queue_len = e.queue_len, limit = e.limit, "call queued");
        if let Some(s) = self.events() {
            s.on_queued(e);
        }
    }

    /// Reports a rejected call.
    pub fn busy(&mut self, e: &BusyEvent) {
        tracing::debug!(queue_len = e.queue_len, limit = e.limit, "call rejected");
        if let Some(s) = self.events() {
            s.on_busy(e);
        }
    }

    /// Reports a warning.
    pub fn warn(&mut self, warning: &Warning, timestamp: f64) {
        tracing::warn!("{warning}");
        if !self.config.show_warnings {
            return;
        }
        if let Some(s) = &mut self.sink {
            s.on_warning(warning, timestamp);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[derive(Default)]
    struct Counting {
        starts: usize,
        warnings: Vec<Warning>,
    }

    impl ReportSink for Counting {
        fn on_mix_start(&mut self, _e: &MixStartEvent) {
            self.starts += 1;
        }

        fn on_warning(&mut self, warning: &Warning, _timestamp: f64) {
            self.warnings.push(warning.clone());
        }
    }

    fn start() -> MixStartEvent {
        MixStartEvent {
            operation: 1,
            start_state: 0,
            timestamp: 0.0,
            animated: true,
            to_show: 1,
            to_hide: 0,
            to_remove: 0,
            will_sort: false,
        }
    }

    #[test]
    fn events_require_debug_enable() {
        let sink = Rc::new(RefCell::new(Counting::default()));
        let mut reporter = Reporter::new(DebugConfig::default());
        reporter.set_sink(Box::new(sink.clone()));

        reporter.mix_start(&start());
        reporter.warn(&Warning::BusyWithoutQueue, 1.0);
        assert_eq!(sink.borrow().starts, 0);
        assert_eq!(sink.borrow().warnings, [Warning::BusyWithoutQueue]);

        let mut reporter = Reporter::new(DebugConfig {
            enable: true,
            show_warnings: false,
        });
        reporter.set_sink(Box::new(sink.clone()));
        reporter.mix_start(&start());
        reporter.warn(&Warning::OperationWhileMixing, 2.0);
        assert_eq!(sink.borrow().starts, 1);
        assert_eq!(sink.borrow().warnings.len(), 1);
    }

    #[test]
    fn warning_messages() {
        let w = Warning::MissingSortAttribute {
            attribute: String::from("publishedDate"),
            element: String::from("#a"),
        };
        assert_eq!(
            alloc::format!("{w}"),
            "sort attribute `publishedDate` missing on #a, using 0"
        );
    }
}
