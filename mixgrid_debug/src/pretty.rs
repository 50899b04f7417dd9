// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable report output.
//!
//! [`PrettyPrintSink`] implements [`ReportSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are host milliseconds.

use std::io::Write;

use mixgrid_core::report::{
    BusyEvent, MixEndEvent, MixStartEvent, QueuedEvent, ReportSink, Warning,
};

/// Writes human-readable report lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    name: String,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::with_writer(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self::with_writer(writer)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            name: String::new(),
        }
    }

    /// Prefixes every line with `[name]`, to tell several mixers apart.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the destination.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn prefix(&self) -> String {
        if self.name.is_empty() {
            String::new()
        } else {
            format!("[{}] ", self.name)
        }
    }
}

impl<W: Write> ReportSink for PrettyPrintSink<W> {
    fn on_mix_start(&mut self, e: &MixStartEvent) {
        let prefix = self.prefix();
        let mode = if e.animated { "animated" } else { "instant" };
        let sort = if e.will_sort { " sort" } else { "" };
        let _ = writeln!(
            self.writer,
            "{prefix}[mix:start] op={} from=state{} at {:.1}ms {mode} show={} hide={} remove={}{sort}",
            e.operation, e.start_state, e.timestamp, e.to_show, e.to_hide, e.to_remove,
        );
    }

    fn on_mix_end(&mut self, e: &MixEndEvent) {
        let prefix = self.prefix();
        let failed = if e.has_failed { " FAILED" } else { "" };
        let _ = writeln!(
            self.writer,
            "{prefix}[mix:end] op={} state={} at {:.1}ms shown={}{failed}",
            e.operation, e.state, e.timestamp, e.total_show,
        );
    }

    fn on_queued(&mut self, e: &QueuedEvent) {
        let prefix = self.prefix();
        let _ = writeln!(
            self.writer,
            "{prefix}[queued] at {:.1}ms queue={}/{}",
            e.timestamp, e.queue_len, e.limit,
        );
    }

    fn on_busy(&mut self, e: &BusyEvent) {
        let prefix = self.prefix();
        let _ = writeln!(
            self.writer,
            "{prefix}[busy] at {:.1}ms queue={}/{}",
            e.timestamp, e.queue_len, e.limit,
        );
    }

    fn on_warning(&mut self, warning: &Warning, timestamp: f64) {
        let prefix = self.prefix();
        let _ = writeln!(self.writer, "{prefix}[warning] at {timestamp:.1}ms {warning}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_writer()).unwrap()
    }

    #[test]
    fn mix_lifecycle_lines() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_mix_start(&MixStartEvent {
            operation: 2,
            start_state: 1,
            timestamp: 100.0,
            animated: true,
            to_show: 3,
            to_hide: 1,
            to_remove: 0,
            will_sort: true,
        });
        sink.on_mix_end(&MixEndEvent {
            operation: 2,
            state: 2,
            timestamp: 700.0,
            total_show: 0,
            has_failed: true,
        });
        let output = lines(sink);
        let mut rows = output.lines();
        let start = rows.next().unwrap();
        assert!(start.starts_with("[mix:start] op=2 from=state1"), "got: {start}");
        assert!(start.contains("animated show=3 hide=1 remove=0 sort"), "got: {start}");
        let end = rows.next().unwrap();
        assert!(end.ends_with("shown=0 FAILED"), "got: {end}");
    }

    #[test]
    fn warnings_use_their_display_text() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new()).named("grid");
        sink.on_warning(&Warning::QueueFull { limit: 1 }, 5.0);
        let output = lines(sink);
        assert_eq!(
            output,
            "[grid] [warning] at 5.0ms queue limit of 1 reached, call rejected\n"
        );
    }
}
