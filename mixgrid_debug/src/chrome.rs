// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//! Each operation becomes a `B`/`E` slice; queueing, rejections and
//! warnings become instant events.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, WarningKind, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Host millisecond timestamps are converted to microseconds.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes).map(|e| trace_event(&e)).collect();
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn trace_event(recorded: &RecordedEvent) -> Value {
    let ts = ms_to_us(recorded.timestamp());
    match recorded {
        RecordedEvent::MixStart(e) => json!({
            "ph": "B",
            "name": "Mix",
            "cat": "Operation",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "args": {
                "operation": e.operation,
                "start_state": e.start_state,
                "animated": e.animated,
                "to_show": e.to_show,
                "to_hide": e.to_hide,
                "to_remove": e.to_remove,
                "will_sort": e.will_sort,
            }
        }),
        RecordedEvent::MixEnd(e) => json!({
            "ph": "E",
            "name": "Mix",
            "cat": "Operation",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "args": {
                "operation": e.operation,
                "state": e.state,
                "total_show": e.total_show,
                "has_failed": e.has_failed,
            }
        }),
        RecordedEvent::Queued(e) => json!({
            "ph": "i",
            "name": "Queued",
            "cat": "Queue",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": {
                "queue_len": e.queue_len,
                "limit": e.limit,
            }
        }),
        RecordedEvent::Busy(e) => json!({
            "ph": "i",
            "name": "Busy",
            "cat": "Queue",
            "ts": ts,
            "pid": 0,
            "tid": 0,
            "s": "t",
            "args": {
                "queue_len": e.queue_len,
                "limit": e.limit,
            }
        }),
        RecordedEvent::Warning { kind, .. } => {
            let mut args = json!({ "kind": kind.name() });
            if let WarningKind::QueueFull { limit } = kind {
                args["limit"] = json!(limit);
            }
            json!({
                "ph": "i",
                "name": "Warning",
                "cat": "Warning",
                "ts": ts,
                "pid": 0,
                "tid": 0,
                "s": "g",
                "args": args,
            })
        }
    }
}

fn ms_to_us(ms: f64) -> f64 {
    ms * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use mixgrid_core::report::{MixEndEvent, MixStartEvent, QueuedEvent, ReportSink, Warning};

    fn export_to_values(rec: &RecorderSink) -> Vec<Value> {
        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        serde_json::from_str(&json_str).unwrap()
    }

    #[test]
    fn operations_become_slices() {
        let mut rec = RecorderSink::new();
        rec.on_mix_start(&MixStartEvent {
            operation: 1,
            start_state: 0,
            timestamp: 2.5,
            animated: true,
            to_show: 2,
            to_hide: 2,
            to_remove: 0,
            will_sort: false,
        });
        rec.on_queued(&QueuedEvent {
            timestamp: 3.0,
            queue_len: 1,
            limit: 1,
        });
        rec.on_mix_end(&MixEndEvent {
            operation: 1,
            state: 1,
            timestamp: 602.5,
            total_show: 2,
            has_failed: false,
        });

        let parsed = export_to_values(&rec);
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "Mix");
        assert_eq!(parsed[0]["ts"], 2500.0);
        assert_eq!(parsed[0]["args"]["to_show"], 2);

        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["name"], "Queued");

        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["ts"], 602_500.0);
    }

    #[test]
    fn warnings_are_global_instants() {
        let mut rec = RecorderSink::new();
        rec.on_warning(&Warning::BusyWithoutQueue, 1.0);
        rec.on_warning(&Warning::QueueFull { limit: 4 }, 2.0);
        let parsed = export_to_values(&rec);
        assert_eq!(parsed[0]["s"], "g");
        assert_eq!(parsed[0]["args"]["kind"], "BusyWithoutQueue");
        assert!(parsed[0]["args"].get("limit").is_none());
        assert_eq!(parsed[1]["args"]["limit"], 4);
    }

    #[test]
    fn export_empty_recording() {
        let parsed = export_to_values(&RecorderSink::new());
        assert!(parsed.is_empty());
    }
}
