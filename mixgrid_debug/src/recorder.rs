// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`ReportSink`] and encodes events into a
//! `Vec<u8>` as little-endian records. [`decode`] reads them back as an
//! iterator of [`RecordedEvent`].
//!
//! Warnings store only their kind and numeric payload; the attribute and
//! element descriptions of [`Warning::MissingSortAttribute`] are dropped.

use mixgrid_core::report::{
    BusyEvent, MixEndEvent, MixStartEvent, QueuedEvent, ReportSink, Warning,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_MIX_START: u8 = 1;
const TAG_MIX_END: u8 = 2;
const TAG_QUEUED: u8 = 3;
const TAG_BUSY: u8 = 4;
const TAG_WARNING: u8 = 5;

const FLAG_ANIMATED: u8 = 1;
const FLAG_WILL_SORT: u8 = 2;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`ReportSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    /// Counts are capped at `u32::MAX`.
    fn write_count(&mut self, v: usize) {
        self.write_u32(u32::try_from(v).unwrap_or(u32::MAX));
    }
}

/// A warning as stored in a recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarningKind {
    /// See [`Warning::MissingSortAttribute`].
    MissingSortAttribute,
    /// See [`Warning::QueueFull`].
    QueueFull {
        /// Queue capacity.
        limit: usize,
    },
    /// See [`Warning::BusyWithoutQueue`].
    BusyWithoutQueue,
    /// See [`Warning::OperationWhileMixing`].
    OperationWhileMixing,
}

impl WarningKind {
    /// The kind of `warning`.
    #[must_use]
    pub fn of(warning: &Warning) -> Self {
        match warning {
            Warning::MissingSortAttribute { .. } => Self::MissingSortAttribute,
            Warning::QueueFull { limit } => Self::QueueFull { limit: *limit },
            Warning::BusyWithoutQueue => Self::BusyWithoutQueue,
            Warning::OperationWhileMixing => Self::OperationWhileMixing,
        }
    }

    /// A short name used in trace output.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::MissingSortAttribute => "MissingSortAttribute",
            Self::QueueFull { .. } => "QueueFull",
            Self::BusyWithoutQueue => "BusyWithoutQueue",
            Self::OperationWhileMixing => "OperationWhileMixing",
        }
    }

    fn tag(self) -> u8 {
        match self {
            Self::MissingSortAttribute => 0,
            Self::QueueFull { .. } => 1,
            Self::BusyWithoutQueue => 2,
            Self::OperationWhileMixing => 3,
        }
    }
}

impl ReportSink for RecorderSink {
    fn on_mix_start(&mut self, e: &MixStartEvent) {
        self.write_u8(TAG_MIX_START);
        self.write_u64(e.operation);
        self.write_u64(e.start_state);
        self.write_f64(e.timestamp);
        let mut flags = 0;
        if e.animated {
            flags |= FLAG_ANIMATED;
        }
        if e.will_sort {
            flags |= FLAG_WILL_SORT;
        }
        self.write_u8(flags);
        self.write_count(e.to_show);
        self.write_count(e.to_hide);
        self.write_count(e.to_remove);
    }

    fn on_mix_end(&mut self, e: &MixEndEvent) {
        self.write_u8(TAG_MIX_END);
        self.write_u64(e.operation);
        self.write_u64(e.state);
        self.write_f64(e.timestamp);
        self.write_count(e.total_show);
        self.write_u8(u8::from(e.has_failed));
    }

    fn on_queued(&mut self, e: &QueuedEvent) {
        self.write_u8(TAG_QUEUED);
        self.write_f64(e.timestamp);
        self.write_count(e.queue_len);
        self.write_count(e.limit);
    }

    fn on_busy(&mut self, e: &BusyEvent) {
        self.write_u8(TAG_BUSY);
        self.write_f64(e.timestamp);
        self.write_count(e.queue_len);
        self.write_count(e.limit);
    }

    fn on_warning(&mut self, warning: &Warning, timestamp: f64) {
        let kind = WarningKind::of(warning);
        self.write_u8(TAG_WARNING);
        self.write_f64(timestamp);
        self.write_u8(kind.tag());
        match kind {
            WarningKind::QueueFull { limit } => self.write_count(limit),
            _ => self.write_count(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`MixStartEvent`].
    MixStart(MixStartEvent),
    /// A [`MixEndEvent`].
    MixEnd(MixEndEvent),
    /// A [`QueuedEvent`].
    Queued(QueuedEvent),
    /// A [`BusyEvent`].
    Busy(BusyEvent),
    /// A warning and the host time it was raised at.
    Warning {
        /// Host time in milliseconds.
        timestamp: f64,
        /// What went wrong.
        kind: WarningKind,
    },
}

impl RecordedEvent {
    /// Host time of the event in milliseconds.
    #[must_use]
    pub fn timestamp(&self) -> f64 {
        match self {
            Self::MixStart(e) => e.timestamp,
            Self::MixEnd(e) => e.timestamp,
            Self::Queued(e) => e.timestamp,
            Self::Busy(e) => e.timestamp,
            Self::Warning { timestamp, .. } => *timestamp,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        let [v] = self.read_array::<1>()?;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.read_array::<8>().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_count(&mut self) -> Option<usize> {
        let v = self.read_array::<4>().map(u32::from_le_bytes)?;
        usize::try_from(v).ok()
    }

    fn decode_mix_start(&mut self) -> Option<RecordedEvent> {
        let operation = self.read_u64()?;
        let start_state = self.read_u64()?;
        let timestamp = self.read_f64()?;
        let flags = self.read_u8()?;
        Some(RecordedEvent::MixStart(MixStartEvent {
            operation,
            start_state,
            timestamp,
            animated: flags & FLAG_ANIMATED != 0,
            will_sort: flags & FLAG_WILL_SORT != 0,
            to_show: self.read_count()?,
            to_hide: self.read_count()?,
            to_remove: self.read_count()?,
        }))
    }

    fn decode_mix_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::MixEnd(MixEndEvent {
            operation: self.read_u64()?,
            state: self.read_u64()?,
            timestamp: self.read_f64()?,
            total_show: self.read_count()?,
            has_failed: self.read_u8()? != 0,
        }))
    }

    fn decode_queued(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Queued(QueuedEvent {
            timestamp: self.read_f64()?,
            queue_len: self.read_count()?,
            limit: self.read_count()?,
        }))
    }

    fn decode_busy(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Busy(BusyEvent {
            timestamp: self.read_f64()?,
            queue_len: self.read_count()?,
            limit: self.read_count()?,
        }))
    }

    fn decode_warning(&mut self) -> Option<RecordedEvent> {
        let timestamp = self.read_f64()?;
        let tag = self.read_u8()?;
        let limit = self.read_count()?;
        let kind = match tag {
            0 => WarningKind::MissingSortAttribute,
            1 => WarningKind::QueueFull { limit },
            2 => WarningKind::BusyWithoutQueue,
            _ => WarningKind::OperationWhileMixing,
        };
        Some(RecordedEvent::Warning { timestamp, kind })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_MIX_START => self.decode_mix_start(),
            TAG_MIX_END => self.decode_mix_end(),
            TAG_QUEUED => self.decode_queued(),
            TAG_BUSY => self.decode_busy(),
            TAG_WARNING => self.decode_warning(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_start() -> MixStartEvent {
        MixStartEvent {
            operation: 3,
            start_state: 2,
            timestamp: 1200.5,
            animated: true,
            to_show: 4,
            to_hide: 6,
            to_remove: 1,
            will_sort: false,
        }
    }

    fn sample_end() -> MixEndEvent {
        MixEndEvent {
            operation: 3,
            state: 3,
            timestamp: 1800.0,
            total_show: 4,
            has_failed: false,
        }
    }

    #[test]
    fn a_full_operation_plays_back_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_mix_start(&sample_start());
        rec.on_queued(&QueuedEvent {
            timestamp: 1300.0,
            queue_len: 1,
            limit: 1,
        });
        rec.on_busy(&BusyEvent {
            timestamp: 1310.0,
            queue_len: 1,
            limit: 1,
        });
        rec.on_mix_end(&sample_end());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], RecordedEvent::MixStart(sample_start()));
        assert!(matches!(events[1], RecordedEvent::Queued(e) if e.queue_len == 1));
        assert!(matches!(events[2], RecordedEvent::Busy(e) if e.timestamp == 1310.0));
        assert_eq!(events[3], RecordedEvent::MixEnd(sample_end()));
    }

    #[test]
    fn start_flags_survive_encoding() {
        let mut rec = RecorderSink::new();
        let start = MixStartEvent {
            animated: false,
            will_sort: true,
            ..sample_start()
        };
        rec.on_mix_start(&start);
        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events, vec![RecordedEvent::MixStart(start)]);
    }

    #[test]
    fn warnings_keep_kind_and_limit_only() {
        let mut rec = RecorderSink::new();
        rec.on_warning(
            &Warning::MissingSortAttribute {
                attribute: "published".into(),
                element: "<div>".into(),
            },
            10.0,
        );
        rec.on_warning(&Warning::QueueFull { limit: 3 }, 20.0);
        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            vec![
                RecordedEvent::Warning {
                    timestamp: 10.0,
                    kind: WarningKind::MissingSortAttribute,
                },
                RecordedEvent::Warning {
                    timestamp: 20.0,
                    kind: WarningKind::QueueFull { limit: 3 },
                },
            ]
        );
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        assert_eq!(decode(&[]).count(), 0);
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_mix_start(&sample_start());
        rec.on_mix_end(&sample_end());
        let bytes = rec.into_bytes();
        let events: Vec<_> = decode(&bytes[..bytes.len() - 3]).collect();
        assert_eq!(events, vec![RecordedEvent::MixStart(sample_start())]);
    }

    #[test]
    fn unknown_tag_stops_iteration() {
        assert_eq!(decode(&[0xff, 1, 2, 3]).count(), 0);
    }
}
