// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for mixgrid
//! diagnostics.
//!
//! This crate provides [`ReportSink`](mixgrid_core::report::ReportSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: one human-readable line per event.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from
//!   recorded bytes, one slice per operation.
//!
//! Sinks only see lifecycle events when the mixer's `debug.enable` is set,
//! and warnings when `debug.show_warnings` is set.

pub mod chrome;
pub mod pretty;
pub mod recorder;
