// Copyright 2026 the Mixgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Operation engine for animated filtering, sorting, insertion and removal
//! of a container's children.
//!
//! `mixgrid_core` is `no_std` compatible (with `alloc`). It never touches a
//! document itself: geometry reads, style writes and notifications go
//! through the [`Host`](host::Host) trait, which a backend implements for a
//! real DOM.
//!
//! # Architecture
//!
//! Every public call on a [`Mixer`](mixer::Mixer) goes through the same
//! pipeline:
//!
//! ```text
//!   filter / sort / insert / remove / change_layout / multimix
//!       │
//!       ▼
//!   MultimixCommand ──► (busy?) ──► MixQueue ──► later
//!       │
//!       ▼
//!   build: insert, sort, partition, capture start/inter/final geometry
//!       │
//!       ▼
//!   Operation ──► execute: styles in ──► frame ──► styles out
//!                                                     │
//!                 ┌───────────────────────────────────┘
//!                 ▼
//!   transitionend × N ──► TransitionJoin ──► commit ──► State
//! ```
//!
//! **[`mixer`]**: The public API, queueing, lifecycle and the two-phase
//! execution.
//!
//! **[`filter`]**, **[`sort`]** and **[`command`]**: Command types and the
//! show/hide partition and ordering algorithms.
//!
//! **[`operation`]** and **[`state`]**: An operation is the full plan of
//! one transition; a state is the immutable snapshot it commits.
//!
//! **[`target`]**: Per-element wrappers with generational handles and the
//! style primitives that animate one element.
//!
//! **[`style`]** and **[`effects`]**: Geometry snapshots and entrance/exit
//! effect parsing.
//!
//! **[`progress`]**: The completion join over per-target transitions.
//!
//! **[`queue`]** and **[`promise`]**: The bounded FIFO of calls made while
//! mixing and the futures they resolve.
//!
//! **[`hooks`]**: Before/after extension points.
//!
//! **[`report`]**: The [`ReportSink`](report::ReportSink) trait and
//! lifecycle event types.
//!
//! **[`registry`]**: Bookkeeping shared by several mixers on one page.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod command;
pub mod config;
pub mod effects;
pub mod error;
pub mod filter;
pub mod hooks;
pub mod host;
pub mod mixer;
pub mod operation;
pub mod progress;
pub mod promise;
pub mod queue;
pub mod registry;
pub mod report;
pub mod sort;
pub mod state;
pub mod style;
pub mod target;

#[cfg(test)]
mod mock;
