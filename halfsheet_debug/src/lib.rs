// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and Chrome trace export for halfsheet diagnostics.
//!
//! This crate provides [`TraceSink`](halfsheet_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`timeline::TimelineSink`]: collects events and writes Chrome Trace
//!   Event Format JSON.

pub mod pretty;
pub mod timeline;
