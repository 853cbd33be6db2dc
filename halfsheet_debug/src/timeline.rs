// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format export.
//!
//! [`TimelineSink`] collects controller events as [Chrome Trace Event
//! Format][format] objects and writes them as a JSON array, suitable for
//! loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
//!
//! Resize animations become duration slices (`B` on start, `E` on settle or
//! cancellation). Drag samples and host hooks become instant events, and
//! sheet frames become a `sheet_y` counter track. Events that carry no timestamp of their
//! own are stamped with the latest timestamp seen.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use halfsheet_core::time::HostTime;
use halfsheet_core::trace::{
    DismissEvent, DragEvent, LifecycleEvent, OverlayEvent, SheetFrameEvent, TraceSink,
    TransitionEvent, TransitionEventKind,
};

const TID_GESTURE: u32 = 0;
const TID_TRANSITION: u32 = 1;
const TID_LIFECYCLE: u32 = 2;

/// Collects trace events for Chrome trace export.
#[derive(Clone, Debug, Default)]
pub struct TimelineSink {
    events: Vec<Value>,
    last_us: f64,
}

impl TimelineSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collected events.
    #[must_use]
    pub fn events(&self) -> &[Value] {
        &self.events
    }

    /// Writes the collected events as a JSON array.
    pub fn write_json(&self, writer: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, &self.events)?;
        Ok(())
    }

    fn stamp(&mut self, at: HostTime) -> f64 {
        self.last_us = at.nanos() as f64 / 1000.0;
        self.last_us
    }

    fn instant(&mut self, name: &str, cat: &str, tid: u32, args: Value) {
        self.events.push(json!({
            "ph": "i",
            "name": name,
            "cat": cat,
            "ts": self.last_us,
            "pid": 0,
            "tid": tid,
            "s": "t",
            "args": args,
        }));
    }
}

impl TraceSink for TimelineSink {
    fn on_drag(&mut self, e: &DragEvent) {
        let _ = self.stamp(e.at);
        self.instant(
            "Drag",
            "Gesture",
            TID_GESTURE,
            json!({
                "phase": format!("{:?}", e.phase),
                "translation_y": e.translation_y,
                "velocity_y": e.velocity_y,
                "state": e.state.as_str(),
                "outcome": format!("{:?}", e.outcome),
            }),
        );
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let ts = self.stamp(e.at);
        let name = format!("Resize to {}", e.target.as_str());
        match e.kind {
            TransitionEventKind::Started => self.events.push(json!({
                "ph": "B",
                "name": name,
                "cat": "Transition",
                "ts": ts,
                "pid": 0,
                "tid": TID_TRANSITION,
                "args": { "committed": e.committed.as_str() },
            })),
            TransitionEventKind::Settled | TransitionEventKind::Cancelled => {
                self.events.push(json!({
                    "ph": "E",
                    "name": name,
                    "cat": "Transition",
                    "ts": ts,
                    "pid": 0,
                    "tid": TID_TRANSITION,
                    "args": {
                        "committed": e.committed.as_str(),
                        "cancelled": e.kind == TransitionEventKind::Cancelled,
                    },
                }));
            }
            TransitionEventKind::Queued | TransitionEventKind::Coalesced => self.instant(
                &format!("{:?}", e.kind),
                "Transition",
                TID_TRANSITION,
                json!({ "target": e.target.as_str() }),
            ),
        }
    }

    fn on_dismiss_request(&mut self, e: &DismissEvent) {
        self.instant(
            "DismissRequest",
            "Lifecycle",
            TID_LIFECYCLE,
            json!({
                "source": format!("{:?}", e.source),
                "state": e.state.as_str(),
            }),
        );
    }

    fn on_overlay(&mut self, e: &OverlayEvent) {
        self.instant(
            &format!("Overlay{:?}", e.kind),
            "Lifecycle",
            TID_LIFECYCLE,
            json!({ "layer": e.layer.index() }),
        );
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.instant(
            &format!("{:?}", e.stage),
            "Lifecycle",
            TID_LIFECYCLE,
            json!({ "presented": e.presented }),
        );
    }

    fn on_sheet_frame(&mut self, e: &SheetFrameEvent) {
        self.events.push(json!({
            "ph": "C",
            "name": "sheet_y",
            "ts": self.last_us,
            "pid": 0,
            "args": { "y": e.frame.y0 },
        }));
    }
}
