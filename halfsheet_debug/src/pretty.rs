// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are printed in milliseconds.

use std::io::Write;

use halfsheet_core::gesture::{DragOutcome, DragPhase};
use halfsheet_core::time::HostTime;
use halfsheet_core::trace::{
    DismissEvent, DragEvent, FrameSource, LifecycleEvent, LifecycleStage, OverlayEvent,
    OverlayEventKind, SheetFrameEvent, TraceSink, TransitionEvent, TransitionEventKind,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    frames: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
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
            frames: true,
        }
    }

    /// Disables `[frame]` lines. Animations emit one per tick.
    #[must_use]
    pub fn without_frames(mut self) -> Self {
        self.frames = false;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ms(t: HostTime) -> f64 {
    t.nanos() as f64 / 1_000_000.0
}

fn phase_name(phase: DragPhase) -> &'static str {
    match phase {
        DragPhase::Began => "began",
        DragPhase::Changed => "changed",
        DragPhase::Ended => "ended",
        DragPhase::Other => "other",
    }
}

fn transition_name(kind: TransitionEventKind) -> &'static str {
    match kind {
        TransitionEventKind::Started => "start",
        TransitionEventKind::Queued => "queue",
        TransitionEventKind::Coalesced => "coalesce",
        TransitionEventKind::Settled => "settle",
        TransitionEventKind::Cancelled => "cancel",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_drag(&mut self, e: &DragEvent) {
        let outcome = match e.outcome {
            DragOutcome::Ignored => "ignored".to_owned(),
            DragOutcome::Frame(r) => format!("frame y={:.1} h={:.1}", r.y0, r.height()),
            DragOutcome::Transition(s) => format!("transition->{}", s.as_str()),
            DragOutcome::Dismiss => "dismiss".to_owned(),
        };
        let _ = writeln!(
            self.writer,
            "[drag] {:.1}ms {} ty={:.1} vy={:.1} state={} -> {outcome}",
            ms(e.at),
            phase_name(e.phase),
            e.translation_y,
            e.velocity_y,
            e.state.as_str(),
        );
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[transition:{}] {:.1}ms committed={} target={}",
            transition_name(e.kind),
            ms(e.at),
            e.committed.as_str(),
            e.target.as_str(),
        );
    }

    fn on_dismiss_request(&mut self, e: &DismissEvent) {
        let _ = writeln!(
            self.writer,
            "[dismiss] source={:?} state={}",
            e.source,
            e.state.as_str(),
        );
    }

    fn on_overlay(&mut self, e: &OverlayEvent) {
        let kind = match e.kind {
            OverlayEventKind::Attached => "attached",
            OverlayEventKind::Reused => "reused",
            OverlayEventKind::Detached => "detached",
        };
        let _ = writeln!(self.writer, "[overlay] {kind} layer={:?}", e.layer);
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        let stage = match e.stage {
            LifecycleStage::PresentationWillBegin => "presentation:begin".to_owned(),
            LifecycleStage::PresentationDidEnd { completed } => {
                format!("presentation:end completed={completed}")
            }
            LifecycleStage::DismissalWillBegin => "dismissal:begin".to_owned(),
            LifecycleStage::DismissalDidEnd { completed } => {
                format!("dismissal:end completed={completed}")
            }
        };
        let _ = writeln!(
            self.writer,
            "[lifecycle] {stage} presented={}",
            e.presented
        );
    }

    fn on_sheet_frame(&mut self, e: &SheetFrameEvent) {
        if !self.frames {
            return;
        }
        let source = match e.source {
            FrameSource::Drag => "drag",
            FrameSource::Animation => "anim",
            FrameSource::Reset => "reset",
        };
        let _ = writeln!(
            self.writer,
            "[frame] {source} y={:.1} h={:.1}",
            e.frame.y0,
            e.frame.height(),
        );
    }
}
