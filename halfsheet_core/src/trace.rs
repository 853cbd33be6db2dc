// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the presentation controller.
//!
//! [`TraceSink`] has one method per event the controller emits; every method
//! defaults to a no-op, so a sink only implements what it cares about.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. With the `trace`
//! feature **off** every `Tracer` method compiles to nothing. With it **on**,
//! each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies.

use kurbo::Rect;

use crate::controller::DismissSource;
use crate::geometry::ScaleState;
use crate::gesture::{DragOutcome, DragPhase};
use crate::layer::LayerId;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What happened to a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionEventKind {
    /// An animation started.
    Started,
    /// The request went into the pending slot.
    Queued,
    /// The request matched the in-flight target and was folded into it.
    Coalesced,
    /// The animation settled and its target was committed.
    Settled,
    /// The animation was dropped before settling because the episode ended
    /// or restarted. Nothing was committed.
    Cancelled,
}

/// Which host lifecycle hook ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleStage {
    /// `presentation_will_begin`.
    PresentationWillBegin,
    /// `presentation_did_end` with its completion flag.
    PresentationDidEnd {
        /// Whether the entry transition completed.
        completed: bool,
    },
    /// `dismissal_will_begin`.
    DismissalWillBegin,
    /// `dismissal_did_end` with its completion flag.
    DismissalDidEnd {
        /// Whether the exit transition completed.
        completed: bool,
    },
}

/// What happened to the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayEventKind {
    /// Created and inserted behind the sheet.
    Attached,
    /// An overlay kept from a cancelled dismissal was reused.
    Reused,
    /// Removed from the tree and destroyed.
    Detached,
}

/// Why the sheet's frame changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameSource {
    /// A live drag update.
    Drag,
    /// An animation step.
    Animation,
    /// Reset to the canonical half frame at presentation start.
    Reset,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted for every drag sample the controller handles.
#[derive(Clone, Copy, Debug)]
pub struct DragEvent {
    /// When the sample was handled.
    pub at: HostTime,
    /// Recognizer phase.
    pub phase: DragPhase,
    /// Cumulative vertical offset.
    pub translation_y: f64,
    /// Vertical velocity.
    pub velocity_y: f64,
    /// State the sample was measured against: the in-flight target, or the
    /// committed state when idle.
    pub state: ScaleState,
    /// What the gesture machine decided.
    pub outcome: DragOutcome,
}

/// Emitted when a transition is requested or settles.
#[derive(Clone, Copy, Debug)]
pub struct TransitionEvent {
    /// When it happened.
    pub at: HostTime,
    /// What happened.
    pub kind: TransitionEventKind,
    /// Committed state at the time of the event (after commit for
    /// [`Settled`](TransitionEventKind::Settled), before the reset for
    /// [`Cancelled`](TransitionEventKind::Cancelled)).
    pub committed: ScaleState,
    /// Target of the request or animation.
    pub target: ScaleState,
}

/// Emitted when the controller asks the host to dismiss.
#[derive(Clone, Copy, Debug)]
pub struct DismissEvent {
    /// What triggered the request.
    pub source: DismissSource,
    /// Committed state when the request was issued.
    pub state: ScaleState,
}

/// Emitted on overlay lifecycle changes.
#[derive(Clone, Copy, Debug)]
pub struct OverlayEvent {
    /// What happened.
    pub kind: OverlayEventKind,
    /// The overlay's layer handle (stale after `Detached`).
    pub layer: LayerId,
}

/// Emitted when a host lifecycle hook runs.
#[derive(Clone, Copy, Debug)]
pub struct LifecycleEvent {
    /// Which hook.
    pub stage: LifecycleStage,
    /// Whether the sheet counts as presented after the hook.
    pub presented: bool,
}

/// Emitted whenever the sheet's frame is written.
#[derive(Clone, Copy, Debug)]
pub struct SheetFrameEvent {
    /// Why the frame changed.
    pub source: FrameSource,
    /// The new frame, container-local.
    pub frame: Rect,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from a [`PresentationController`].
///
/// [`PresentationController`]: crate::controller::PresentationController
pub trait TraceSink {
    /// Called for every handled drag sample.
    fn on_drag(&mut self, e: &DragEvent) {
        _ = e;
    }

    /// Called when a transition is requested or settles.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called when a dismiss request is issued.
    fn on_dismiss_request(&mut self, e: &DismissEvent) {
        _ = e;
    }

    /// Called on overlay lifecycle changes.
    fn on_overlay(&mut self, e: &OverlayEvent) {
        _ = e;
    }

    /// Called when a host lifecycle hook runs.
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        _ = e;
    }

    /// Called whenever the sheet's frame is written.
    fn on_sheet_frame(&mut self, e: &SheetFrameEvent) {
        _ = e;
    }
}

impl<T: TraceSink + ?Sized> TraceSink for &mut T {
    fn on_drag(&mut self, e: &DragEvent) {
        (**self).on_drag(e);
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        (**self).on_transition(e);
    }

    fn on_dismiss_request(&mut self, e: &DismissEvent) {
        (**self).on_dismiss_request(e);
    }

    fn on_overlay(&mut self, e: &OverlayEvent) {
        (**self).on_overlay(e);
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        (**self).on_lifecycle(e);
    }

    fn on_sheet_frame(&mut self, e: &SheetFrameEvent) {
        (**self).on_sheet_frame(e);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`DragEvent`].
    #[inline]
    pub fn drag(&mut self, e: &DragEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_drag(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DismissEvent`].
    #[inline]
    pub fn dismiss_request(&mut self, e: &DismissEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_dismiss_request(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`OverlayEvent`].
    #[inline]
    pub fn overlay(&mut self, e: &OverlayEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_overlay(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LifecycleEvent`].
    #[inline]
    pub fn lifecycle(&mut self, e: &LifecycleEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_lifecycle(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SheetFrameEvent`].
    #[inline]
    pub fn sheet_frame(&mut self, e: &SheetFrameEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_sheet_frame(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_drag() -> DragEvent {
        DragEvent {
            at: HostTime(1_000),
            phase: DragPhase::Changed,
            translation_y: 100.0,
            velocity_y: 12.0,
            state: ScaleState::Half,
            outcome: DragOutcome::Frame(Rect::new(0.0, 300.0, 400.0, 800.0)),
        }
    }

    #[test]
    fn noop_sink_accepts_everything() {
        let mut sink = NoopSink;
        sink.on_drag(&sample_drag());
        sink.on_lifecycle(&LifecycleEvent {
            stage: LifecycleStage::DismissalDidEnd { completed: true },
            presented: false,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.drag(&sample_drag());
        tracer.sheet_frame(&SheetFrameEvent {
            source: FrameSource::Drag,
            frame: Rect::ZERO,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            drags: Vec<f64>,
        }
        impl TraceSink for RecordingSink {
            fn on_drag(&mut self, e: &DragEvent) {
                self.drags.push(e.translation_y);
            }
        }

        let mut sink = RecordingSink { drags: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.drag(&sample_drag());
        drop(tracer);
        assert_eq!(sink.drags, &[100.0]);
    }
}
