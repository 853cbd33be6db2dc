// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag-sample interpretation.
//!
//! [`GestureStateMachine`] turns a stream of [`DragSample`]s into
//! [`DragOutcome`]s. It never mutates the sheet itself; the
//! [`PresentationController`] applies the outcome.
//!
//! On every `Changed` sample the candidate frame is checked against two
//! thresholds, in order:
//!
//! 1. top edge at or above the container's top → snap to
//!    [`Expanded`](ScaleState::Expanded);
//! 2. top edge below the dismiss threshold → request dismissal;
//! 3. otherwise → apply the candidate frame directly.
//!
//! On `Ended` the sign of the last recorded vertical velocity decides: upward
//! always expands, downward steps back from expanded to half, and downward
//! from half dismisses.
//!
//! [`PresentationController`]: crate::controller::PresentationController

use kurbo::Rect;

use crate::geometry::{ScaleState, SheetGeometry};

/// Lifecycle phase reported by the host's drag recognizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// The drag was recognized.
    Began,
    /// The pointer moved.
    Changed,
    /// The pointer was lifted.
    Ended,
    /// Any other recognizer phase (cancelled, failed, possible). Ignored.
    Other,
}

/// One drag sample, in container-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSample {
    /// Recognizer phase.
    pub phase: DragPhase,
    /// Cumulative vertical offset since the drag began.
    pub translation_y: f64,
    /// Signed vertical velocity; negative is upward.
    pub velocity_y: f64,
}

impl DragSample {
    /// Creates a sample.
    #[must_use]
    pub const fn new(phase: DragPhase, translation_y: f64, velocity_y: f64) -> Self {
        Self {
            phase,
            translation_y,
            velocity_y,
        }
    }

    /// A `Began` sample with zero offset and velocity.
    #[must_use]
    pub const fn began() -> Self {
        Self::new(DragPhase::Began, 0.0, 0.0)
    }

    /// A `Changed` sample.
    #[must_use]
    pub const fn changed(translation_y: f64, velocity_y: f64) -> Self {
        Self::new(DragPhase::Changed, translation_y, velocity_y)
    }

    /// An `Ended` sample. Only the recorded direction matters at drag end.
    #[must_use]
    pub const fn ended(translation_y: f64) -> Self {
        Self::new(DragPhase::Ended, translation_y, 0.0)
    }
}

/// What a drag sample asks the controller to do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragOutcome {
    /// Nothing (begin/other phases, or not presented).
    Ignored,
    /// Set the sheet's frame directly, without animation.
    Frame(Rect),
    /// Animate to a resting state.
    Transition(ScaleState),
    /// Ask the host to dismiss the sheet.
    Dismiss,
}

/// Interprets drag samples against a resting [`ScaleState`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureStateMachine {
    direction: f64,
}

impl GestureStateMachine {
    /// Creates a machine with no recorded direction.
    #[must_use]
    pub const fn new() -> Self {
        Self { direction: 0.0 }
    }

    /// Returns the last recorded vertical velocity.
    #[must_use]
    pub const fn direction(&self) -> f64 {
        self.direction
    }

    /// Forgets the recorded direction.
    pub fn reset(&mut self) {
        self.direction = 0.0;
    }

    /// Interprets one sample.
    ///
    /// `state` is the resting state the drag is measured from. The controller
    /// passes the target of an in-flight animation, so a release is judged
    /// against where the sheet is heading rather than where it last settled.
    pub fn handle(
        &mut self,
        sample: &DragSample,
        state: ScaleState,
        geometry: &SheetGeometry,
    ) -> DragOutcome {
        match sample.phase {
            DragPhase::Began => {
                self.reset();
                DragOutcome::Ignored
            }
            DragPhase::Changed => {
                let candidate = geometry.candidate_frame(state, sample.translation_y);
                self.direction = sample.velocity_y;

                if candidate.y0 <= 0.0 {
                    DragOutcome::Transition(ScaleState::Expanded)
                } else if candidate.y0 > geometry.dismiss_threshold() {
                    DragOutcome::Dismiss
                } else {
                    DragOutcome::Frame(candidate)
                }
            }
            DragPhase::Ended => {
                if self.direction < 0.0 {
                    DragOutcome::Transition(ScaleState::Expanded)
                } else if state == ScaleState::Expanded {
                    DragOutcome::Transition(ScaleState::Half)
                } else {
                    DragOutcome::Dismiss
                }
            }
            DragPhase::Other => DragOutcome::Ignored,
        }
    }
}
