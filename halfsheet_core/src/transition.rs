// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animated resizes between scale states.
//!
//! [`TransitionDriver`] is an explicit two-state machine:
//!
//! ```text
//!           request(target)                 advance(now) settles
//!   Idle ───────────────────► Animating(target) ──────────────────► Idle
//!                                │      ▲
//!                request(other)  │      │ request(target) clears queue
//!                                ▼      │
//!                        queued = Some(other)
//! ```
//!
//! The committed [`ScaleState`] is owned by the caller and only changes when
//! [`advance`](TransitionDriver::advance) reports a settled step. A request
//! that arrives while a transition is in flight is held in a single slot;
//! later requests overwrite earlier ones, and the caller starts the survivor
//! once the in-flight animation settles.

use kurbo::Rect;

use crate::config::TransitionSpec;
use crate::geometry::ScaleState;
use crate::time::{Duration, HostTime};

/// Angular frequency scale: `omega = SETTLE_FACTOR / duration`. With a
/// critically damped spring the residual at `duration` is below 0.5%.
const SETTLE_FACTOR: f64 = 8.0;

/// Integration step for the spring, in seconds.
const SPRING_STEP: f64 = 1.0 / 120.0;

/// Whether a transition is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// No animation in flight.
    Idle,
    /// Animating towards the given state.
    Animating(ScaleState),
}

/// Result of [`TransitionDriver::request`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionRequest {
    /// A new animation started.
    Started,
    /// An animation to a different state is in flight; this target now
    /// occupies the pending slot.
    Queued,
    /// An animation to the same state is already in flight; any pending
    /// request was dropped.
    AlreadyInFlight,
}

/// One animation step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionStep {
    /// State the animation is heading to.
    pub target: ScaleState,
    /// Interpolated sheet frame at this step.
    pub frame: Rect,
    /// Whether the animation reached its end. The caller commits `target`.
    pub settled: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct InFlight {
    target: ScaleState,
    from: Rect,
    to: Rect,
    started: HostTime,
}

/// Runs at most one sheet resize at a time, with a single pending slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionDriver {
    spec: TransitionSpec,
    in_flight: Option<InFlight>,
    queued: Option<ScaleState>,
}

impl TransitionDriver {
    /// Creates an idle driver.
    #[must_use]
    pub const fn new(spec: TransitionSpec) -> Self {
        Self {
            spec,
            in_flight: None,
            queued: None,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        match self.in_flight {
            Some(f) => TransitionPhase::Animating(f.target),
            None => TransitionPhase::Idle,
        }
    }

    /// Returns whether an animation is in flight.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Returns the pending request, if any.
    #[must_use]
    pub const fn queued(&self) -> Option<ScaleState> {
        self.queued
    }

    /// Requests an animation from `from` to `to`, ending in `target`.
    ///
    /// `from` and `to` are only used when the animation starts immediately;
    /// a queued request is re-resolved by the caller when it is started.
    pub fn request(
        &mut self,
        target: ScaleState,
        from: Rect,
        to: Rect,
        now: HostTime,
    ) -> TransitionRequest {
        if let Some(f) = self.in_flight {
            if f.target == target {
                self.queued = None;
                return TransitionRequest::AlreadyInFlight;
            }
            self.queued = Some(target);
            return TransitionRequest::Queued;
        }
        self.in_flight = Some(InFlight {
            target,
            from,
            to,
            started: now,
        });
        TransitionRequest::Started
    }

    /// Removes and returns the pending request.
    pub fn take_queued(&mut self) -> Option<ScaleState> {
        self.queued.take()
    }

    /// Samples the in-flight animation at `now` without changing it.
    #[must_use]
    pub fn sample(&self, now: HostTime) -> Option<TransitionStep> {
        let f = self.in_flight?;
        let elapsed = now.saturating_duration_since(f.started);
        let settled = elapsed >= self.spec.duration;
        let frame = if settled {
            f.to
        } else {
            lerp_rect(f.from, f.to, spring_progress(&self.spec, elapsed))
        };
        Some(TransitionStep {
            target: f.target,
            frame,
            settled,
        })
    }

    /// Advances the in-flight animation to `now`.
    ///
    /// When the returned step is settled the driver is idle again; the
    /// pending slot is left for the caller to [take](Self::take_queued).
    pub fn advance(&mut self, now: HostTime) -> Option<TransitionStep> {
        let step = self.sample(now)?;
        if step.settled {
            self.in_flight = None;
        }
        Some(step)
    }

    /// Drops the in-flight animation and the pending request.
    pub fn cancel(&mut self) {
        self.in_flight = None;
        self.queued = None;
    }
}

/// Normalized spring position after `elapsed`, starting at `0.0` and
/// heading to `1.0`.
///
/// Integrated with semi-implicit Euler from the start on every call so the
/// result depends only on `elapsed`.
fn spring_progress(spec: &TransitionSpec, elapsed: Duration) -> f64 {
    if spec.duration.is_zero() || elapsed >= spec.duration {
        return 1.0;
    }
    let omega = SETTLE_FACTOR / spec.duration.as_secs_f64();
    let stiffness = omega * omega;
    let damping = 2.0 * spec.damping_ratio * omega;

    let dt = elapsed.as_secs_f64();
    let mut position = 0.0;
    let mut velocity = spec.initial_velocity;
    let mut t = 0.0;
    while t < dt {
        let step = SPRING_STEP.min(dt - t);
        let force = -stiffness * (position - 1.0) - damping * velocity;
        velocity += force * step;
        position += velocity * step;
        t += step;
    }
    position.clamp(0.0, 2.0)
}

fn lerp_rect(from: Rect, to: Rect, t: f64) -> Rect {
    let lerp = |a: f64, b: f64| a + (b - a) * t;
    Rect::new(
        lerp(from.x0, to.x0),
        lerp(from.y0, to.y0),
        lerp(from.x1, to.x1),
        lerp(from.y1, to.y1),
    )
}
