// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunable constants for sheet geometry, overlay, and transitions.

use crate::time::Duration;

/// Parameters of the animated resize between scale states.
///
/// The curve is a damped spring normalized to run from progress `0.0` to
/// `1.0`; it is forced to settle exactly at `duration`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionSpec {
    /// Total animation time. The target frame is committed once this much
    /// time has elapsed since the transition started.
    pub duration: Duration,
    /// Spring damping ratio (`1.0` = critically damped, no overshoot).
    pub damping_ratio: f64,
    /// Initial spring velocity in progress units per second.
    pub initial_velocity: f64,
}

impl TransitionSpec {
    /// Critically damped, 800 ms, matching the stock half-modal feel.
    pub const DEFAULT: Self = Self {
        duration: Duration::from_millis(800),
        damping_ratio: 1.0,
        initial_velocity: 0.5,
    };

    /// A transition that settles on the first tick.
    pub const INSTANT: Self = Self {
        duration: Duration::ZERO,
        damping_ratio: 1.0,
        initial_velocity: 0.0,
    };
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration for a [`PresentationController`].
///
/// [`PresentationController`]: crate::controller::PresentationController
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetConfig {
    /// Gap between the container's top edge and an expanded sheet.
    pub top_inset: f64,
    /// Fraction of the container height above a half-height sheet.
    ///
    /// `0.25` places the sheet over the bottom three quarters.
    pub half_offset_fraction: f64,
    /// Fraction of the container height past which a dragged sheet's top
    /// edge requests dismissal.
    pub dismiss_fraction: f64,
    /// Radius of the sheet's rounded top corners.
    pub corner_radius: f64,
    /// Overlay opacity while the sheet is presented.
    pub overlay_opacity: f32,
    /// Animated resize parameters.
    pub transition: TransitionSpec,
}

impl SheetConfig {
    /// The stock half-modal configuration.
    pub const DEFAULT: Self = Self {
        top_inset: 40.0,
        half_offset_fraction: 0.25,
        dismiss_fraction: 0.5,
        corner_radius: 10.0,
        overlay_opacity: 0.6,
        transition: TransitionSpec::DEFAULT,
    };

    /// Returns a copy with a different transition spec.
    #[must_use]
    pub const fn with_transition(mut self, transition: TransitionSpec) -> Self {
        self.transition = transition;
        self
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
