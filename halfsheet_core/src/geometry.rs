// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sheet frames derived from container bounds.
//!
//! All frames are in container-local coordinates: the container's top-left
//! corner is the origin and the sheet always spans the full container width.
//!
//! ```text
//!   ┌───────────────┐ 0
//!   │               │
//!   │   top inset   │
//!   ├───────────────┤ top_inset           ← Expanded
//!   │               │
//!   ├───────────────┤ h * 1/4             ← Half
//!   │               │
//!   │               │
//!   ├ ─ ─ ─ ─ ─ ─ ─ ┤ h * 1/2             ← dismiss threshold
//!   │               │
//!   │               │
//!   └───────────────┘ h
//! ```

use kurbo::{Point, Rect, RoundedRect, RoundedRectRadii, Size};

use crate::config::SheetConfig;

/// The resting height mode of a presented sheet.
///
/// There is no dismissed variant: dismissal is a request to the host, not a
/// state the sheet rests in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScaleState {
    /// The sheet covers the bottom three quarters of the container.
    #[default]
    Half,
    /// The sheet covers the container minus a fixed top inset.
    Expanded,
}

impl ScaleState {
    /// Returns a short label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Half => "half",
            Self::Expanded => "expanded",
        }
    }
}

/// Frame computations for one presentation episode.
///
/// Built once from the presenting context's bounds; never updated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetGeometry {
    container: Size,
    top_inset: f64,
    half_offset_fraction: f64,
    dismiss_fraction: f64,
    corner_radius: f64,
}

impl SheetGeometry {
    /// Creates the geometry for a container of the given size.
    #[must_use]
    pub fn new(container: Size, config: &SheetConfig) -> Self {
        Self {
            container,
            top_inset: config.top_inset,
            half_offset_fraction: config.half_offset_fraction,
            dismiss_fraction: config.dismiss_fraction,
            corner_radius: config.corner_radius,
        }
    }

    /// Returns the container size.
    #[must_use]
    pub const fn container(&self) -> Size {
        self.container
    }

    /// Returns the full container rectangle, used for the overlay.
    #[must_use]
    pub fn container_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.container)
    }

    /// Returns the top edge of a resting sheet in the given state.
    #[must_use]
    pub fn resting_origin_y(&self, state: ScaleState) -> f64 {
        match state {
            ScaleState::Half => self.container.height * self.half_offset_fraction,
            ScaleState::Expanded => self.top_inset,
        }
    }

    /// Returns the canonical frame for a resting sheet in the given state.
    #[must_use]
    pub fn frame_for(&self, state: ScaleState) -> Rect {
        self.frame_at(self.resting_origin_y(state))
    }

    /// The canonical half-height frame.
    #[must_use]
    pub fn half_frame(&self) -> Rect {
        self.frame_for(ScaleState::Half)
    }

    /// The canonical expanded frame.
    #[must_use]
    pub fn expanded_frame(&self) -> Rect {
        self.frame_for(ScaleState::Expanded)
    }

    /// Top-edge positions strictly below this request dismissal.
    #[must_use]
    pub fn dismiss_threshold(&self) -> f64 {
        self.container.height * self.dismiss_fraction
    }

    /// Computes the candidate frame for a drag that started from `state` and
    /// has moved `translation_y` since it began.
    ///
    /// The candidate's top edge is the resting origin shifted by the drag; its
    /// bottom edge stays pinned to the container's bottom. No clamping is
    /// applied, so the result may have a negative origin or height.
    #[must_use]
    pub fn candidate_frame(&self, state: ScaleState, translation_y: f64) -> Rect {
        self.frame_at(translation_y + self.resting_origin_y(state))
    }

    /// Returns the sheet's clip shape for a frame: top corners rounded,
    /// bottom corners square, in the sheet's own coordinate space.
    #[must_use]
    pub fn corner_mask(&self, frame: Rect) -> RoundedRect {
        let bounds = Rect::from_origin_size(Point::ORIGIN, frame.size());
        let r = self.corner_radius;
        RoundedRect::from_rect(bounds, RoundedRectRadii::new(r, r, 0.0, 0.0))
    }

    /// A full-width frame whose top edge is `origin_y` and whose bottom edge
    /// is the container's bottom.
    fn frame_at(&self, origin_y: f64) -> Rect {
        Rect::new(0.0, origin_y, self.container.width, self.container.height)
    }
}
