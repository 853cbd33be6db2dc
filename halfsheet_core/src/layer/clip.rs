// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clip shapes.

use kurbo::{Rect, RoundedRect};

/// A shape clipping a layer's content, in the layer's own coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClipShape {
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// A rectangle with per-corner radii (the sheet's top-corner mask).
    RoundedRect(RoundedRect),
}

impl ClipShape {
    /// Returns the bounding rectangle of the clip.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Rect(r) => *r,
            Self::RoundedRect(r) => r.rect(),
        }
    }
}
