// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dimming overlay behind the sheet.
//!
//! An [`Overlay`] exists for exactly one presentation episode. It is created
//! by [`Overlay::attach`] and consumed by [`Overlay::detach`], so the handle
//! cannot outlive the layer it names. The controller keeps it in an `Option`
//! and releases it on every path that ends an episode (completed dismissal,
//! cancelled presentation).

use crate::layer::{LayerId, LayerStore};

/// The overlay's in-progress fade, driven by the host's transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayFade {
    /// Opacity at the start of the host transition.
    pub from: f32,
    /// Opacity at the end of the host transition.
    pub to: f32,
}

impl OverlayFade {
    /// Returns the opacity at `fraction` of the way through the transition.
    /// Fractions outside `0.0..=1.0` are clamped.
    #[must_use]
    pub fn opacity_at(&self, fraction: f32) -> f32 {
        let t = fraction.clamp(0.0, 1.0);
        self.from + (self.to - self.from) * t
    }
}

/// A full-container shade layer, owned by one presentation episode.
#[derive(Debug)]
pub struct Overlay {
    layer: LayerId,
    fade: OverlayFade,
}

impl Overlay {
    /// Creates the overlay at opacity zero, sized to `container`, and inserts
    /// it directly behind `sheet`.
    ///
    /// # Panics
    ///
    /// Panics if `sheet` is not attached to a parent.
    pub fn attach(store: &mut LayerStore, container: LayerId, sheet: LayerId) -> Self {
        let bounds = store.frame(container);
        let layer = store.create_layer(bounds.with_origin((0.0, 0.0)));
        store.set_opacity(layer, 0.0);
        store.insert_before(layer, sheet);
        Self {
            layer,
            fade: OverlayFade { from: 0.0, to: 0.0 },
        }
    }

    /// Returns the overlay's layer.
    #[must_use]
    pub const fn layer(&self) -> LayerId {
        self.layer
    }

    /// Returns the current fade.
    #[must_use]
    pub const fn fade(&self) -> OverlayFade {
        self.fade
    }

    /// Starts a fade from the current opacity to `target`.
    pub fn fade_to(&mut self, store: &LayerStore, target: f32) {
        self.fade = OverlayFade {
            from: store.opacity(self.layer),
            to: target,
        };
    }

    /// Applies the fade at `fraction` of the host transition.
    pub fn apply_fade(&self, store: &mut LayerStore, fraction: f32) {
        store.set_opacity(self.layer, self.fade.opacity_at(fraction));
    }

    /// Reverts a cancelled fade back to its starting opacity.
    pub fn revert_fade(&mut self, store: &mut LayerStore) {
        store.set_opacity(self.layer, self.fade.from);
        self.fade.to = self.fade.from;
    }

    /// Removes the overlay from the tree and destroys its layer.
    pub fn detach(self, store: &mut LayerStore) {
        store.destroy_layer(self.layer);
    }
}
