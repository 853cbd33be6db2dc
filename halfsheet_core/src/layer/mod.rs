// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene tree for the presentation.
//!
//! The controller keeps a tiny retained tree (container, overlay, sheet) that
//! mirrors what the host should display. Each layer has:
//!
//! - An identity ([`LayerId`]), a generational handle that goes stale when the
//!   layer is destroyed (the overlay is destroyed at the end of every
//!   presentation episode).
//! - Topology: a parent link and an ordered child list. Child order is paint
//!   order, so the overlay is inserted *before* the sheet.
//! - **Local properties** set by the controller:
//!   [`frame`](LayerStore::set_frame), [`opacity`](LayerStore::set_opacity)
//!   and [`clip`](LayerStore::set_clip).
//! - **Computed properties** produced by [`evaluate`](LayerStore::evaluate):
//!   `world_frame` (local frame offset by the ancestors' origins) and
//!   `effective_opacity` (product of ancestor opacities).

mod clip;
mod evaluate;
mod id;
mod store;

pub use clip::ClipShape;
pub use evaluate::SceneChanges;
pub use id::LayerId;
pub use store::LayerStore;
