// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants for the scene tree.
//!
//! The scene tree uses multi-channel dirty tracking (via [`understory_dirty`])
//! so that a host [`Presenter`](crate::backend::Presenter) only touches the
//! native views that actually changed.
//!
//! - **Propagating**: [`FRAME`] and [`OPACITY`] use
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) with child-to-parent
//!   dependency edges, because world frames and effective opacities are
//!   inherited. Moving the container moves the sheet; fading the overlay
//!   fades anything inside it.
//! - **Local-only**: [`CLIP`]. The sheet's corner mask is per-layer.
//!
//! Structural changes (the overlay coming and going) are not a channel; the
//! store reports them through `SceneChanges::topology_changed`.

use understory_dirty::Channel;

/// Frame changed; descendants' world frames must be recomputed.
pub const FRAME: Channel = Channel::new(0);

/// Opacity changed; descendants' effective opacities must be recomputed.
pub const OPACITY: Channel = Channel::new(1);

/// Clip shape changed.
pub const CLIP: Channel = Channel::new(2);
