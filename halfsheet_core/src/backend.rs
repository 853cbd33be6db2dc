// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host backend contract.
//!
//! `halfsheet_core` never touches native views. A host provides:
//!
//! - **Drag samples**: its gesture recognizer's phase, translation and
//!   velocity, fed to
//!   [`handle_drag`](crate::controller::PresentationController::handle_drag).
//! - **Lifecycle hooks**: the presentation/dismissal callbacks of its
//!   transition system, forwarded to the controller.
//! - **Frame ticks**: a display-link callback that calls
//!   [`tick`](crate::controller::PresentationController::tick).
//! - **Presenter**: an implementation of [`Presenter`] that mirrors the
//!   scene tree into native views.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(now: HostTime) {
//!     controller.tick(now);
//!     let changes = controller.evaluate();
//!     presenter.apply(controller.scene(), &changes);
//! }
//! ```

use crate::layer::{LayerStore, SceneChanges};

/// Applies evaluated scene changes to a native view tree.
pub trait Presenter {
    /// Applies `changes`, reading current property values from `store`.
    fn apply(&mut self, store: &LayerStore, changes: &SceneChanges);
}
