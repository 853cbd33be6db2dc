// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capabilities for content shown inside a sheet.
//!
//! Presented content does not hold the controller directly. Content that
//! wants to expand itself (a "show more" button, a focused text field)
//! implements [`HalfModalPresentable`] and hands out its current
//! presentation, if any. The provided methods do the rest and degrade to
//! no-ops when the content is not presented as a half-modal sheet.

use crate::controller::PresentationController;
use crate::time::HostTime;
use crate::trace::TraceSink;

/// A presentation that can be asked to expand.
pub trait SheetPresentation {
    /// Animates the sheet to its expanded state.
    fn maximize(&mut self, now: HostTime);

    /// Returns whether the sheet is presented and expanded.
    fn is_maximized(&self) -> bool;
}

impl<S: TraceSink> SheetPresentation for PresentationController<S> {
    fn maximize(&mut self, now: HostTime) {
        Self::maximize(self, now);
    }

    fn is_maximized(&self) -> bool {
        Self::is_maximized(self)
    }
}

/// Content that can be presented as a half-modal sheet.
pub trait HalfModalPresentable {
    /// The presentation currently showing this content.
    fn presentation(&self) -> Option<&dyn SheetPresentation> {
        None
    }

    /// Mutable access to the presentation currently showing this content.
    fn presentation_mut(&mut self) -> Option<&mut dyn SheetPresentation> {
        None
    }

    /// Expands the sheet showing this content, if there is one.
    fn maximize_to_full_screen(&mut self, now: HostTime) {
        if let Some(presentation) = self.presentation_mut() {
            presentation.maximize(now);
        }
    }

    /// Returns whether this content is shown in an expanded sheet.
    fn is_half_modal_maximized(&self) -> bool {
        self.presentation().is_some_and(|p| p.is_maximized())
    }
}
