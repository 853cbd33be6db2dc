// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The presentation controller.
//!
//! [`PresentationController`] owns everything that lives for one presentation
//! episode: the scene tree (container, overlay, sheet), the committed
//! [`ScaleState`], the embedded [`GestureStateMachine`], and the
//! [`TransitionDriver`]. The host forwards its lifecycle callbacks, drag
//! samples, taps and display ticks; the controller mutates the scene and
//! answers with outcomes and dismiss requests.
//!
//! # Episode lifecycle
//!
//! ```text
//!   new() ──► presentation_will_begin() ──► [drag / tap / maximize / tick]*
//!                 ▲                                   │
//!                 │                          dismissal_will_begin()
//!                 │                                   │
//!                 └──── dismissal_did_end(true) ◄─────┘
//!                       (overlay destroyed, state reset)
//! ```
//!
//! # In-flight transitions
//!
//! The committed state changes only when an animation settles in
//! [`tick`](PresentationController::tick). While one is in flight, drag
//! samples are measured from the animation's target rather than the stale
//! committed state, live frame updates are dropped (the animation owns the
//! frame), transition requests go into the driver's single pending slot, and
//! dismiss requests pass through. An animation dropped by the end of an
//! episode is reported as [`Cancelled`](TransitionEventKind::Cancelled).

use kurbo::{Rect, Size};

use crate::config::SheetConfig;
use crate::geometry::{ScaleState, SheetGeometry};
use crate::gesture::{DragOutcome, DragPhase, DragSample, GestureStateMachine};
use crate::layer::{ClipShape, LayerId, LayerStore, SceneChanges};
use crate::overlay::Overlay;
use crate::time::HostTime;
use crate::trace::{
    DismissEvent, DragEvent, FrameSource, LifecycleEvent, LifecycleStage, NoopSink,
    OverlayEvent, OverlayEventKind, SheetFrameEvent, TraceSink, Tracer, TransitionEvent,
    TransitionEventKind,
};
use crate::transition::{TransitionDriver, TransitionPhase, TransitionRequest};

/// What triggered a dismiss request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DismissSource {
    /// A drag moved the sheet's top edge past the dismiss threshold.
    DraggedPastThreshold,
    /// A downward drag ended while the sheet was at half height.
    DragEnded,
    /// The overlay was tapped.
    TapOutside,
}

/// A request for the host to dismiss the sheet.
///
/// The host's own lifecycle decides whether dismissal proceeds; the
/// controller learns the result through
/// [`dismissal_did_end`](PresentationController::dismissal_did_end).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DismissRequest {
    /// What triggered the request.
    pub source: DismissSource,
    /// Whether the host should animate the dismissal.
    pub animated: bool,
}

/// Drives a half-height modal sheet for one presenting context.
pub struct PresentationController<S: TraceSink = NoopSink> {
    config: SheetConfig,
    geometry: SheetGeometry,
    store: LayerStore,
    container: LayerId,
    sheet: LayerId,
    overlay: Option<Overlay>,
    presented: bool,
    state: ScaleState,
    gesture: GestureStateMachine,
    transition: TransitionDriver,
    /// Latest time passed in by the host.
    last_seen: HostTime,
    sink: S,
}

impl<S: TraceSink> core::fmt::Debug for PresentationController<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PresentationController")
            .field("geometry", &self.geometry)
            .field("presented", &self.presented)
            .field("state", &self.state)
            .field("transition", &self.transition.phase())
            .field("overlay", &self.overlay)
            .finish_non_exhaustive()
    }
}

impl PresentationController {
    /// Creates a controller for a presenting context with the given bounds.
    #[must_use]
    pub fn new(presenting_bounds: Size, config: SheetConfig) -> Self {
        Self::with_sink(presenting_bounds, config, NoopSink)
    }
}

impl<S: TraceSink> PresentationController<S> {
    /// Creates a controller that reports to `sink`.
    ///
    /// The presenting bounds are captured once and define the container for
    /// the controller's lifetime. The sheet layer is created at the canonical
    /// half frame with its top-corner mask, but is not attached to the
    /// container until [`presentation_will_begin`](Self::presentation_will_begin).
    #[must_use]
    pub fn with_sink(presenting_bounds: Size, config: SheetConfig, sink: S) -> Self {
        let geometry = SheetGeometry::new(presenting_bounds, &config);
        let mut store = LayerStore::new();
        let container = store.create_layer(geometry.container_rect());
        let half = geometry.half_frame();
        let sheet = store.create_layer(half);
        store.set_clip(sheet, Some(ClipShape::RoundedRect(geometry.corner_mask(half))));

        Self {
            config,
            geometry,
            store,
            container,
            sheet,
            overlay: None,
            presented: false,
            state: ScaleState::Half,
            gesture: GestureStateMachine::new(),
            transition: TransitionDriver::new(config.transition),
            last_seen: HostTime::default(),
            sink,
        }
    }

    // -- Host lifecycle --

    /// Starts a presentation episode.
    ///
    /// Attaches the sheet at the half frame and inserts the overlay behind it
    /// at opacity zero, targeting the configured overlay opacity. An overlay
    /// kept from a cancelled dismissal is reused rather than duplicated.
    pub fn presentation_will_begin(&mut self) {
        if self.store.parent(self.sheet).is_none() {
            self.store.add_child(self.container, self.sheet);
        }
        self.reset_motion();
        self.apply_sheet_frame(self.geometry.half_frame(), FrameSource::Reset);

        let kind = if self.overlay.is_some() {
            OverlayEventKind::Reused
        } else {
            self.overlay = Some(Overlay::attach(&mut self.store, self.container, self.sheet));
            OverlayEventKind::Attached
        };
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.fade_to(&self.store, self.config.overlay_opacity);
            let e = OverlayEvent {
                kind,
                layer: overlay.layer(),
            };
            Tracer::new(&mut self.sink).overlay(&e);
        }

        self.presented = true;
        self.trace_lifecycle(LifecycleStage::PresentationWillBegin);
    }

    /// Advances the overlay fade alongside the host's entry or exit
    /// transition. `fraction` runs from `0.0` to `1.0`.
    pub fn update_alongside_transition(&mut self, fraction: f32) {
        if let Some(overlay) = &self.overlay {
            overlay.apply_fade(&mut self.store, fraction);
        }
    }

    /// Finishes the entry transition.
    ///
    /// A cancelled presentation ends the episode: the overlay is released and
    /// the sheet is detached.
    pub fn presentation_did_end(&mut self, completed: bool) {
        if completed {
            self.update_alongside_transition(1.0);
        } else {
            self.end_episode();
        }
        self.trace_lifecycle(LifecycleStage::PresentationDidEnd { completed });
    }

    /// Starts fading the overlay out alongside the host's exit transition.
    pub fn dismissal_will_begin(&mut self) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.fade_to(&self.store, 0.0);
        }
        self.trace_lifecycle(LifecycleStage::DismissalWillBegin);
    }

    /// Finishes the exit transition.
    ///
    /// When `completed`, the overlay is removed and destroyed, the sheet is
    /// detached and all episode state is reset. Otherwise the overlay stays
    /// and returns to its presented opacity; the host may re-present.
    pub fn dismissal_did_end(&mut self, completed: bool) {
        if completed {
            self.end_episode();
        } else if let Some(overlay) = self.overlay.as_mut() {
            overlay.revert_fade(&mut self.store);
        }
        self.trace_lifecycle(LifecycleStage::DismissalDidEnd { completed });
    }

    // -- Input --

    /// Handles a tap on the overlay.
    ///
    /// Returns `None` when nothing is presented.
    pub fn handle_tap_outside(&mut self) -> Option<DismissRequest> {
        if !self.presented {
            return None;
        }
        Some(self.dismiss_request(DismissSource::TapOutside))
    }

    /// Handles one drag sample and returns the outcome the controller acted
    /// on.
    ///
    /// The sample is measured from the target of an in-flight transition, or
    /// from the committed state when none is running.
    ///
    /// A [`DragOutcome::Dismiss`] result is a request for the host to dismiss
    /// the sheet. A live frame computed while a transition is in flight is
    /// not applied and is reported as [`DragOutcome::Ignored`].
    pub fn handle_drag(&mut self, sample: &DragSample, now: HostTime) -> DragOutcome {
        if !self.presented {
            return DragOutcome::Ignored;
        }
        self.last_seen = now;

        let state = self.effective_state();
        let mut outcome = self.gesture.handle(sample, state, &self.geometry);
        match outcome {
            DragOutcome::Frame(frame) => {
                if self.transition.is_animating() {
                    outcome = DragOutcome::Ignored;
                } else {
                    self.apply_sheet_frame(frame, FrameSource::Drag);
                }
            }
            DragOutcome::Transition(target) => self.transition_to(target, now),
            DragOutcome::Dismiss => {
                let source = if sample.phase == DragPhase::Ended {
                    DismissSource::DragEnded
                } else {
                    DismissSource::DraggedPastThreshold
                };
                let _ = self.dismiss_request(source);
            }
            DragOutcome::Ignored => {}
        }

        let e = DragEvent {
            at: now,
            phase: sample.phase,
            translation_y: sample.translation_y,
            velocity_y: sample.velocity_y,
            state,
            outcome,
        };
        Tracer::new(&mut self.sink).drag(&e);
        outcome
    }

    /// Expands the sheet outside the drag flow (e.g. a "see more" button in
    /// the presented content). Does nothing when not presented.
    pub fn maximize(&mut self, now: HostTime) {
        if self.presented {
            self.last_seen = now;
            self.transition_to(ScaleState::Expanded, now);
        }
    }

    /// Advances the in-flight transition to `now`.
    ///
    /// Returns the newly committed state when a transition settles. A pending
    /// request starts immediately after, from the settled frame.
    pub fn tick(&mut self, now: HostTime) -> Option<ScaleState> {
        self.last_seen = now;
        let step = self.transition.advance(now)?;
        self.apply_sheet_frame(step.frame, FrameSource::Animation);
        if !step.settled {
            return None;
        }

        self.state = step.target;
        self.trace_transition(now, TransitionEventKind::Settled, step.target);

        if let Some(next) = self.transition.take_queued() {
            self.transition_to(next, now);
        }
        Some(step.target)
    }

    // -- Queries --

    /// Returns whether the sheet is presented and expanded.
    #[must_use]
    pub fn is_maximized(&self) -> bool {
        self.presented && self.state == ScaleState::Expanded
    }

    /// Returns the committed scale state.
    #[must_use]
    pub const fn scale_state(&self) -> ScaleState {
        self.state
    }

    /// Returns whether a presentation episode is in progress.
    #[must_use]
    pub const fn is_presented(&self) -> bool {
        self.presented
    }

    /// Returns whether a resize animation is in flight.
    #[must_use]
    pub const fn is_transitioning(&self) -> bool {
        self.transition.is_animating()
    }

    /// Returns the transition driver's phase.
    #[must_use]
    pub fn transition_phase(&self) -> TransitionPhase {
        self.transition.phase()
    }

    /// The canonical half-height frame, independent of the live frame.
    ///
    /// This is where the host's layout pass should expect the sheet to sit.
    #[must_use]
    pub fn frame_for_presented_region(&self) -> Rect {
        self.geometry.half_frame()
    }

    /// Returns the sheet's current (live) frame.
    #[must_use]
    pub fn sheet_frame(&self) -> Rect {
        self.store.frame(self.sheet)
    }

    /// Returns the geometry captured at construction.
    #[must_use]
    pub const fn geometry(&self) -> &SheetGeometry {
        &self.geometry
    }

    /// Returns the container layer.
    #[must_use]
    pub const fn container_layer(&self) -> LayerId {
        self.container
    }

    /// Returns the sheet layer. The host binds its presented content here.
    #[must_use]
    pub const fn sheet_layer(&self) -> LayerId {
        self.sheet
    }

    /// Returns the overlay layer, if one exists.
    #[must_use]
    pub fn overlay_layer(&self) -> Option<LayerId> {
        self.overlay.as_ref().map(Overlay::layer)
    }

    /// Returns the scene tree for a [`Presenter`](crate::backend::Presenter).
    #[must_use]
    pub const fn scene(&self) -> &LayerStore {
        &self.store
    }

    /// Evaluates the scene tree and returns what changed since the last call.
    pub fn evaluate(&mut self) -> SceneChanges {
        self.store.evaluate()
    }

    /// Returns the trace sink.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns the trace sink mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the controller and returns its trace sink.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    // -- Internals --

    /// The state drag samples are measured from.
    fn effective_state(&self) -> ScaleState {
        match self.transition.phase() {
            TransitionPhase::Animating(target) => target,
            TransitionPhase::Idle => self.state,
        }
    }

    fn transition_to(&mut self, target: ScaleState, now: HostTime) {
        let from = self.store.frame(self.sheet);
        let to = self.geometry.frame_for(target);
        let kind = match self.transition.request(target, from, to, now) {
            TransitionRequest::Started => TransitionEventKind::Started,
            TransitionRequest::Queued => TransitionEventKind::Queued,
            TransitionRequest::AlreadyInFlight => TransitionEventKind::Coalesced,
        };
        self.trace_transition(now, kind, target);
    }

    /// Writes the sheet frame and recomputes its corner mask to match.
    fn apply_sheet_frame(&mut self, frame: Rect, source: FrameSource) {
        self.store.set_frame(self.sheet, frame);
        let mask = ClipShape::RoundedRect(self.geometry.corner_mask(frame));
        if self.store.clip(self.sheet) != Some(mask) {
            self.store.set_clip(self.sheet, Some(mask));
        }
        Tracer::new(&mut self.sink).sheet_frame(&SheetFrameEvent { source, frame });
    }

    fn dismiss_request(&mut self, source: DismissSource) -> DismissRequest {
        let e = DismissEvent {
            source,
            state: self.state,
        };
        Tracer::new(&mut self.sink).dismiss_request(&e);
        DismissRequest {
            source,
            animated: true,
        }
    }

    /// Drops all per-drag and per-animation state and commits `Half`.
    fn reset_motion(&mut self) {
        if let TransitionPhase::Animating(target) = self.transition.phase() {
            self.trace_transition(self.last_seen, TransitionEventKind::Cancelled, target);
        }
        self.transition.cancel();
        self.gesture.reset();
        self.state = ScaleState::Half;
    }

    /// Releases everything owned by the current episode.
    fn end_episode(&mut self) {
        if let Some(overlay) = self.overlay.take() {
            let layer = overlay.layer();
            overlay.detach(&mut self.store);
            let e = OverlayEvent {
                kind: OverlayEventKind::Detached,
                layer,
            };
            Tracer::new(&mut self.sink).overlay(&e);
        }
        if self.store.parent(self.sheet).is_some() {
            self.store.remove_from_parent(self.sheet);
        }
        self.reset_motion();
        self.presented = false;
    }

    fn trace_transition(&mut self, at: HostTime, kind: TransitionEventKind, target: ScaleState) {
        let e = TransitionEvent {
            at,
            kind,
            committed: self.state,
            target,
        };
        Tracer::new(&mut self.sink).transition(&e);
    }

    fn trace_lifecycle(&mut self, stage: LifecycleStage) {
        let e = LifecycleEvent {
            stage,
            presented: self.presented,
        };
        Tracer::new(&mut self.sink).lifecycle(&e);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::backend::Presenter;
    use crate::config::TransitionSpec;
    use crate::time::Duration;

    const BOUNDS: Size = Size::new(400.0, 800.0);

    fn presented() -> PresentationController {
        let mut c = PresentationController::new(BOUNDS, SheetConfig::DEFAULT);
        c.presentation_will_begin();
        c.update_alongside_transition(1.0);
        c.presentation_did_end(true);
        c
    }

    /// Ticks past the transition duration and returns the settled state.
    fn settle(c: &mut PresentationController, now: HostTime) -> Option<ScaleState> {
        c.tick(now + Duration::from_millis(800))
    }

    fn expanded() -> PresentationController {
        let mut c = presented();
        c.maximize(HostTime(0));
        assert_eq!(settle(&mut c, HostTime(0)), Some(ScaleState::Expanded));
        c
    }

    #[test]
    fn construction_prepares_detached_half_sheet() {
        let c = PresentationController::new(BOUNDS, SheetConfig::DEFAULT);
        assert!(!c.is_presented());
        assert_eq!(c.scale_state(), ScaleState::Half);
        assert_eq!(c.sheet_frame(), Rect::new(0.0, 200.0, 400.0, 800.0));
        assert_eq!(c.scene().parent(c.sheet_layer()), None);
        assert!(matches!(
            c.scene().clip(c.sheet_layer()),
            Some(ClipShape::RoundedRect(_))
        ));
    }

    #[test]
    fn presentation_inserts_overlay_behind_sheet() {
        let mut c = PresentationController::new(BOUNDS, SheetConfig::DEFAULT);
        c.presentation_will_begin();

        let overlay = c.overlay_layer().expect("overlay exists while presented");
        let kids: Vec<_> = c.scene().children(c.container_layer()).collect();
        assert_eq!(kids, [overlay, c.sheet_layer()]);
        assert_eq!(c.scene().opacity(overlay), 0.0);

        c.update_alongside_transition(0.5);
        assert!((c.scene().opacity(overlay) - 0.3).abs() < 1e-6);
        c.presentation_did_end(true);
        assert!((c.scene().opacity(overlay) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn frame_for_presented_region_ignores_live_state() {
        let mut c = expanded();
        assert_eq!(
            c.frame_for_presented_region(),
            Rect::new(0.0, 200.0, 400.0, 800.0)
        );
        let _ = c.handle_drag(&DragSample::changed(30.0, 5.0), HostTime(900_000_000));
        assert_eq!(
            c.frame_for_presented_region(),
            Rect::new(0.0, 200.0, 400.0, 800.0)
        );
    }

    #[test]
    fn snap_to_expand_above_top() {
        let mut c = presented();
        let outcome = c.handle_drag(&DragSample::changed(-250.0, -800.0), HostTime(0));
        assert_eq!(outcome, DragOutcome::Transition(ScaleState::Expanded));
        assert_eq!(
            c.scale_state(),
            ScaleState::Half,
            "state commits only after the animation"
        );
        assert!(!c.is_maximized());

        assert_eq!(settle(&mut c, HostTime(0)), Some(ScaleState::Expanded));
        assert!(c.is_maximized());
        assert_eq!(c.sheet_frame(), Rect::new(0.0, 40.0, 400.0, 800.0));
    }

    #[test]
    fn dismiss_threshold_requests_dismissal_without_moving_sheet() {
        let mut c = presented();
        let before = c.sheet_frame();
        let outcome = c.handle_drag(&DragSample::changed(500.0, 300.0), HostTime(0));
        assert_eq!(outcome, DragOutcome::Dismiss);
        assert_eq!(c.sheet_frame(), before);
        assert!(!c.is_transitioning());
    }

    #[test]
    fn live_band_applies_frame_directly() {
        let mut c = presented();
        let outcome = c.handle_drag(&DragSample::changed(100.0, 20.0), HostTime(0));
        assert_eq!(
            outcome,
            DragOutcome::Frame(Rect::new(0.0, 300.0, 400.0, 800.0))
        );
        let frame = c.sheet_frame();
        assert_eq!(frame.y0, 300.0);
        assert_eq!(frame.height(), 500.0);
        assert!(!c.is_transitioning());
        assert_eq!(c.scale_state(), ScaleState::Half);
    }

    #[test]
    fn corner_mask_tracks_live_frame() {
        let mut c = presented();
        let _ = c.handle_drag(&DragSample::changed(100.0, 20.0), HostTime(0));
        let Some(ClipShape::RoundedRect(mask)) = c.scene().clip(c.sheet_layer()) else {
            panic!("sheet should carry a rounded mask");
        };
        assert_eq!(mask.rect(), Rect::new(0.0, 0.0, 400.0, 500.0));
        assert_eq!(mask.radii().top_left, 10.0);
        assert_eq!(mask.radii().bottom_left, 0.0);
    }

    #[test]
    fn upward_release_expands_from_half() {
        let mut c = presented();
        let _ = c.handle_drag(&DragSample::began(), HostTime(0));
        let _ = c.handle_drag(&DragSample::changed(-50.0, -120.0), HostTime(0));
        let outcome = c.handle_drag(&DragSample::ended(-50.0), HostTime(10));
        assert_eq!(outcome, DragOutcome::Transition(ScaleState::Expanded));
        assert_eq!(settle(&mut c, HostTime(10)), Some(ScaleState::Expanded));
    }

    #[test]
    fn upward_release_keeps_expanded() {
        let mut c = expanded();
        let t = HostTime::from_millis(1_000);
        let _ = c.handle_drag(&DragSample::began(), t);
        let _ = c.handle_drag(&DragSample::changed(20.0, -3.0), t);
        let outcome = c.handle_drag(&DragSample::ended(20.0), t);
        assert_eq!(outcome, DragOutcome::Transition(ScaleState::Expanded));
        assert_eq!(settle(&mut c, t), Some(ScaleState::Expanded));
        assert_eq!(c.sheet_frame(), c.geometry().expanded_frame());
    }

    #[test]
    fn downward_release_from_expanded_steps_to_half() {
        let mut c = expanded();
        let t = HostTime::from_millis(1_000);
        let _ = c.handle_drag(&DragSample::began(), t);
        let _ = c.handle_drag(&DragSample::changed(80.0, 40.0), t);
        let outcome = c.handle_drag(&DragSample::ended(80.0), t);
        assert_eq!(outcome, DragOutcome::Transition(ScaleState::Half));
        assert!(c.is_maximized(), "still expanded until the animation settles");

        assert_eq!(settle(&mut c, t), Some(ScaleState::Half));
        assert!(!c.is_maximized());
        assert_eq!(c.sheet_frame(), c.frame_for_presented_region());
    }

    #[test]
    fn downward_release_from_half_dismisses() {
        let mut c = presented();
        let _ = c.handle_drag(&DragSample::began(), HostTime(0));
        let _ = c.handle_drag(&DragSample::changed(60.0, 30.0), HostTime(0));
        let outcome = c.handle_drag(&DragSample::ended(60.0), HostTime(0));
        assert_eq!(outcome, DragOutcome::Dismiss);
    }

    #[test]
    fn tap_outside_dismisses_only_while_presented() {
        let mut c = PresentationController::new(BOUNDS, SheetConfig::DEFAULT);
        assert_eq!(c.handle_tap_outside(), None);

        c.presentation_will_begin();
        assert_eq!(
            c.handle_tap_outside(),
            Some(DismissRequest {
                source: DismissSource::TapOutside,
                animated: true,
            })
        );
    }

    #[test]
    fn input_is_skipped_when_not_presented() {
        let mut c = PresentationController::new(BOUNDS, SheetConfig::DEFAULT);
        let before = c.sheet_frame();
        assert_eq!(
            c.handle_drag(&DragSample::changed(100.0, 1.0), HostTime(0)),
            DragOutcome::Ignored
        );
        c.maximize(HostTime(0));
        assert!(!c.is_transitioning());
        assert_eq!(c.tick(HostTime::from_millis(900)), None);
        assert_eq!(c.sheet_frame(), before);
    }

    #[test]
    fn completed_dismissal_resets_episode() {
        let mut c = expanded();
        let overlay = c.overlay_layer().unwrap();

        c.dismissal_will_begin();
        c.update_alongside_transition(0.5);
        assert!((c.scene().opacity(overlay) - 0.3).abs() < 1e-6);
        c.dismissal_did_end(true);

        assert!(!c.is_maximized());
        assert!(!c.is_presented());
        assert_eq!(c.overlay_layer(), None);
        assert!(!c.scene().is_alive(overlay));
        assert_eq!(c.scene().parent(c.sheet_layer()), None);
        assert_eq!(c.scene().live_count(), 2, "only container and sheet remain");

        c.presentation_will_begin();
        assert_eq!(c.scale_state(), ScaleState::Half);
        assert_eq!(c.sheet_frame(), c.frame_for_presented_region());
        assert!(!c.is_maximized());
        let fresh = c.overlay_layer().unwrap();
        assert_ne!(fresh, overlay, "a new overlay is created for the new episode");
    }

    #[test]
    fn cancelled_dismissal_keeps_overlay() {
        let mut c = presented();
        let overlay = c.overlay_layer().unwrap();
        c.dismissal_will_begin();
        c.update_alongside_transition(0.8);
        c.dismissal_did_end(false);

        assert!(c.is_presented());
        assert_eq!(c.overlay_layer(), Some(overlay));
        assert!((c.scene().opacity(overlay) - 0.6).abs() < 1e-6);

        c.presentation_will_begin();
        assert_eq!(c.overlay_layer(), Some(overlay), "overlay is reused");
        let kids: Vec<_> = c.scene().children(c.container_layer()).collect();
        assert_eq!(kids.len(), 2, "no duplicate overlay");
    }

    #[test]
    fn cancelled_presentation_releases_overlay() {
        let mut c = PresentationController::new(BOUNDS, SheetConfig::DEFAULT);
        c.presentation_will_begin();
        let overlay = c.overlay_layer().unwrap();
        c.presentation_did_end(false);

        assert!(!c.is_presented());
        assert_eq!(c.overlay_layer(), None);
        assert!(!c.scene().is_alive(overlay));
    }

    #[test]
    fn live_frames_are_dropped_while_animating() {
        let mut c = presented();
        c.maximize(HostTime(0));
        let _ = c.tick(HostTime::from_millis(100));
        let animated = c.sheet_frame();

        let outcome = c.handle_drag(
            &DragSample::changed(50.0, 10.0),
            HostTime::from_millis(110),
        );
        assert_eq!(outcome, DragOutcome::Ignored);
        assert_eq!(c.sheet_frame(), animated);
    }

    #[test]
    fn repeated_request_mid_animation_is_coalesced() {
        let mut c = presented();
        c.maximize(HostTime(0));
        let _ = c.tick(HostTime::from_millis(200));

        // Upward release while Expanded is already in flight.
        let _ = c.handle_drag(&DragSample::changed(10.0, -1.0), HostTime::from_millis(210));
        let _ = c.handle_drag(&DragSample::ended(10.0), HostTime::from_millis(220));
        assert_eq!(c.transition_phase(), TransitionPhase::Animating(ScaleState::Expanded));

        assert_eq!(c.tick(HostTime::from_millis(800)), Some(ScaleState::Expanded));
        assert!(!c.is_transitioning(), "nothing was queued");
    }

    #[test]
    fn latest_queued_request_wins() {
        let mut c = presented();
        c.maximize(HostTime(0));
        // Expanded is in flight; drive the committed state to Expanded first
        // so a Half request is meaningful.
        assert_eq!(settle(&mut c, HostTime(0)), Some(ScaleState::Expanded));

        let t = HostTime::from_millis(1_000);
        let _ = c.handle_drag(&DragSample::changed(30.0, 5.0), t);
        let _ = c.handle_drag(&DragSample::ended(30.0), t);
        assert_eq!(c.transition_phase(), TransitionPhase::Animating(ScaleState::Half));

        c.maximize(t + Duration::from_millis(10));
        assert_eq!(
            c.transition_phase(),
            TransitionPhase::Animating(ScaleState::Half),
            "maximize is queued behind the in-flight animation"
        );

        assert_eq!(c.tick(t + Duration::from_millis(800)), Some(ScaleState::Half));
        assert_eq!(c.transition_phase(), TransitionPhase::Animating(ScaleState::Expanded));
        assert_eq!(
            c.tick(t + Duration::from_millis(1_600)),
            Some(ScaleState::Expanded)
        );
        assert!(c.is_maximized());
    }

    #[test]
    fn instant_transitions_commit_on_next_tick() {
        let config = SheetConfig::DEFAULT.with_transition(TransitionSpec::INSTANT);
        let mut c = PresentationController::new(BOUNDS, config);
        c.presentation_will_begin();
        c.maximize(HostTime(5));
        assert_eq!(c.tick(HostTime(5)), Some(ScaleState::Expanded));
    }

    #[test]
    fn other_phase_does_nothing() {
        let mut c = presented();
        let before = c.sheet_frame();
        let outcome = c.handle_drag(
            &DragSample::new(DragPhase::Other, 300.0, 300.0),
            HostTime(0),
        );
        assert_eq!(outcome, DragOutcome::Ignored);
        assert_eq!(c.sheet_frame(), before);
    }

    /// Deterministic sample stream; checks invariants after every sample.
    #[test]
    fn invariants_hold_under_arbitrary_samples() {
        let mut c = presented();
        let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;
        let mut next = || {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            seed >> 33
        };

        let mut now = HostTime(0);
        for _ in 0..2_000 {
            let phase = match next() % 6 {
                0 => DragPhase::Began,
                1 | 2 | 3 => DragPhase::Changed,
                4 => DragPhase::Ended,
                _ => DragPhase::Other,
            };
            let translation = (next() % 1_200) as f64 - 600.0;
            let velocity = (next() % 400) as f64 - 200.0;
            now = now + Duration::from_millis(next() % 120);

            let outcome = c.handle_drag(&DragSample::new(phase, translation, velocity), now);
            let _ = c.tick(now);

            if let DragOutcome::Frame(frame) = outcome {
                assert!(frame.y0 > 0.0, "applied frame above the container: {frame:?}");
                assert!(frame.y0 <= c.geometry().dismiss_threshold());
            }
            assert_eq!(
                c.is_maximized(),
                c.scale_state() == ScaleState::Expanded,
                "maximized flag tracks the committed state"
            );
            assert!(c.sheet_frame().y0 >= 0.0);
        }
    }

    #[test]
    fn release_mid_expand_is_judged_against_target() {
        let mut c = presented();
        let snap = c.handle_drag(&DragSample::changed(-250.0, -800.0), HostTime(0));
        assert_eq!(snap, DragOutcome::Transition(ScaleState::Expanded));
        assert_eq!(c.tick(HostTime::from_millis(100)), None);

        let _ = c.handle_drag(
            &DragSample::changed(-150.0, 20.0),
            HostTime::from_millis(110),
        );
        let release = c.handle_drag(&DragSample::ended(-150.0), HostTime::from_millis(120));
        assert_eq!(
            release,
            DragOutcome::Transition(ScaleState::Half),
            "a downward release while expanding steps back instead of dismissing"
        );

        assert_eq!(c.tick(HostTime::from_millis(800)), Some(ScaleState::Expanded));
        assert_eq!(c.transition_phase(), TransitionPhase::Animating(ScaleState::Half));
        assert_eq!(c.tick(HostTime::from_millis(1_600)), Some(ScaleState::Half));
        assert!(c.is_presented());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn dropped_animation_is_reported_as_cancelled() {
        #[derive(Default)]
        struct Kinds(Vec<(TransitionEventKind, ScaleState)>);

        impl TraceSink for Kinds {
            fn on_transition(&mut self, e: &TransitionEvent) {
                self.0.push((e.kind, e.target));
            }
        }

        let mut c =
            PresentationController::with_sink(BOUNDS, SheetConfig::DEFAULT, Kinds::default());
        c.presentation_will_begin();
        c.maximize(HostTime::from_millis(10));
        let _ = c.tick(HostTime::from_millis(50));
        c.dismissal_will_begin();
        c.dismissal_did_end(true);

        assert_eq!(
            c.sink().0,
            [
                (TransitionEventKind::Started, ScaleState::Expanded),
                (TransitionEventKind::Cancelled, ScaleState::Expanded),
            ]
        );

        c.presentation_will_begin();
        c.dismissal_did_end(true);
        assert_eq!(c.sink().0.len(), 2, "nothing to cancel when idle");
    }

    #[derive(Default)]
    struct RecordingPresenter {
        frames: Vec<(u32, Rect)>,
        removed: Vec<u32>,
    }

    impl Presenter for RecordingPresenter {
        fn apply(&mut self, store: &LayerStore, changes: &SceneChanges) {
            for &idx in &changes.frames {
                self.frames.push((idx, store.world_frame_at(idx)));
            }
            self.removed.extend_from_slice(&changes.removed);
        }
    }

    #[test]
    fn presenter_sees_sheet_and_overlay_changes() {
        let mut c = presented();
        let mut presenter = RecordingPresenter::default();
        let changes = c.evaluate();
        presenter.apply(c.scene(), &changes);

        let sheet = c.sheet_layer().index();
        assert!(presenter.frames.iter().any(|&(idx, _)| idx == sheet));

        let _ = c.handle_drag(&DragSample::changed(100.0, 20.0), HostTime(0));
        let changes = c.evaluate();
        presenter.apply(c.scene(), &changes);
        assert_eq!(
            presenter.frames.last(),
            Some(&(sheet, Rect::new(0.0, 300.0, 400.0, 800.0)))
        );

        let overlay = c.overlay_layer().unwrap().index();
        c.dismissal_will_begin();
        c.dismissal_did_end(true);
        let changes = c.evaluate();
        presenter.apply(c.scene(), &changes);
        assert_eq!(presenter.removed, [overlay]);
    }
}
