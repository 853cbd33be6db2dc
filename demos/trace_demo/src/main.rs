// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted presentation episode that exercises the tracing pipeline.
//!
//! Presents a sheet, drags it around, expands it, steps it back to half
//! height and finally drags it away, ticking at 60 Hz throughout. Events go to
//! a [`PrettyPrintSink`](halfsheet_debug::pretty::PrettyPrintSink) on stdout
//! and a [`TimelineSink`](halfsheet_debug::timeline::TimelineSink), which is
//! exported as a Chrome trace JSON file.

use std::fs::File;
use std::io::BufWriter;

use halfsheet_core::config::SheetConfig;
use halfsheet_core::controller::PresentationController;
use halfsheet_core::gesture::{DragOutcome, DragSample};
use halfsheet_core::time::{Duration, HostTime};
use halfsheet_core::trace::{
    DismissEvent, DragEvent, LifecycleEvent, OverlayEvent, SheetFrameEvent, TraceSink,
    TransitionEvent,
};
use kurbo::Size;

use halfsheet_debug::pretty::PrettyPrintSink;
use halfsheet_debug::timeline::TimelineSink;

/// 16.6ms refresh interval in nanoseconds (≈60 Hz).
const REFRESH_INTERVAL_NS: u64 = 16_666_667;

/// Forwards every event to both sinks.
struct Both {
    pretty: PrettyPrintSink,
    timeline: TimelineSink,
}

impl TraceSink for Both {
    fn on_drag(&mut self, e: &DragEvent) {
        self.pretty.on_drag(e);
        self.timeline.on_drag(e);
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.pretty.on_transition(e);
        self.timeline.on_transition(e);
    }

    fn on_dismiss_request(&mut self, e: &DismissEvent) {
        self.pretty.on_dismiss_request(e);
        self.timeline.on_dismiss_request(e);
    }

    fn on_overlay(&mut self, e: &OverlayEvent) {
        self.pretty.on_overlay(e);
        self.timeline.on_overlay(e);
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.pretty.on_lifecycle(e);
        self.timeline.on_lifecycle(e);
    }

    fn on_sheet_frame(&mut self, e: &SheetFrameEvent) {
        self.pretty.on_sheet_frame(e);
        self.timeline.on_sheet_frame(e);
    }
}

struct Script {
    controller: PresentationController<Both>,
    now: HostTime,
}

impl Script {
    /// Advances one display frame, ticking the controller and flushing the
    /// scene.
    fn frame(&mut self) {
        self.now = self.now + Duration(REFRESH_INTERVAL_NS);
        let _ = self.controller.tick(self.now);
        let _ = self.controller.evaluate();
    }

    fn frames(&mut self, count: u32) {
        for _ in 0..count {
            self.frame();
        }
    }

    /// Runs frames until no resize animation is in flight.
    fn settle(&mut self) {
        while self.controller.is_transitioning() {
            self.frame();
        }
    }

    /// Feeds a full drag: began, `moves` changed samples, ended.
    fn drag(&mut self, moves: &[(f64, f64)]) -> DragOutcome {
        let _ = self.controller.handle_drag(&DragSample::began(), self.now);
        let mut last_translation = 0.0;
        for &(translation, velocity) in moves {
            self.frame();
            let outcome = self
                .controller
                .handle_drag(&DragSample::changed(translation, velocity), self.now);
            if outcome == DragOutcome::Dismiss {
                return outcome;
            }
            last_translation = translation;
        }
        self.frame();
        self.controller
            .handle_drag(&DragSample::ended(last_translation), self.now)
    }

    /// Runs the host's half of an animated transition alongside the
    /// controller's fade.
    fn host_transition(&mut self, steps: u32) {
        for step in 1..=steps {
            self.frame();
            let fraction = step as f32 / steps as f32;
            self.controller.update_alongside_transition(fraction);
        }
    }
}

fn main() {
    let sink = Both {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        timeline: TimelineSink::new(),
    };
    let mut script = Script {
        controller: PresentationController::with_sink(
            Size::new(390.0, 844.0),
            SheetConfig::DEFAULT,
            sink,
        ),
        now: HostTime::from_millis(1_000),
    };

    // -- present -----------------------------------------------------------
    script.controller.presentation_will_begin();
    script.host_transition(20);
    script.controller.presentation_did_end(true);

    // -- nudge down, release upward: expands -------------------------------
    let outcome = script.drag(&[(20.0, 80.0), (45.0, 60.0), (30.0, -90.0)]);
    println!("first drag ended with {outcome:?}");
    script.settle();

    // -- drag down from expanded: steps back to half ------------------------
    let outcome = script.drag(&[(30.0, 120.0), (70.0, 140.0)]);
    println!("second drag ended with {outcome:?}");
    script.settle();

    // -- maximize from content, drag back, change mind mid-animation -------
    script.controller.maximize(script.now);
    script.settle();
    let _ = script.drag(&[(40.0, 100.0)]);
    script.frames(5);
    script.controller.maximize(script.now);
    script.settle();
    println!(
        "after queued transitions: state={} maximized={}",
        script.controller.scale_state().as_str(),
        script.controller.is_maximized(),
    );

    // -- drag far down: dismiss --------------------------------------------
    let outcome = script.drag(&[(150.0, 400.0), (420.0, 900.0)]);
    println!("third drag ended with {outcome:?}");
    if outcome == DragOutcome::Dismiss {
        script.controller.dismissal_will_begin();
        script.host_transition(15);
        script.controller.dismissal_did_end(true);
    }

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let sink = script.controller.into_sink();
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    sink.timeline
        .write_json(&mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({} events)", sink.timeline.events().len());
}
