// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture-driven half-height modal sheet presentation.
//!
//! `halfsheet_core` models a secondary surface that slides up to cover the
//! lower part of its host, can be dragged to full height or back, and is
//! dismissed by dragging down or tapping the shade behind it. It is `no_std`
//! compatible (with `alloc`) and never touches native views: the host feeds
//! in lifecycle callbacks, drag samples and display ticks, and reads back a
//! small retained scene tree.
//!
//! # Architecture
//!
//! ```text
//!   Host recognizer ──► DragSample ──► GestureStateMachine ──► DragOutcome
//!                                                                  │
//!                 ┌────────────────────────────────────────────────┘
//!                 ▼
//!   PresentationController ──► TransitionDriver (tick) ──► committed ScaleState
//!                 │
//!                 ▼
//!   LayerStore::evaluate() ──► SceneChanges ──► Presenter::apply()
//! ```
//!
//! **[`controller`]**: [`PresentationController`](controller::PresentationController)
//! owns one presentation episode: scene tree, committed state, drag
//! interpretation, resize animation and overlay lifecycle.
//!
//! **[`gesture`]**: pure interpretation of drag samples against the
//! committed state and the sheet geometry.
//!
//! **[`geometry`]**: canonical half and expanded frames, the dismiss
//! threshold, candidate frames and the top-corner mask.
//!
//! **[`transition`]**: the `{Idle, Animating(target)}` resize driver with a
//! single pending slot and a critically damped spring by default.
//!
//! **[`overlay`]**: the dimming layer behind the sheet, scoped to one
//! episode.
//!
//! **[`layer`]**: struct-of-arrays layer tree with generational handles.
//! **[`dirty`]**: its change channels, tracked with `understory_dirty`.
//!
//! **[`backend`]**: the [`Presenter`](backend::Presenter) trait hosts
//! implement to mirror the scene tree.
//!
//! **[`capability`]**: traits that let presented content expand its own
//! sheet.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) and event types, with the
//! zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod backend;
pub mod capability;
pub mod config;
pub mod controller;
pub mod dirty;
pub mod geometry;
pub mod gesture;
pub mod layer;
pub mod overlay;
pub mod time;
pub mod trace;
pub mod transition;
