// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene evaluation.
//!
//! Frames and opacities are inherited, so the affected set of each channel
//! (the marked layers plus their dependents) is recomputed shallowest first:
//! a layer's world frame is its local frame offset by the parent's world
//! origin, and its effective opacity is its own opacity times the parent's.
//! Clips are local and only reported.

use alloc::vec::Vec;

use kurbo::Vec2;
use understory_dirty::Channel;

use super::store::LayerStore;
use crate::dirty;

/// What one [`LayerStore::evaluate`] call changed, as raw slot indices.
///
/// Read values back with [`LayerStore::world_frame_at`],
/// [`LayerStore::effective_opacity_at`] and [`LayerStore::clip_at`].
#[derive(Clone, Debug, Default)]
pub struct SceneChanges {
    /// Layers whose world frame was recomputed.
    pub frames: Vec<u32>,
    /// Layers whose effective opacity was recomputed.
    pub opacities: Vec<u32>,
    /// Layers whose clip changed.
    pub clips: Vec<u32>,
    /// Layers created since the last evaluate.
    pub added: Vec<u32>,
    /// Layers destroyed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether any layer was created, destroyed, attached or detached.
    pub topology_changed: bool,
}

impl SceneChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.opacities.clear();
        self.clips.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
            && self.opacities.is_empty()
            && self.clips.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl LayerStore {
    /// Recomputes dirty properties and returns what changed.
    pub fn evaluate(&mut self) -> SceneChanges {
        let mut changes = SceneChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), reusing a caller-provided buffer.
    pub fn evaluate_into(&mut self, changes: &mut SceneChanges) {
        changes.clear();

        changes.frames = self.drain_shallowest_first(dirty::FRAME);
        for &idx in &changes.frames {
            let offset = self.nodes[idx as usize]
                .parent
                .map_or(Vec2::ZERO, |p| {
                    self.nodes[p as usize].world_frame.origin().to_vec2()
                });
            let node = &mut self.nodes[idx as usize];
            node.world_frame = node.frame + offset;
        }

        changes.opacities = self.drain_shallowest_first(dirty::OPACITY);
        for &idx in &changes.opacities {
            let inherited = self.nodes[idx as usize]
                .parent
                .map_or(1.0, |p| self.nodes[p as usize].effective_opacity);
            let node = &mut self.nodes[idx as usize];
            node.effective_opacity = inherited * node.opacity;
        }

        changes.clips = self
            .dirty
            .drain(dirty::CLIP)
            .deterministic()
            .run()
            .filter(|&idx| self.nodes[idx as usize].alive)
            .collect();

        changes.topology_changed = core::mem::take(&mut self.topology_changed);
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    fn drain_shallowest_first(&mut self, channel: Channel) -> Vec<u32> {
        let affected: Vec<u32> = self
            .dirty
            .drain(channel)
            .affected()
            .deterministic()
            .run()
            .collect();
        let mut drained: Vec<(usize, u32)> = affected
            .into_iter()
            .filter(|&idx| self.nodes[idx as usize].alive)
            .map(|idx| (self.depth(idx), idx))
            .collect();
        drained.sort_unstable();
        drained.into_iter().map(|(_, idx)| idx).collect()
    }

    fn depth(&self, mut idx: u32) -> usize {
        let mut depth = 0;
        while let Some(p) = self.nodes[idx as usize].parent {
            depth += 1;
            idx = p;
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::layer::ClipShape;

    #[test]
    fn world_frame_offsets_by_parent_origin() {
        let mut store = LayerStore::new();
        let container = store.create_layer(Rect::new(0.0, 20.0, 400.0, 820.0));
        let sheet = store.create_layer(Rect::new(0.0, 200.0, 400.0, 800.0));
        store.add_child(container, sheet);

        let _ = store.evaluate();
        assert_eq!(
            store.world_frame(sheet),
            Rect::new(0.0, 220.0, 400.0, 820.0)
        );
    }

    #[test]
    fn moving_parent_moves_child() {
        let mut store = LayerStore::new();
        let container = store.create_layer(Rect::new(0.0, 0.0, 400.0, 800.0));
        let sheet = store.create_layer(Rect::new(0.0, 200.0, 400.0, 800.0));
        store.add_child(container, sheet);
        let _ = store.evaluate();

        store.set_frame(container, Rect::new(10.0, 0.0, 410.0, 800.0));
        let changes = store.evaluate();
        assert_eq!(changes.frames, [container.index(), sheet.index()]);
        assert_eq!(store.world_frame(sheet).x0, 10.0);
        assert_eq!(store.world_frame_at(sheet.index()).y0, 200.0);
    }

    #[test]
    fn effective_opacity_multiplies() {
        let mut store = LayerStore::new();
        let container = store.create_layer(Rect::new(0.0, 0.0, 400.0, 800.0));
        let overlay = store.create_layer(Rect::new(0.0, 0.0, 400.0, 800.0));
        store.add_child(container, overlay);
        store.set_opacity(container, 0.5);
        store.set_opacity(overlay, 0.6);

        let _ = store.evaluate();
        assert!((store.effective_opacity(overlay) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn detached_sheet_loses_parent_offset() {
        let mut store = LayerStore::new();
        let container = store.create_layer(Rect::new(0.0, 20.0, 400.0, 820.0));
        let sheet = store.create_layer(Rect::new(0.0, 200.0, 400.0, 800.0));
        store.add_child(container, sheet);
        let _ = store.evaluate();

        store.remove_from_parent(sheet);
        let changes = store.evaluate();
        assert!(changes.topology_changed);
        assert_eq!(changes.frames, [sheet.index()]);
        assert_eq!(store.world_frame(sheet).y0, 200.0);
    }

    #[test]
    fn second_evaluate_is_empty() {
        let mut store = LayerStore::new();
        let _root = store.create_layer(Rect::new(0.0, 0.0, 1.0, 1.0));
        let _ = store.evaluate();
        assert!(store.evaluate().is_empty());
    }

    #[test]
    fn lifecycle_lists_report_added_and_removed() {
        let mut store = LayerStore::new();
        let root = store.create_layer(Rect::new(0.0, 0.0, 1.0, 1.0));
        let overlay = store.create_layer(Rect::new(0.0, 0.0, 1.0, 1.0));
        store.add_child(root, overlay);
        let first = store.evaluate();
        assert_eq!(first.added, [root.index(), overlay.index()]);

        store.set_opacity(overlay, 0.4);
        store.destroy_layer(overlay);
        let second = store.evaluate();
        assert_eq!(second.removed, [overlay.index()]);
        assert!(second.topology_changed);
        assert!(second.opacities.is_empty(), "destroyed layers are skipped");
    }

    #[test]
    fn clip_changes_are_local() {
        let mut store = LayerStore::new();
        let container = store.create_layer(Rect::ZERO);
        let sheet = store.create_layer(Rect::ZERO);
        store.add_child(container, sheet);
        let _ = store.evaluate();

        let clip = ClipShape::Rect(Rect::new(0.0, 0.0, 5.0, 5.0));
        store.set_clip(container, Some(clip));
        let changes = store.evaluate();
        assert_eq!(changes.clips, [container.index()]);
        assert_eq!(store.clip_at(container.index()), Some(clip));
        assert_eq!(store.clip(sheet), None);
    }
}
