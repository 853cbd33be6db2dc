// Copyright 2026 the Halfsheet Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer storage: allocation, parent/child links and local properties.

use alloc::vec::Vec;

use kurbo::Rect;
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::clip::ClipShape;
use super::id::LayerId;
use crate::dirty;

/// One slot of the store.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) generation: u32,
    pub(crate) alive: bool,
    pub(crate) parent: Option<u32>,
    /// Back to front.
    pub(crate) children: Vec<u32>,
    pub(crate) frame: Rect,
    pub(crate) opacity: f32,
    pub(crate) clip: Option<ClipShape>,
    pub(crate) world_frame: Rect,
    pub(crate) effective_opacity: f32,
}

impl Node {
    fn fresh(generation: u32, frame: Rect) -> Self {
        Self {
            generation,
            alive: true,
            parent: None,
            children: Vec::new(),
            frame,
            opacity: 1.0,
            clip: None,
            world_frame: frame,
            effective_opacity: 1.0,
        }
    }
}

/// Storage for the presentation's layers: the container, the sheet and the
/// per-episode overlay.
///
/// Slots of destroyed layers are reused. Each reuse bumps the slot's
/// generation, so a handle kept past [`destroy_layer`](Self::destroy_layer)
/// panics instead of addressing the new occupant.
#[derive(Debug)]
pub struct LayerStore {
    pub(crate) nodes: Vec<Node>,
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) topology_changed: bool,
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            topology_changed: false,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    /// Creates a detached layer with the given frame, full opacity and no
    /// clip.
    pub fn create_layer(&mut self, frame: Rect) -> LayerId {
        let mut idx = 0_u32;
        let mut reused = false;
        for (i, node) in (0_u32..).zip(self.nodes.iter_mut()) {
            if !node.alive {
                *node = Node::fresh(node.generation + 1, frame);
                idx = i;
                reused = true;
                break;
            }
            idx = i + 1;
        }
        if !reused {
            self.nodes.push(Node::fresh(0, frame));
        }

        self.pending_added.push(idx);
        self.topology_changed = true;
        self.mark_inherited(idx);
        self.handle_at(idx)
    }

    /// Destroys a layer, detaching it first if it has a parent.
    ///
    /// # Panics
    ///
    /// Panics if the layer has children or the handle is stale.
    pub fn destroy_layer(&mut self, id: LayerId) {
        let i = self.slot(id);
        assert!(
            self.nodes[i].children.is_empty(),
            "cannot destroy layer with children"
        );
        if self.nodes[i].parent.is_some() {
            self.detach(id.idx);
        }
        self.dirty.remove_key(id.idx);
        self.nodes[i].alive = false;
        self.pending_removed.push(id.idx);
        self.topology_changed = true;
    }

    /// Returns whether the handle refers to a live layer.
    #[must_use]
    pub fn is_alive(&self, id: LayerId) -> bool {
        self.nodes
            .get(id.idx as usize)
            .is_some_and(|n| n.alive && n.generation == id.generation)
    }

    /// Returns the number of live layers.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.alive).count()
    }

    /// Adds `child` in front of `parent`'s existing children.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn add_child(&mut self, parent: LayerId, child: LayerId) {
        let p = self.slot(parent);
        self.attachable(child);
        self.nodes[p].children.push(child.idx);
        self.attach(child.idx, parent.idx);
    }

    /// Inserts `child` directly behind `sibling`, under `sibling`'s parent.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale, `child` already has a parent, or
    /// `sibling` has none.
    pub fn insert_before(&mut self, child: LayerId, sibling: LayerId) {
        let s = self.slot(sibling);
        self.attachable(child);
        let Some(p) = self.nodes[s].parent else {
            panic!("sibling has no parent");
        };
        let siblings = &mut self.nodes[p as usize].children;
        let at = siblings
            .iter()
            .position(|&c| c == sibling.idx)
            .unwrap_or(siblings.len());
        siblings.insert(at, child.idx);
        self.attach(child.idx, p);
    }

    /// Detaches `child` from its parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the layer has no parent.
    pub fn remove_from_parent(&mut self, child: LayerId) {
        let c = self.slot(child);
        assert!(self.nodes[c].parent.is_some(), "layer has no parent");
        self.detach(child.idx);
        self.mark_inherited(child.idx);
    }

    /// Returns the parent of a layer, if any.
    #[must_use]
    pub fn parent(&self, id: LayerId) -> Option<LayerId> {
        let i = self.slot(id);
        self.nodes[i].parent.map(|p| self.handle_at(p))
    }

    /// Returns the direct children of a layer, back to front.
    pub fn children(&self, id: LayerId) -> impl Iterator<Item = LayerId> + '_ {
        let i = self.slot(id);
        self.nodes[i].children.iter().map(|&c| self.handle_at(c))
    }

    /// Returns the layer's frame in its parent's coordinates.
    #[must_use]
    pub fn frame(&self, id: LayerId) -> Rect {
        self.nodes[self.slot(id)].frame
    }

    /// Returns the layer's own opacity.
    #[must_use]
    pub fn opacity(&self, id: LayerId) -> f32 {
        self.nodes[self.slot(id)].opacity
    }

    /// Returns the layer's clip shape.
    #[must_use]
    pub fn clip(&self, id: LayerId) -> Option<ClipShape> {
        self.nodes[self.slot(id)].clip
    }

    /// Returns the frame in root coordinates as of the last
    /// [`evaluate`](Self::evaluate).
    #[must_use]
    pub fn world_frame(&self, id: LayerId) -> Rect {
        self.nodes[self.slot(id)].world_frame
    }

    /// Returns the opacity multiplied through all ancestors as of the last
    /// [`evaluate`](Self::evaluate).
    #[must_use]
    pub fn effective_opacity(&self, id: LayerId) -> f32 {
        self.nodes[self.slot(id)].effective_opacity
    }

    /// Sets the layer's frame. Descendants are re-evaluated too.
    pub fn set_frame(&mut self, id: LayerId, frame: Rect) {
        let i = self.slot(id);
        self.nodes[i].frame = frame;
        self.dirty.mark_with(id.idx, dirty::FRAME, &EagerPolicy);
    }

    /// Sets the layer's opacity. Descendants are re-evaluated too.
    pub fn set_opacity(&mut self, id: LayerId, opacity: f32) {
        let i = self.slot(id);
        self.nodes[i].opacity = opacity;
        self.dirty.mark_with(id.idx, dirty::OPACITY, &EagerPolicy);
    }

    /// Sets the layer's clip shape.
    pub fn set_clip(&mut self, id: LayerId, clip: Option<ClipShape>) {
        let i = self.slot(id);
        self.nodes[i].clip = clip;
        self.dirty.mark(id.idx, dirty::CLIP);
    }

    // Presenters read through these with the slot indices in `SceneChanges`.

    /// Returns the world frame at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    #[must_use]
    pub fn world_frame_at(&self, idx: u32) -> Rect {
        self.node_at(idx).world_frame
    }

    /// Returns the effective opacity at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    #[must_use]
    pub fn effective_opacity_at(&self, idx: u32) -> f32 {
        self.node_at(idx).effective_opacity
    }

    /// Returns the clip shape at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    #[must_use]
    pub fn clip_at(&self, idx: u32) -> Option<ClipShape> {
        self.node_at(idx).clip
    }

    fn handle_at(&self, idx: u32) -> LayerId {
        LayerId {
            idx,
            generation: self.nodes[idx as usize].generation,
        }
    }

    fn node_at(&self, idx: u32) -> &Node {
        let len = self.nodes.len();
        self.nodes
            .get(idx as usize)
            .unwrap_or_else(|| panic!("slot index {idx} out of range (len {len})"))
    }

    /// Validates `id` and returns its slot.
    fn slot(&self, id: LayerId) -> usize {
        assert!(self.is_alive(id), "stale LayerId: {id:?}");
        id.idx as usize
    }

    fn attachable(&self, child: LayerId) {
        let c = self.slot(child);
        assert!(
            self.nodes[c].parent.is_none(),
            "child already has a parent"
        );
    }

    /// Links `c` under `p` and wires the inherited channels to follow `p`.
    fn attach(&mut self, c: u32, p: u32) {
        self.nodes[c as usize].parent = Some(p);
        let _ = self.dirty.add_dependency(c, p, dirty::FRAME);
        let _ = self.dirty.add_dependency(c, p, dirty::OPACITY);
        self.mark_inherited(c);
        self.topology_changed = true;
    }

    fn detach(&mut self, c: u32) {
        let Some(p) = self.nodes[c as usize].parent.take() else {
            return;
        };
        self.nodes[p as usize].children.retain(|&k| k != c);
        self.dirty.remove_dependency(c, p, dirty::FRAME);
        self.dirty.remove_dependency(c, p, dirty::OPACITY);
        self.topology_changed = true;
    }

    fn mark_inherited(&mut self, idx: u32) {
        self.dirty.mark_with(idx, dirty::FRAME, &EagerPolicy);
        self.dirty.mark_with(idx, dirty::OPACITY, &EagerPolicy);
    }
}
