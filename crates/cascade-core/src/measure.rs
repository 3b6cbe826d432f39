//! The seam between the layout algorithm and the host's scene tree.
//!
//! The algorithm never touches node pointers; it measures items through
//! [`ItemSource`] and writes resolved rects back through the same trait.
//! [`ItemArena`] is the reference implementation: a slotmap of nodes
//! addressed by stable keys, suitable for hosts and for tests.

use slotmap::{SlotMap, new_key_type};

use crate::{LayoutContext, Rect};

/// Measurable children of one cascade element, indexed by item index.
pub trait ItemSource {
    /// Total dataset size, footer included.
    fn item_count(&self) -> usize;

    /// Measures the item's main-axis extent given the cross-axis extent of
    /// the track it will occupy.
    fn measure(&mut self, index: usize, cross_extent: f32, ctx: &LayoutContext) -> f32;

    /// Write-back hook for resolved geometry of a materialized item.
    fn place(&mut self, _index: usize, _rect: Rect) {}
}

new_key_type! {
    pub struct NodeKey;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ItemNode {
    pub main_extent: f32,
    pub frame: Rect,
}

/// Slotmap-backed node storage standing in for the external scene tree.
#[derive(Default)]
pub struct ItemArena {
    nodes: SlotMap<NodeKey, ItemNode>,
    order: Vec<NodeKey>,
}

impl ItemArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an arena from fixed main extents, one node per item.
    pub fn from_extents(extents: &[f32]) -> Self {
        let mut arena = Self::new();
        for &e in extents {
            arena.push(e);
        }
        arena
    }

    pub fn push(&mut self, main_extent: f32) -> NodeKey {
        let key = self.nodes.insert(ItemNode {
            main_extent,
            frame: Rect::EMPTY,
        });
        self.order.push(key);
        key
    }

    /// Drops all but the first `len` items, like `Vec::truncate`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.order.len() {
            return;
        }
        for key in self.order.split_off(len) {
            self.nodes.remove(key);
        }
    }

    pub fn key_at(&self, index: usize) -> Option<NodeKey> {
        self.order.get(index).copied()
    }

    pub fn node(&self, key: NodeKey) -> Option<&ItemNode> {
        self.nodes.get(key)
    }

    /// Resolved frame of the item at `index`, as last written back by a
    /// layout pass.
    pub fn frame(&self, index: usize) -> Rect {
        self.key_at(index)
            .and_then(|k| self.nodes.get(k))
            .map_or(Rect::EMPTY, |n| n.frame)
    }
}

impl ItemSource for ItemArena {
    fn item_count(&self) -> usize {
        self.order.len()
    }

    fn measure(&mut self, index: usize, _cross_extent: f32, _ctx: &LayoutContext) -> f32 {
        self.key_at(index)
            .and_then(|k| self.nodes.get(k))
            .map_or(0.0, |n| n.main_extent)
    }

    fn place(&mut self, index: usize, rect: Rect) {
        if let Some(key) = self.key_at(index) {
            if let Some(node) = self.nodes.get_mut(key) {
                node.frame = rect;
            }
        }
    }
}
