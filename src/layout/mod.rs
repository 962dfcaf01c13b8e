//! Layout - resolving a frame tree into rectangles.
//!
//! The solver sits behind [`LayoutResolver`] so the loop never depends on a
//! particular engine. [`TaffyLayout`] is the default.
//!
//! Component wrapper nodes are transparent: a wrapper's rectangle is always
//! the rectangle of the element it rendered.

mod taffy_bridge;
pub mod text_measure;

pub use taffy_bridge::TaffyLayout;

use crate::error::Result;
use crate::pipeline::FrameTree;
use crate::types::Rect;

/// Absolute rectangle per frame node, indexed like the tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutMap {
    rects: Vec<Rect>,
}

impl LayoutMap {
    pub fn new(rects: Vec<Rect>) -> Self {
        Self { rects }
    }

    /// A map where every node has an empty rect at the origin.
    pub fn empty(len: usize) -> Self {
        Self {
            rects: vec![Rect::default(); len],
        }
    }

    pub fn rect(&self, idx: usize) -> Rect {
        self.rects.get(idx).copied().unwrap_or_default()
    }

    pub fn set(&mut self, idx: usize, rect: Rect) {
        if idx >= self.rects.len() {
            self.rects.resize(idx + 1, Rect::default());
        }
        self.rects[idx] = rect;
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// Turns a frame tree into a rectangle per node.
pub trait LayoutResolver {
    fn resolve(&mut self, tree: &FrameTree, area: Rect) -> Result<LayoutMap>;
}
