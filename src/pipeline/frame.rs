//! Frame tree - one frame's elements flattened into indexed nodes.
//!
//! Building happens in two stages so focus can be resolved in between:
//!
//! ```text
//! Element tree ──materialize──> FrameTree (components are empty wrappers)
//!                                   │
//!                          FocusRegistry::rebuild
//!                                   │
//!              ──expand_components──> FrameTree (each wrapper holds render(focused))
//! ```
//!
//! Lazy thunks run during materialization, exactly once. Components reached
//! only through another component's output render unfocused and never join
//! the focus ring; focus handles inside component output are dropped.

use std::collections::VecDeque;

use tracing::warn;

use crate::engine::{ComponentId, Components};
use crate::primitives::{
    ContainerKind, Element, FloatGeometry, KeyCallback, MouseCallback, ResizeCallback,
};
use crate::state::focus::{FocusHandle, FocusRegistry};
use crate::types::{Constraint, Style};

// =============================================================================
// Nodes
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    Text(String),
    Container(ContainerKind),
    /// Transparent wrapper around a component's rendered output.
    Component(ComponentId),
}

pub struct FrameNode {
    pub content: NodeContent,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub depth: u16,
    /// Position in depth-first pre-order.
    pub order: usize,
    pub style: Style,
    pub constraint: Option<Constraint>,
    pub title: Option<String>,
    pub float: Option<FloatGeometry>,
    pub focus: Option<FocusHandle>,
    pub on_key: Option<KeyCallback>,
    pub on_mouse: Option<MouseCallback>,
    pub on_resize: Option<ResizeCallback>,
}

impl FrameNode {
    fn new(content: NodeContent, parent: Option<usize>, depth: u16) -> Self {
        Self {
            content,
            parent,
            children: Vec::new(),
            depth,
            order: 0,
            style: Style::default(),
            constraint: None,
            title: None,
            float: None,
            focus: None,
            on_key: None,
            on_mouse: None,
            on_resize: None,
        }
    }

    pub fn component(&self) -> Option<ComponentId> {
        match self.content {
            NodeContent::Component(id) => Some(id),
            _ => None,
        }
    }

    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self.content {
            NodeContent::Container(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_float(&self) -> bool {
        self.container_kind() == Some(ContainerKind::Float)
    }

    /// Panels and floats draw a one-cell border.
    pub fn has_border(&self) -> bool {
        matches!(
            self.container_kind(),
            Some(ContainerKind::Panel | ContainerKind::Float)
        )
    }
}

// =============================================================================
// FrameTree
// =============================================================================

#[derive(Default)]
pub struct FrameTree {
    nodes: Vec<FrameNode>,
    root: Option<usize>,
    /// Component wrappers still waiting for their output.
    pending: Vec<usize>,
}

impl FrameTree {
    /// First stage: flatten `root`, evaluating lazy thunks. Component nodes
    /// are left empty and carry their focus handle.
    pub fn materialize(root: Element, components: &Components) -> Self {
        let mut tree = Self::default();
        let root = tree.push_element(root, None, 0, components, true);
        tree.root = Some(root);
        tree.renumber();
        tree
    }

    /// Second stage: ask every component for its output and splice it under
    /// the wrapper. Top-level components see their focus state; nested ones
    /// render unfocused. A repeated focus key only focuses its first holder.
    pub fn expand_components(&mut self, components: &Components, focus: &FocusRegistry) {
        let mut claimed = false;
        let mut queue: VecDeque<(usize, bool)> = self
            .pending
            .drain(..)
            .map(|idx| {
                let focused = !claimed
                    && self.nodes[idx]
                        .focus
                        .as_ref()
                        .is_some_and(|handle| focus.is_focused(handle.key.as_str()));
                claimed |= focused;
                (idx, focused)
            })
            .collect();

        while let Some((idx, focused)) = queue.pop_front() {
            let Some(id) = self.nodes[idx].component() else {
                continue;
            };
            if self.has_component_ancestor(idx, id) {
                warn!(component = %id, "component renders itself, skipping");
                continue;
            }
            let Some(component) = components.get(id) else {
                continue;
            };

            let element = component.render(focused);
            let depth = self.nodes[idx].depth + 1;
            let child = self.push_element(element, Some(idx), depth, components, false);
            self.nodes[idx].children.push(child);

            queue.extend(self.pending.drain(..).map(|nested| (nested, false)));
        }

        self.renumber();
    }

    fn push_element(
        &mut self,
        element: Element,
        parent: Option<usize>,
        depth: u16,
        components: &Components,
        top_level: bool,
    ) -> usize {
        match element {
            Element::Lazy(thunk) => {
                self.push_element(thunk.evaluate(), parent, depth, components, top_level)
            }
            Element::Text(text) => {
                let mut node = FrameNode::new(NodeContent::Text(text.content), parent, depth);
                node.style = text.style;
                node.constraint = text.constraint;
                self.push(node)
            }
            Element::Stateful(stateful) => {
                let mut node = FrameNode::new(NodeContent::Component(stateful.id), parent, depth);
                node.constraint = stateful.constraint;
                match components.get(stateful.id) {
                    Some(component) if top_level => {
                        node.focus = Some(FocusHandle {
                            key: stateful.focus_key(),
                            focusable: component.is_focusable(),
                        });
                    }
                    Some(_) => {}
                    None => warn!(component = %stateful.id, "tree references a removed component"),
                }
                let idx = self.push(node);
                self.pending.push(idx);
                idx
            }
            Element::Container(container) => {
                let mut node =
                    FrameNode::new(NodeContent::Container(container.kind), parent, depth);
                node.style = container.style;
                node.constraint = container.constraint;
                node.title = container.title;
                node.float = container.float;
                node.focus = if top_level { container.focus } else { None };
                node.on_key = container.on_key;
                node.on_mouse = container.on_mouse;
                node.on_resize = container.on_resize;
                let idx = self.push(node);

                for child in container.children {
                    let child_idx =
                        self.push_element(child, Some(idx), depth + 1, components, top_level);
                    self.nodes[idx].children.push(child_idx);
                }
                idx
            }
        }
    }

    fn push(&mut self, node: FrameNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn has_component_ancestor(&self, idx: usize, id: ComponentId) -> bool {
        let mut current = self.nodes[idx].parent;
        while let Some(p) = current {
            if self.nodes[p].component() == Some(id) {
                return true;
            }
            current = self.nodes[p].parent;
        }
        false
    }

    fn renumber(&mut self) {
        for (order, idx) in self.traverse().into_iter().enumerate() {
            self.nodes[idx].order = order;
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn root(&self) -> Option<usize> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: usize) -> &FrameNode {
        &self.nodes[idx]
    }

    pub fn nodes(&self) -> &[FrameNode] {
        &self.nodes
    }

    /// Node indices in depth-first pre-order (children left to right).
    pub fn traverse(&self) -> Vec<usize> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.root.into_iter().collect();
        while let Some(idx) = stack.pop() {
            out.push(idx);
            stack.extend(self.nodes[idx].children.iter().rev().copied());
        }
        out
    }

    /// Focus handles in traversal order.
    pub fn focus_handles(&self) -> Vec<FocusHandle> {
        self.traverse()
            .into_iter()
            .filter_map(|idx| self.nodes[idx].focus.clone())
            .collect()
    }

    /// The node registered under a focus key.
    pub fn find_focus(&self, key: &str) -> Option<usize> {
        self.nodes.iter().position(|node| {
            node.focus
                .as_ref()
                .is_some_and(|handle| handle.key.as_str() == key)
        })
    }

    /// `idx` followed by each ancestor up to the root.
    pub fn path(&self, idx: usize) -> Vec<usize> {
        let mut path = vec![idx];
        let mut current = self.nodes[idx].parent;
        while let Some(p) = current {
            path.push(p);
            current = self.nodes[p].parent;
        }
        path
    }

    /// The component whose output is this float, if it is one.
    pub fn float_owner(&self, idx: usize) -> Option<ComponentId> {
        let node = &self.nodes[idx];
        if !node.is_float() {
            return None;
        }
        node.parent.and_then(|p| self.nodes[p].component())
    }

    /// Every component wrapper node in the frame.
    pub fn component_nodes(&self) -> impl Iterator<Item = (usize, ComponentId)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(idx, node)| node.component().map(|id| (idx, id)))
    }
}

// =============================================================================
// Tests
// =============================================================================
