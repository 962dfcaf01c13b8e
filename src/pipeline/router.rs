//! Event router - finds the target of an event and walks it outward.
//!
//! Key events go to the focused node, then each ancestor, then the global
//! handlers. Mouse events go to the hit-tested node, then each ancestor,
//! then nowhere. The first `Handled` stops the walk. Resize and tick are
//! broadcasts and never short-circuit.
//!
//! Hit-testing ranks every node whose rectangle contains the point:
//!
//! 1. float layer: inside a higher-z float beats a lower one, any float
//!    beats the normal flow. A float's z is read live from its component's
//!    [`FloatState`](crate::engine::FloatState) so a raise counts before the
//!    next repaint
//! 2. smaller area
//! 3. greater depth
//! 4. later in traversal order
//!
//! Dragging: a left-button Down on the top border row of a float whose
//! component exposes `float_state()` raises it and starts a drag. Drag
//! events move it, Up ends it. All three are consumed.

use std::cmp::Reverse;

use tracing::{debug, trace};

use crate::engine::{ComponentId, Components, EventResult};
use crate::layout::LayoutMap;
use crate::state::event::Event;
use crate::state::global_keys::{GlobalContext, GlobalHandlers};
use crate::state::keyboard::KeyEvent;
use crate::state::mouse::{MouseButton, MouseEvent, MousePhase};

use super::frame::{FrameNode, FrameTree, NodeContent};

/// A laid-out frame: what events are routed against.
#[derive(Default)]
pub struct Frame {
    pub tree: FrameTree,
    pub layout: LayoutMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DragState {
    component: ComponentId,
    grab: (u16, u16),
    origin: (u16, u16),
}

#[derive(Debug, Default)]
pub struct EventRouter {
    drag: Option<DragState>,
    next_z: u32,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// The component being dragged, if any.
    pub fn dragging(&self) -> Option<ComponentId> {
        self.drag.map(|d| d.component)
    }

    /// Dispatch any event kind.
    pub fn route(
        &mut self,
        event: &Event,
        frame: &Frame,
        ctx: &mut GlobalContext<'_>,
        globals: &mut GlobalHandlers,
    ) -> EventResult {
        match event {
            Event::Key(key) => self.route_key(key, &frame.tree, ctx, globals),
            Event::Mouse(mouse) => self.route_mouse(mouse, &frame.tree, &frame.layout, ctx),
            Event::Resize(width, height) => {
                broadcast_resize(&frame.tree, ctx.components, *width, *height);
                EventResult::Unhandled
            }
            Event::Tick(sequence) => {
                deliver_tick(ctx.components, *sequence);
                EventResult::Unhandled
            }
        }
    }

    // =========================================================================
    // Keys
    // =========================================================================

    pub fn route_key(
        &mut self,
        event: &KeyEvent,
        tree: &FrameTree,
        ctx: &mut GlobalContext<'_>,
        globals: &mut GlobalHandlers,
    ) -> EventResult {
        if !event.is_press() {
            return EventResult::Unhandled;
        }

        let focused = ctx.focus.current_focus().cloned();
        if let Some(target) = focused.and_then(|key| tree.find_focus(key.as_str())) {
            for idx in tree.path(target) {
                if offer_key(tree.node(idx), event, ctx.components).is_handled() {
                    trace!(node = idx, "key handled in focus path");
                    return EventResult::Handled;
                }
            }
        }

        globals.dispatch(event, ctx)
    }

    // =========================================================================
    // Mouse
    // =========================================================================

    pub fn route_mouse(
        &mut self,
        event: &MouseEvent,
        tree: &FrameTree,
        layout: &LayoutMap,
        ctx: &mut GlobalContext<'_>,
    ) -> EventResult {
        if let Some(drag) = self.drag {
            match event.phase {
                MousePhase::Drag => {
                    self.drag_to(drag, event, ctx.components);
                    return EventResult::Handled;
                }
                MousePhase::Up => {
                    debug!(component = %drag.component, "drag ended");
                    self.drag = None;
                    return EventResult::Handled;
                }
                // Missed the Up; start over
                MousePhase::Down => self.drag = None,
                _ => {}
            }
        }

        let Some(target) = hit_test(tree, layout, ctx.components, event.x, event.y) else {
            return EventResult::Unhandled;
        };
        let path = tree.path(target);

        if event.phase == MousePhase::Down {
            let focus_key = path.iter().find_map(|&idx| {
                tree.node(idx)
                    .focus
                    .as_ref()
                    .filter(|handle| handle.focusable)
                    .map(|handle| handle.key.clone())
            });
            if let Some(key) = focus_key {
                ctx.focus.focus(key.as_str());
            }

            if event.button == MouseButton::Left
                && self.begin_drag(tree, layout, &path, event, ctx.components)
            {
                return EventResult::Handled;
            }
        }

        for idx in path {
            if offer_mouse(tree.node(idx), event, ctx.components).is_handled() {
                trace!(node = idx, "mouse handled");
                return EventResult::Handled;
            }
        }
        EventResult::Unhandled
    }

    fn begin_drag(
        &mut self,
        tree: &FrameTree,
        layout: &LayoutMap,
        path: &[usize],
        event: &MouseEvent,
        components: &mut Components,
    ) -> bool {
        let Some(&float_idx) = path.iter().find(|&&idx| tree.node(idx).is_float()) else {
            return false;
        };
        let Some(owner) = tree.float_owner(float_idx) else {
            return false;
        };
        if event.y != layout.rect(float_idx).y {
            return false;
        }

        let top = highest_z(components);
        let Some(state) = components.get_mut(owner).and_then(|c| c.float_state()) else {
            return false;
        };

        self.next_z = self.next_z.max(top) + 1;
        state.z = self.next_z;
        self.drag = Some(DragState {
            component: owner,
            grab: (event.x, event.y),
            origin: (state.x, state.y),
        });
        debug!(component = %owner, z = self.next_z, "drag started");
        true
    }

    fn drag_to(&mut self, drag: DragState, event: &MouseEvent, components: &mut Components) {
        let Some(state) = components.get_mut(drag.component).and_then(|c| c.float_state()) else {
            // Component went away mid-drag
            self.drag = None;
            return;
        };
        state.x = offset(drag.origin.0, drag.grab.0, event.x);
        state.y = offset(drag.origin.1, drag.grab.1, event.y);
    }
}

fn offset(origin: u16, grab: u16, now: u16) -> u16 {
    let moved = origin as i32 + now as i32 - grab as i32;
    moved.clamp(0, u16::MAX as i32) as u16
}

fn highest_z(components: &mut Components) -> u32 {
    components
        .ids()
        .into_iter()
        .filter_map(|id| components.get_mut(id).and_then(|c| c.float_state().map(|s| s.z)))
        .max()
        .unwrap_or(0)
}

// =============================================================================
// Hit testing
// =============================================================================

/// Stacking layer of a node: the z of its nearest enclosing float.
fn float_layer(tree: &FrameTree, idx: usize, components: &mut Components) -> Option<u32> {
    let float_idx = tree.path(idx).into_iter().find(|&i| tree.node(i).is_float())?;
    let live = match tree.float_owner(float_idx) {
        Some(owner) => components
            .get_mut(owner)
            .and_then(|c| c.float_state())
            .map(|s| s.z),
        None => None,
    };
    Some(live.unwrap_or_else(|| tree.node(float_idx).float.map(|g| g.z).unwrap_or(0)))
}

/// The most specific node under (x, y).
pub fn hit_test(
    tree: &FrameTree,
    layout: &LayoutMap,
    components: &mut Components,
    x: u16,
    y: u16,
) -> Option<usize> {
    (0..tree.len())
        .filter(|&idx| {
            let rect = layout.rect(idx);
            !rect.is_empty() && rect.contains(x, y)
        })
        .map(|idx| {
            let node = tree.node(idx);
            let rank = (
                float_layer(tree, idx, components),
                Reverse(layout.rect(idx).area()),
                node.depth,
                node.order,
            );
            (rank, idx)
        })
        .max_by_key(|(rank, _)| *rank)
        .map(|(_, idx)| idx)
}

// =============================================================================
// Offering to a single node
// =============================================================================

fn offer_key(node: &FrameNode, event: &KeyEvent, components: &mut Components) -> EventResult {
    match node.content {
        NodeContent::Component(id) => components
            .get_mut(id)
            .map(|c| c.handle_key(event))
            .unwrap_or_default(),
        NodeContent::Container(_) => node
            .on_key
            .as_ref()
            .map(|handler| handler(event))
            .unwrap_or_default(),
        NodeContent::Text(_) => EventResult::Unhandled,
    }
}

fn offer_mouse(node: &FrameNode, event: &MouseEvent, components: &mut Components) -> EventResult {
    match node.content {
        NodeContent::Component(id) => components
            .get_mut(id)
            .map(|c| c.handle_mouse(event))
            .unwrap_or_default(),
        NodeContent::Container(_) => node
            .on_mouse
            .as_ref()
            .map(|handler| handler(event))
            .unwrap_or_default(),
        NodeContent::Text(_) => EventResult::Unhandled,
    }
}

// =============================================================================
// Broadcasts
// =============================================================================

/// Every live component and every container that asked for it.
pub fn broadcast_resize(tree: &FrameTree, components: &mut Components, width: u16, height: u16) {
    for id in components.ids() {
        if let Some(component) = components.get_mut(id) {
            component.on_resize(width, height);
        }
    }
    for node in tree.nodes() {
        if let Some(handler) = &node.on_resize {
            handler(width, height);
        }
    }
}

/// Every live component, ascending id order, focused or not.
pub fn deliver_tick(components: &mut Components, sequence: u64) {
    for id in components.ids() {
        if let Some(component) = components.get_mut(id) {
            component.on_tick(sequence);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
