//! Component capability interface.
//!
//! A component owns its durable state (a counter value, an animation phase,
//! a drag offset) and is asked each cycle to describe itself as a fresh
//! [`Element`]. The runtime only ever holds `dyn Component`; the concrete
//! panel types belong to the application.
//!
//! # Example
//!
//! ```ignore
//! use spark_dsl::prelude::*;
//!
//! struct Counter { value: i32 }
//!
//! impl Component for Counter {
//!     fn render(&self, focused: bool) -> Element {
//!         let line = text(format!("{:+}", self.value));
//!         if focused { line.bold() } else { line }
//!     }
//!
//!     fn handle_key(&mut self, event: &KeyEvent) -> EventResult {
//!         if event.is_char('k') {
//!             self.value += 1;
//!             return EventResult::Handled;
//!         }
//!         EventResult::Unhandled
//!     }
//! }
//! ```

use crate::primitives::Element;
use crate::state::keyboard::KeyEvent;
use crate::state::mouse::MouseEvent;

// =============================================================================
// EventResult
// =============================================================================

/// Whether a handler consumed an event. Propagation stops at `Handled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventResult {
    Handled,
    #[default]
    Unhandled,
}

impl EventResult {
    #[inline]
    pub fn is_handled(self) -> bool {
        self == EventResult::Handled
    }

    /// `Handled` if either side is.
    pub fn or(self, other: EventResult) -> EventResult {
        if self.is_handled() { self } else { other }
    }
}

impl From<bool> for EventResult {
    fn from(consumed: bool) -> Self {
        if consumed {
            EventResult::Handled
        } else {
            EventResult::Unhandled
        }
    }
}

// =============================================================================
// FloatState
// =============================================================================

/// Position and stacking order of a draggable floating panel.
///
/// Lives in the component, not in the element tree, so a drag survives the
/// tree being rebuilt every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FloatState {
    pub x: u16,
    pub y: u16,
    pub z: u32,
}

impl FloatState {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y, z: 0 }
    }
}

// =============================================================================
// Component
// =============================================================================

/// The operations the runtime invokes on a stateful component.
///
/// Only `render` is required. Every other hook defaults to a no-op or
/// `Unhandled`.
pub trait Component {
    /// Describe the component for this frame.
    fn render(&self, focused: bool) -> Element;

    /// Advance internal state. Called once per tick, focused or not.
    fn on_tick(&mut self, _sequence: u64) {}

    fn handle_key(&mut self, _event: &KeyEvent) -> EventResult {
        EventResult::Unhandled
    }

    fn handle_mouse(&mut self, _event: &MouseEvent) -> EventResult {
        EventResult::Unhandled
    }

    fn on_resize(&mut self, _width: u16, _height: u16) {}

    /// Whether this component joins the focus ring.
    fn is_focusable(&self) -> bool {
        true
    }

    /// Draggable floats expose their position here.
    fn float_state(&mut self) -> Option<&mut FloatState> {
        None
    }
}
