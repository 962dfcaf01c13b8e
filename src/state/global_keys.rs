//! Global Keys Module - root-level keyboard shortcuts
//!
//! The last stop for a key event nobody in the focused path consumed.
//! Handlers run in registration order until one returns `Handled`.
//!
//! Defaults installed by [`GlobalHandlers::with_defaults`]:
//! - Ctrl+C, `q`: stop the loop
//! - Tab: focus next
//! - Shift+Tab: focus previous
//!
//! # Example
//!
//! ```ignore
//! use spark_dsl::state::global_keys::GlobalHandlers;
//! use spark_dsl::EventResult;
//!
//! let mut globals = GlobalHandlers::with_defaults();
//! globals.push(|event, ctx| {
//!     if event.is_char('x') {
//!         if let Some(key) = ctx.focus.current_focus() { /* delete it */ }
//!         return EventResult::Handled;
//!     }
//!     EventResult::Unhandled
//! });
//! ```

use tracing::debug;

use crate::engine::{Components, EventResult};

use super::focus::FocusRegistry;
use super::keyboard::KeyEvent;

// =============================================================================
// CONTEXT
// =============================================================================

/// Runtime state threaded through every dispatch call.
///
/// One explicit value instead of globals: the focus registry, the component
/// arena, the current tick sequence, and a cooperative stop request.
pub struct GlobalContext<'a> {
    pub focus: &'a mut FocusRegistry,
    pub components: &'a mut Components,
    pub tick: u64,
    stop: bool,
}

impl<'a> GlobalContext<'a> {
    pub fn new(focus: &'a mut FocusRegistry, components: &'a mut Components, tick: u64) -> Self {
        Self {
            focus,
            components,
            tick,
            stop: false,
        }
    }

    /// Ask the loop to stop once this dispatch returns.
    pub fn request_stop(&mut self) {
        self.stop = true;
    }

    pub fn stop_requested(&self) -> bool {
        self.stop
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

type GlobalHandler = Box<dyn FnMut(&KeyEvent, &mut GlobalContext<'_>) -> EventResult>;

/// Identifies a registered handler for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

/// Ordered list of root-level key handlers.
#[derive(Default)]
pub struct GlobalHandlers {
    handlers: Vec<(HandlerId, GlobalHandler)>,
    next_id: usize,
}

impl GlobalHandlers {
    /// An empty chain. Nothing quits, nothing cycles focus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Quit keys plus focus cycling.
    pub fn with_defaults() -> Self {
        Self::new().with_quit_keys().with_focus_keys()
    }

    /// Ctrl+C and `q` request a stop.
    pub fn with_quit_keys(mut self) -> Self {
        self.push(|event, ctx| {
            if event.is_ctrl_c() || event.is_char('q') {
                debug!("quit key pressed");
                ctx.request_stop();
                EventResult::Handled
            } else {
                EventResult::Unhandled
            }
        });
        self
    }

    /// Tab and Shift+Tab cycle the focus ring.
    pub fn with_focus_keys(mut self) -> Self {
        // Shift+Tab first so a shifted Tab never reads as plain Tab
        self.push(|event, ctx| {
            if event.is_back_tab() {
                ctx.focus.focus_previous();
                EventResult::Handled
            } else {
                EventResult::Unhandled
            }
        });
        self.push(|event, ctx| {
            if event.is_tab() {
                ctx.focus.focus_next();
                EventResult::Handled
            } else {
                EventResult::Unhandled
            }
        });
        self
    }

    /// Append a handler. Later handlers only see what earlier ones declined.
    pub fn push<F>(&mut self, handler: F) -> HandlerId
    where
        F: FnMut(&KeyEvent, &mut GlobalContext<'_>) -> EventResult + 'static,
    {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    pub fn remove(&mut self, id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Offer `event` to each handler in order; stop at the first `Handled`.
    pub fn dispatch(&mut self, event: &KeyEvent, ctx: &mut GlobalContext<'_>) -> EventResult {
        for (_, handler) in self.handlers.iter_mut() {
            if handler(event, ctx).is_handled() {
                return EventResult::Handled;
            }
        }
        EventResult::Unhandled
    }
}

// =============================================================================
// TESTS
// =============================================================================
