//! On/off switch.

use crate::engine::{Component, EventResult};
use crate::primitives::{text, Element};
use crate::state::keyboard::KeyEvent;
use crate::state::mouse::{MouseButton, MouseEvent, MousePhase};
use crate::types::Rgba;

/// Space, Enter, or a left click flips it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toggle {
    label: String,
    on: bool,
}

impl Toggle {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            on: false,
        }
    }

    pub fn with_on(mut self, on: bool) -> Self {
        self.on = on;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn set_on(&mut self, on: bool) {
        self.on = on;
    }

    /// Flip and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.on = !self.on;
        self.on
    }
}

impl Component for Toggle {
    fn render(&self, focused: bool) -> Element {
        let (glyph, color) = if self.on {
            ("[ ON]", Rgba::GREEN)
        } else {
            ("[OFF]", Rgba::DARK_GRAY)
        };
        let line = text(format!("{} {}", glyph, self.label)).fg(color);
        if focused { line.bold() } else { line }
    }

    fn handle_key(&mut self, event: &KeyEvent) -> EventResult {
        if event.is_char(' ') || event.is_enter() {
            self.toggle();
            EventResult::Handled
        } else {
            EventResult::Unhandled
        }
    }

    fn handle_mouse(&mut self, event: &MouseEvent) -> EventResult {
        if event.phase == MousePhase::Down && event.button == MouseButton::Left {
            self.toggle();
            EventResult::Handled
        } else {
            EventResult::Unhandled
        }
    }
}
