//! Checkbox - a toggle drawn as `[x]`.

use crate::engine::{Component, EventResult};
use crate::primitives::{text, Element};
use crate::state::keyboard::KeyEvent;
use crate::state::mouse::{MouseButton, MouseEvent, MousePhase};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkbox {
    label: String,
    checked: bool,
}

impl Checkbox {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            checked: false,
        }
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn toggle(&mut self) -> bool {
        self.checked = !self.checked;
        self.checked
    }
}

impl Component for Checkbox {
    fn render(&self, focused: bool) -> Element {
        let mark = if self.checked { 'x' } else { ' ' };
        let line = text(format!("[{}] {}", mark, self.label));
        if focused { line.underline() } else { line }
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
