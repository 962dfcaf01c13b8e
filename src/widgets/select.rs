//! Select - cycles through a fixed list of options.
//!
//! Left/Up and Right/Down step with wraparound, Home/End jump to the ends.
//! An empty list has no selection and ignores every key.

use crate::engine::{Component, EventResult};
use crate::primitives::{text, Element};
use crate::state::keyboard::{KeyCode, KeyEvent};
use crate::types::Rgba;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Select {
    label: String,
    options: Vec<String>,
    selected: Option<usize>,
}

impl Select {
    pub fn new<I, S>(label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        let selected = if options.is_empty() { None } else { Some(0) };
        Self {
            label: label.into(),
            options,
            selected,
        }
    }

    /// Start at `index`, clamped into range.
    pub fn with_selected(mut self, index: usize) -> Self {
        self.select_index(index);
        self
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// The selected option, or `""` when nothing is selected.
    pub fn selected_value(&self) -> &str {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn select_index(&mut self, index: usize) {
        if let Some(last) = self.options.len().checked_sub(1) {
            self.selected = Some(index.min(last));
        }
    }

    pub fn select_next(&mut self) {
        let len = self.options.len();
        if len > 0 {
            self.selected = Some(self.selected.map_or(0, |i| (i + 1) % len));
        }
    }

    pub fn select_previous(&mut self) {
        let len = self.options.len();
        if len > 0 {
            self.selected = Some(self.selected.map_or(len - 1, |i| (i + len - 1) % len));
        }
    }

    pub fn select_first(&mut self) {
        if !self.options.is_empty() {
            self.selected = Some(0);
        }
    }

    pub fn select_last(&mut self) {
        if let Some(last) = self.options.len().checked_sub(1) {
            self.selected = Some(last);
        }
    }

    /// Replace the options and reset the selection to the first one.
    pub fn set_options<I, S>(&mut self, options: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self.selected = if self.options.is_empty() { None } else { Some(0) };
    }
}

impl Component for Select {
    fn render(&self, focused: bool) -> Element {
        let value = text(format!("{}: < {} >", self.label, self.selected_value()));
        if focused {
            value.fg(Rgba::CYAN).bold()
        } else {
            value
        }
    }

    fn handle_key(&mut self, event: &KeyEvent) -> EventResult {
        if self.options.is_empty() {
            return EventResult::Unhandled;
        }
        match event.code {
            _ if event.is_left() || event.is_up() => self.select_previous(),
            _ if event.is_right() || event.is_down() => self.select_next(),
            KeyCode::Home => self.select_first(),
            KeyCode::End => self.select_last(),
            _ => return EventResult::Unhandled,
        }
        EventResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Select {
        Select::new("Color", ["Red", "Green", "Blue"])
    }

    #[test]
    fn test_starts_at_first() {
        let select = setup();
        assert_eq!(select.selected_index(), Some(0));
        assert_eq!(select.selected_value(), "Red");
    }

    #[test]
    fn test_empty_has_no_selection() {
        let mut select = Select::new("Color", Vec::<String>::new());
        assert_eq!(select.selected_index(), None);
        assert_eq!(select.selected_value(), "");

        select.select_next();
        select.select_index(3);
        assert_eq!(select.selected_index(), None);
        assert!(!select.handle_key(&KeyEvent::new(KeyCode::Right)).is_handled());
    }

    #[test]
    fn test_wraparound() {
        let mut select = setup();
        select.select_previous();
        assert_eq!(select.selected_value(), "Blue");
        select.select_next();
        assert_eq!(select.selected_value(), "Red");
    }

    #[test]
    fn test_select_index_clamps() {
        let select = setup().with_selected(10);
        assert_eq!(select.selected_index(), Some(2));
    }

    #[test]
    fn test_set_options_resets() {
        let mut select = setup().with_selected(2);
        select.set_options(["A", "B"]);
        assert_eq!(select.selected_index(), Some(0));
        select.set_options(Vec::<String>::new());
        assert_eq!(select.selected_index(), None);
    }

    #[test]
    fn test_keys() {
        let mut select = setup();
        assert!(select.handle_key(&KeyEvent::new(KeyCode::Right)).is_handled());
        assert_eq!(select.selected_value(), "Green");
        select.handle_key(&KeyEvent::new(KeyCode::End));
        assert_eq!(select.selected_value(), "Blue");
        select.handle_key(&KeyEvent::new(KeyCode::Home));
        assert_eq!(select.selected_value(), "Red");
        select.handle_key(&KeyEvent::new(KeyCode::Up));
        assert_eq!(select.selected_value(), "Blue");
        assert!(!select.handle_key(&KeyEvent::char('z')).is_handled());
    }
}
