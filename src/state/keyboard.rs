//! Keyboard event types.
//!
//! Pure data: the handler chain that consumes these lives in the router.
//!
//! # Example
//!
//! ```ignore
//! use spark_dsl::state::keyboard::{KeyCode, KeyEvent, Modifiers};
//!
//! let event = KeyEvent::with_modifiers(KeyCode::Char('c'), Modifiers::ctrl());
//! assert!(event.is_ctrl_c());
//! ```

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    pub fn alt() -> Self {
        Self { alt: true, ..Self::default() }
    }

    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.alt || self.shift)
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Which key was pressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Tab,
    /// Shift+Tab as reported by most terminals.
    BackTab,
    Backspace,
    Delete,
    Insert,
    Esc,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
    Null,
}

/// Keyboard event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyEvent {
    /// A plain key press.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    /// A key press with modifiers.
    pub fn with_modifiers(code: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            code,
            modifiers,
            state: KeyState::Press,
        }
    }

    /// Shorthand for a printable character press.
    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    pub fn is_press(&self) -> bool {
        matches!(self.state, KeyState::Press | KeyState::Repeat)
    }

    /// `c` without ctrl or alt. Shift is part of the character itself.
    pub fn is_char(&self, c: char) -> bool {
        self.code == KeyCode::Char(c) && !self.modifiers.ctrl && !self.modifiers.alt
    }

    /// Any of `chars`, same rules as [`is_char`](Self::is_char).
    pub fn is_any_char(&self, chars: &[char]) -> bool {
        chars.iter().any(|&c| self.is_char(c))
    }

    pub fn is_up(&self) -> bool {
        self.code == KeyCode::Up
    }

    pub fn is_down(&self) -> bool {
        self.code == KeyCode::Down
    }

    pub fn is_left(&self) -> bool {
        self.code == KeyCode::Left
    }

    pub fn is_right(&self) -> bool {
        self.code == KeyCode::Right
    }

    pub fn is_tab(&self) -> bool {
        self.code == KeyCode::Tab && !self.modifiers.shift
    }

    /// Shift+Tab, whichever way the terminal encodes it.
    pub fn is_back_tab(&self) -> bool {
        self.code == KeyCode::BackTab || (self.code == KeyCode::Tab && self.modifiers.shift)
    }

    pub fn is_enter(&self) -> bool {
        self.code == KeyCode::Enter
    }

    pub fn is_escape(&self) -> bool {
        self.code == KeyCode::Esc
    }

    pub fn is_ctrl_c(&self) -> bool {
        self.modifiers.ctrl && matches!(self.code, KeyCode::Char('c') | KeyCode::Char('C'))
    }
}

// =============================================================================
// TESTS
// =============================================================================
