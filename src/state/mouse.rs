//! Mouse event types.

use super::keyboard::Modifiers;

/// Mouse button
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    #[default]
    None,
}

/// What the pointer did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MousePhase {
    Down,
    Up,
    /// Motion with a button held.
    Drag,
    /// Motion with no button held.
    Move,
    ScrollUp,
    ScrollDown,
}

/// Mouse event in terminal cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub x: u16,
    pub y: u16,
    pub button: MouseButton,
    pub phase: MousePhase,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    pub fn new(phase: MousePhase, button: MouseButton, x: u16, y: u16) -> Self {
        Self {
            x,
            y,
            button,
            phase,
            modifiers: Modifiers::default(),
        }
    }

    pub fn down(x: u16, y: u16) -> Self {
        Self::new(MousePhase::Down, MouseButton::Left, x, y)
    }

    pub fn up(x: u16, y: u16) -> Self {
        Self::new(MousePhase::Up, MouseButton::Left, x, y)
    }

    pub fn drag(x: u16, y: u16) -> Self {
        Self::new(MousePhase::Drag, MouseButton::Left, x, y)
    }

    pub fn moved(x: u16, y: u16) -> Self {
        Self::new(MousePhase::Move, MouseButton::None, x, y)
    }

    pub fn is_scroll(&self) -> bool {
        matches!(self.phase, MousePhase::ScrollUp | MousePhase::ScrollDown)
    }
}
