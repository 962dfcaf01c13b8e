//! Input Module - crossterm event conversion
//!
//! Bridges crossterm's event system with our keyboard and mouse types.
//! Only the terminal backend and the reader thread call into this.

use crossterm::event::{
    Event as CrosstermEvent, KeyCode as CrosstermKeyCode, KeyEvent as CrosstermKeyEvent,
    KeyEventKind, KeyModifiers, MouseButton as CrosstermMouseButton,
    MouseEvent as CrosstermMouseEvent, MouseEventKind,
};

use super::event::Event;
use super::keyboard::{KeyCode, KeyEvent, KeyState, Modifiers};
use super::mouse::{MouseButton, MouseEvent, MousePhase};

// =============================================================================
// EVENT CONVERSION
// =============================================================================

/// Convert a crossterm event. Returns None for events we don't route
/// (focus gained/lost, paste, horizontal scroll).
pub fn convert_event(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) => convert_key_event(key).map(Event::Key),
        CrosstermEvent::Mouse(mouse) => convert_mouse_event(mouse).map(Event::Mouse),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Convert crossterm MouseEvent to our MouseEvent
pub fn convert_mouse_event(event: CrosstermMouseEvent) -> Option<MouseEvent> {
    let (phase, button) = match event.kind {
        MouseEventKind::Down(btn) => (MousePhase::Down, convert_mouse_button(btn)),
        MouseEventKind::Up(btn) => (MousePhase::Up, convert_mouse_button(btn)),
        MouseEventKind::Drag(btn) => (MousePhase::Drag, convert_mouse_button(btn)),
        MouseEventKind::Moved => (MousePhase::Move, MouseButton::None),
        MouseEventKind::ScrollUp => (MousePhase::ScrollUp, MouseButton::None),
        MouseEventKind::ScrollDown => (MousePhase::ScrollDown, MouseButton::None),
        MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight => return None,
    };

    Some(MouseEvent {
        x: event.column,
        y: event.row,
        button,
        phase,
        modifiers: convert_modifiers(event.modifiers),
    })
}

fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> Option<KeyEvent> {
    let code = match event.code {
        CrosstermKeyCode::Char(c) => KeyCode::Char(c),
        CrosstermKeyCode::Enter => KeyCode::Enter,
        CrosstermKeyCode::Tab => KeyCode::Tab,
        CrosstermKeyCode::BackTab => KeyCode::BackTab,
        CrosstermKeyCode::Backspace => KeyCode::Backspace,
        CrosstermKeyCode::Delete => KeyCode::Delete,
        CrosstermKeyCode::Insert => KeyCode::Insert,
        CrosstermKeyCode::Esc => KeyCode::Esc,
        CrosstermKeyCode::Up => KeyCode::Up,
        CrosstermKeyCode::Down => KeyCode::Down,
        CrosstermKeyCode::Left => KeyCode::Left,
        CrosstermKeyCode::Right => KeyCode::Right,
        CrosstermKeyCode::Home => KeyCode::Home,
        CrosstermKeyCode::End => KeyCode::End,
        CrosstermKeyCode::PageUp => KeyCode::PageUp,
        CrosstermKeyCode::PageDown => KeyCode::PageDown,
        CrosstermKeyCode::F(n) => KeyCode::F(n),
        CrosstermKeyCode::Null => KeyCode::Null,
        _ => return None,
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    Some(KeyEvent {
        code,
        modifiers: convert_modifiers(event.modifiers),
        state,
    })
}

// =============================================================================
// MODIFIER CONVERSION
// =============================================================================

fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEventKind};

    #[test]
    fn test_convert_ctrl_c() {
        let raw = CrosstermKeyEvent {
            code: CrosstermKeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        };
        let key = convert_key_event(raw).unwrap();
        assert!(key.is_ctrl_c());
    }

    #[test]
    fn test_convert_mouse_drag() {
        let raw = CrosstermMouseEvent {
            kind: MouseEventKind::Drag(CrosstermMouseButton::Left),
            column: 12,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        let mouse = convert_mouse_event(raw).unwrap();
        assert_eq!(mouse.phase, MousePhase::Drag);
        assert_eq!(mouse.button, MouseButton::Left);
        assert_eq!((mouse.x, mouse.y), (12, 4));
    }

    #[test]
    fn test_horizontal_scroll_dropped() {
        let raw = CrosstermMouseEvent {
            kind: MouseEventKind::ScrollLeft,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert!(convert_mouse_event(raw).is_none());
    }

    #[test]
    fn test_resize_passes_through() {
        assert_eq!(
            convert_event(CrosstermEvent::Resize(80, 24)),
            Some(Event::Resize(80, 24))
        );
        assert_eq!(convert_event(CrosstermEvent::FocusGained), None);
    }
}
