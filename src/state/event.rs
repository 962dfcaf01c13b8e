//! The unified event type delivered to the render loop.

use super::keyboard::KeyEvent;
use super::mouse::MouseEvent;

/// Everything the loop can be woken by.
///
/// Delivered strictly in arrival order. `Tick` is normally synthesized by the
/// loop's own deadline; one pushed through an event sender runs a tick cycle
/// at that point in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick(u64),
    Resize(u16, u16),
}

impl From<KeyEvent> for Event {
    fn from(event: KeyEvent) -> Self {
        Event::Key(event)
    }
}

impl From<MouseEvent> for Event {
    fn from(event: MouseEvent) -> Self {
        Event::Mouse(event)
    }
}
