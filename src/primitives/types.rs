//! Element types - the per-frame UI description.
//!
//! An [`Element`] tree is rebuilt from scratch every frame and thrown away
//! after it. Nothing here is diffed or kept: the runtime only extracts focus
//! handles and resolves rectangles for hit-testing.

use std::fmt;
use std::rc::Rc;

use crate::engine::{ComponentId, EventResult};
use crate::state::focus::{FocusHandle, FocusKey};
use crate::state::keyboard::KeyEvent;
use crate::state::mouse::MouseEvent;
use crate::types::{Constraint, Style};

// =============================================================================
// Callback Types
// =============================================================================

/// Keyboard handler on a container. Return `Handled` to stop propagation.
pub type KeyCallback = Rc<dyn Fn(&KeyEvent) -> EventResult>;

/// Mouse handler on a container. Return `Handled` to stop propagation.
pub type MouseCallback = Rc<dyn Fn(&MouseEvent) -> EventResult>;

/// Resize notification on a container.
pub type ResizeCallback = Rc<dyn Fn(u16, u16)>;

// =============================================================================
// Element
// =============================================================================

/// One node of the per-frame tree.
pub enum Element {
    Text(Text),
    Container(Container),
    Stateful(Stateful),
    /// Deferred construction, evaluated exactly once when the frame is built.
    Lazy(Lazy),
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Text(t) => t.fmt(f),
            Element::Container(c) => c.fmt(f),
            Element::Stateful(s) => s.fmt(f),
            Element::Lazy(_) => f.write_str("Lazy"),
        }
    }
}

/// Immutable string content plus style.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub content: String,
    pub style: Style,
    pub constraint: Option<Constraint>,
}

// =============================================================================
// Container
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContainerKind {
    /// Children laid out left to right.
    Row,
    /// Children laid out top to bottom.
    #[default]
    Column,
    /// Bordered column with an optional title in the top border.
    Panel,
    /// Empty space.
    Spacer,
    /// Bordered panel positioned absolutely, above the normal flow.
    Float,
}

/// Absolute placement of a [`ContainerKind::Float`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FloatGeometry {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    /// Stacking order: higher paints over and hit-tests before lower.
    pub z: u32,
}

#[derive(Default)]
pub struct Container {
    pub kind: ContainerKind,
    pub children: Vec<Element>,
    pub constraint: Option<Constraint>,
    pub style: Style,
    pub title: Option<String>,
    pub float: Option<FloatGeometry>,
    pub focus: Option<FocusHandle>,
    pub on_key: Option<KeyCallback>,
    pub on_mouse: Option<MouseCallback>,
    pub on_resize: Option<ResizeCallback>,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("kind", &self.kind)
            .field("children", &self.children)
            .field("constraint", &self.constraint)
            .field("title", &self.title)
            .field("float", &self.float)
            .field("focus", &self.focus)
            .field("on_key", &self.on_key.is_some())
            .field("on_mouse", &self.on_mouse.is_some())
            .finish()
    }
}

// =============================================================================
// Stateful
// =============================================================================

/// Reference into the component arena. Holds no state of its own.
#[derive(Debug, Clone, PartialEq)]
pub struct Stateful {
    pub id: ComponentId,
    /// Focus key override. Defaults to one derived from `id`.
    pub key: Option<FocusKey>,
    pub constraint: Option<Constraint>,
}

impl Stateful {
    /// The key this node registers in the focus ring.
    pub fn focus_key(&self) -> FocusKey {
        self.key
            .clone()
            .unwrap_or_else(|| FocusKey::new(self.id.to_string()))
    }
}

// =============================================================================
// Lazy
// =============================================================================

pub struct Lazy(Box<dyn FnOnce() -> Element>);

impl Lazy {
    pub fn new(thunk: impl FnOnce() -> Element + 'static) -> Self {
        Self(Box::new(thunk))
    }

    pub fn evaluate(self) -> Element {
        (self.0)()
    }
}
