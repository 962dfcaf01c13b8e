//! Builder functions and chained modifiers.
//!
//! # Example
//!
//! ```ignore
//! use spark_dsl::prelude::*;
//!
//! let tree = column([
//!     row([text(" [q] Quit ").dim(), spacer(), text("spark").bold()]).constraint(length(1)),
//!     titled_panel("Counter", [component(counter_id)]).fg(Rgba::CYAN),
//!     lazy(|| text(expensive_status())),
//! ]);
//! ```

use std::rc::Rc;

use crate::engine::{ComponentId, EventResult};
use crate::state::focus::{FocusHandle, FocusKey};
use crate::state::keyboard::KeyEvent;
use crate::state::mouse::MouseEvent;
use crate::types::{Attr, Constraint, Rgba, Style};

use super::types::{
    Container, ContainerKind, Element, FloatGeometry, Lazy, Stateful, Text,
};

// =============================================================================
// Leaves
// =============================================================================

pub fn text(content: impl Into<String>) -> Element {
    Element::Text(Text {
        content: content.into(),
        style: Style::default(),
        constraint: None,
    })
}

/// Flexible empty space that fills what its siblings leave.
pub fn spacer() -> Element {
    container(ContainerKind::Spacer, Vec::new())
}

/// Fixed-size empty space.
pub fn spacer_len(cells: u16) -> Element {
    spacer().constraint(Constraint::Length(cells))
}

// =============================================================================
// Containers
// =============================================================================

fn container(kind: ContainerKind, children: Vec<Element>) -> Element {
    Element::Container(Container {
        kind,
        children,
        ..Container::default()
    })
}

pub fn row(children: impl IntoIterator<Item = Element>) -> Element {
    container(ContainerKind::Row, children.into_iter().collect())
}

pub fn column(children: impl IntoIterator<Item = Element>) -> Element {
    container(ContainerKind::Column, children.into_iter().collect())
}

pub fn panel(children: impl IntoIterator<Item = Element>) -> Element {
    container(ContainerKind::Panel, children.into_iter().collect())
}

pub fn titled_panel(title: impl Into<String>, children: impl IntoIterator<Item = Element>) -> Element {
    panel(children).title(title)
}

/// A floating panel at an absolute position.
pub fn float(geometry: FloatGeometry, children: impl IntoIterator<Item = Element>) -> Element {
    let mut element = container(ContainerKind::Float, children.into_iter().collect());
    if let Element::Container(c) = &mut element {
        c.float = Some(geometry);
    }
    element
}

// =============================================================================
// Components and thunks
// =============================================================================

/// Splice a stateful component into the tree.
pub fn component(id: ComponentId) -> Element {
    Element::Stateful(Stateful {
        id,
        key: None,
        constraint: None,
    })
}

/// Build the subtree when the frame is materialized, not when the tree is
/// described. Never cached across frames.
pub fn lazy(thunk: impl FnOnce() -> Element + 'static) -> Element {
    Element::Lazy(Lazy::new(thunk))
}

// =============================================================================
// Constraint helpers
// =============================================================================

pub fn length(cells: u16) -> Constraint {
    Constraint::Length(cells)
}

pub fn percent(value: u16) -> Constraint {
    Constraint::Percentage(value)
}

pub fn ratio(numerator: u32, denominator: u32) -> Constraint {
    Constraint::Ratio(numerator, denominator)
}

pub fn min(cells: u16) -> Constraint {
    Constraint::Min(cells)
}

pub fn max(cells: u16) -> Constraint {
    Constraint::Max(cells)
}

pub fn fill() -> Constraint {
    Constraint::Fill(1)
}

pub fn fill_weighted(weight: u16) -> Constraint {
    Constraint::Fill(weight)
}

// =============================================================================
// Modifiers
// =============================================================================

/// Chained modifiers. Each applies where it means something and is ignored
/// elsewhere: styling reaches text and containers, handlers and titles reach
/// containers only, `focusable` reaches containers and components.
impl Element {
    fn style_mut(&mut self) -> Option<&mut Style> {
        match self {
            Element::Text(t) => Some(&mut t.style),
            Element::Container(c) => Some(&mut c.style),
            Element::Stateful(_) | Element::Lazy(_) => None,
        }
    }

    fn with_style(mut self, f: impl FnOnce(Style) -> Style) -> Self {
        if let Some(style) = self.style_mut() {
            *style = f(*style);
        }
        self
    }

    pub fn fg(self, color: Rgba) -> Self {
        self.with_style(|s| s.fg(color))
    }

    pub fn bg(self, color: Rgba) -> Self {
        self.with_style(|s| s.bg(color))
    }

    pub fn bold(self) -> Self {
        self.with_style(|s| s.add(Attr::BOLD))
    }

    pub fn dim(self) -> Self {
        self.with_style(|s| s.add(Attr::DIM))
    }

    pub fn italic(self) -> Self {
        self.with_style(|s| s.add(Attr::ITALIC))
    }

    pub fn underline(self) -> Self {
        self.with_style(|s| s.add(Attr::UNDERLINE))
    }

    pub fn reversed(self) -> Self {
        self.with_style(|s| s.add(Attr::INVERSE))
    }

    /// Overlay a whole style.
    pub fn style(self, style: Style) -> Self {
        self.with_style(|s| s.patch(style))
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        match &mut self {
            Element::Text(t) => t.constraint = Some(constraint),
            Element::Container(c) => c.constraint = Some(constraint),
            Element::Stateful(s) => s.constraint = Some(constraint),
            Element::Lazy(_) => {}
        }
        self
    }

    /// Join the focus ring under `key`. On a component this replaces the
    /// id-derived key.
    pub fn focusable(mut self, key: impl Into<FocusKey>) -> Self {
        match &mut self {
            Element::Container(c) => c.focus = Some(FocusHandle::new(key)),
            Element::Stateful(s) => s.key = Some(key.into()),
            Element::Text(_) | Element::Lazy(_) => {}
        }
        self
    }

    pub fn on_key(mut self, handler: impl Fn(&KeyEvent) -> EventResult + 'static) -> Self {
        if let Element::Container(c) = &mut self {
            c.on_key = Some(Rc::new(handler));
        }
        self
    }

    pub fn on_mouse(mut self, handler: impl Fn(&MouseEvent) -> EventResult + 'static) -> Self {
        if let Element::Container(c) = &mut self {
            c.on_mouse = Some(Rc::new(handler));
        }
        self
    }

    pub fn on_resize(mut self, handler: impl Fn(u16, u16) + 'static) -> Self {
        if let Element::Container(c) = &mut self {
            c.on_resize = Some(Rc::new(handler));
        }
        self
    }

    /// Border title for panels and floats.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        if let Element::Container(c) = &mut self {
            c.title = Some(title.into());
        }
        self
    }

    /// Raise a float's stacking order.
    pub fn z(mut self, z: u32) -> Self {
        if let Element::Container(Container { float: Some(geometry), .. }) = &mut self {
            geometry.z = z;
        }
        self
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_text_style_chain() {
        let element = text("hi").fg(Rgba::RED).bold().underline();
        let Element::Text(t) = element else {
            panic!("expected text");
        };
        assert_eq!(t.content, "hi");
        assert_eq!(t.style.fg, Rgba::RED);
        assert_eq!(t.style.attrs, Attr::BOLD | Attr::UNDERLINE);
    }

    #[test]
    fn test_titled_panel() {
        let Element::Container(c) = titled_panel("Stats", [text("a"), text("b")]) else {
            panic!("expected container");
        };
        assert_eq!(c.kind, ContainerKind::Panel);
        assert_eq!(c.title.as_deref(), Some("Stats"));
        assert_eq!(c.children.len(), 2);
    }

    #[test]
    fn test_spacer_len_sets_length() {
        let Element::Container(c) = spacer_len(3) else {
            panic!("expected container");
        };
        assert_eq!(c.kind, ContainerKind::Spacer);
        assert_eq!(c.constraint, Some(Constraint::Length(3)));
    }

    #[test]
    fn test_float_z() {
        let geometry = FloatGeometry { x: 1, y: 2, width: 10, height: 5, z: 0 };
        let Element::Container(c) = float(geometry, []).z(7) else {
            panic!("expected container");
        };
        assert_eq!(c.float.map(|g| g.z), Some(7));
    }

    #[test]
    fn test_focusable_on_container() {
        let Element::Container(c) = panel([]).focusable("menu") else {
            panic!("expected container");
        };
        assert_eq!(c.focus, Some(FocusHandle::new("menu")));
    }

    #[test]
    fn test_handlers_ignored_on_text() {
        let element = text("x").on_key(|_| EventResult::Handled).title("nope");
        assert!(matches!(element, Element::Text(_)));
    }

    #[test]
    fn test_lazy_runs_on_evaluate_only() {
        let calls = std::rc::Rc::new(Cell::new(0));
        let counter = calls.clone();
        let element = lazy(move || {
            counter.set(counter.get() + 1);
            text("late")
        });
        assert_eq!(calls.get(), 0);

        let Element::Lazy(thunk) = element else {
            panic!("expected lazy");
        };
        let _ = thunk.evaluate();
        assert_eq!(calls.get(), 1);
    }
}
