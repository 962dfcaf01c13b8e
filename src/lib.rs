//! # spark-dsl
//!
//! Declarative terminal UI composition and event dispatch.
//!
//! Application code describes a tree of elements every frame; the runtime
//! routes keyboard, mouse, resize, and tick events against that tree and
//! redraws at a fixed cadence.
//!
//! ## Architecture
//!
//! Durable state lives in components the application owns, stored in a
//! [`Components`] arena. The per-frame element tree only refers to them by
//! [`ComponentId`], so rebuilding the tree every tick never resets state.
//!
//! ```text
//! tick → tree builder → FrameTree → focus ring → layout → paint → terminal
//! input → EventRouter → focused/hit component → ancestors → global handlers
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Colors, styles, rectangles, layout constraints
//! - [`primitives`] - The [`Element`] model and DSL builders
//! - [`engine`] - The [`Component`] trait and the component arena
//! - [`state`] - Events, focus registry, global key handlers
//! - [`pipeline`] - Frame trees, event routing, the [`RenderLoop`]
//! - [`layout`] - Layout resolution (Taffy by default)
//! - [`renderer`] - Canvas, paint pass, terminal backends
//! - [`widgets`] - Toggle, checkbox, select
//!
//! ## Example
//!
//! ```ignore
//! use spark_dsl::prelude::*;
//!
//! let mut components = Components::new();
//! let sound = components.add(Toggle::new("Sound"));
//!
//! let mut app = RenderLoop::new(Config::default(), CrosstermBackend::stdout());
//! app.run(&mut components, move || {
//!     titled_panel("Settings", [component(sound)])
//! })?;
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod types;
pub mod widgets;

// Re-export commonly used items
pub use config::Config;
pub use engine::{Component, ComponentId, Components, EventResult, FloatState};
pub use error::{Error, Result};
pub use pipeline::{LoopState, RenderLoop};
pub use primitives::Element;

/// Everything an application usually needs.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::engine::{Component, ComponentId, Components, EventResult, FloatState};
    pub use crate::error::{Error, Result};
    pub use crate::pipeline::{EventSender, LoopState, RenderLoop, StopHandle};
    pub use crate::primitives::{
        column, component, fill, fill_weighted, float, lazy, length, max, min, panel, percent,
        ratio, row, spacer, spacer_len, text, titled_panel, Element, FloatGeometry,
    };
    pub use crate::renderer::{Backend, CrosstermBackend, TestBackend};
    pub use crate::state::event::Event;
    pub use crate::state::global_keys::{GlobalContext, GlobalHandlers};
    pub use crate::state::keyboard::{KeyCode, KeyEvent, Modifiers};
    pub use crate::state::mouse::{MouseButton, MouseEvent, MousePhase};
    pub use crate::types::{Attr, Constraint, Rect, Rgba, Style};
    pub use crate::widgets::{Checkbox, Select, Toggle};
}
