//! Widgets - ready-made stateful components.
//!
//! Each widget owns its state, implements [`Component`](crate::engine::Component),
//! and renders a single line. Add them to a
//! [`Components`](crate::engine::Components) arena and place them with
//! [`component`](crate::primitives::component).

mod checkbox;
mod select;
mod toggle;

pub use checkbox::Checkbox;
pub use select::Select;
pub use toggle::Toggle;
