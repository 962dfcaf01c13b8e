//! Renderer - paint pass, diffing, and terminal backends.

mod backend;
mod canvas;
mod diff;
mod paint;

pub use backend::{Backend, CrosstermBackend, TestBackend};
pub use canvas::{Canvas, Cell};
pub use diff::DiffRenderer;
pub use paint::paint;
