//! UI Primitives - the element tree and the DSL that builds it.
//!
//! - [`types`] - `Element` and its variants
//! - [`dsl`] - builder functions (`text`, `row`, `panel`, ...) and modifiers
//!
//! # Architecture
//!
//! Elements are values, not handles. The application returns a fresh tree
//! every frame; state that must survive lives in components, and the tree
//! only refers to them:
//!
//! ```ignore
//! // CORRECT - the counter lives in the arena, the tree points at it
//! column([text("header"), component(counter_id)])
//!
//! // WRONG - state captured in the tree is rebuilt (reset) every frame
//! column([text("header"), text(format!("{}", Counter::default().value))])
//! ```

mod dsl;
mod types;

pub use dsl::*;
pub use types::*;
