//! Component engine - the capability trait and the arena that owns state.
//!
//! Components are durable; elements are not. Every frame the application
//! builds a brand-new element tree, and stateful nodes in it point back into
//! the arena by [`ComponentId`]:
//!
//! ```text
//! Components (application-owned, lives for the run)
//!   c0v0: CounterPanel { value: 3 }
//!   c1v0: ProgressPanel { progress: 41, up: true }
//!
//! Frame N tree (discarded after the cycle)
//!   Column
//!     Text "header"
//!     Stateful(c0v0)
//!     Stateful(c1v0)
//! ```

mod component;
mod registry;

pub use component::*;
pub use registry::*;
