//! Pipeline - from element tree to painted frame, and from input back to state.
//!
//! # Pipeline Architecture
//!
//! ```text
//! tree builder → FrameTree → FocusRegistry::rebuild → expand components
//!              → LayoutResolver → paint → Backend::draw
//!
//! input reader ─(EventSender)─> queue → RenderLoop → EventRouter → components
//! ```
//!
//! ## Key Design Principles
//!
//! - **Fresh trees**: a new [`FrameTree`] is built every tick and discarded
//!   wholesale; durable state lives in the component arena
//! - **One consumer**: routing, ticking, and rendering all happen on the
//!   thread that calls [`RenderLoop::run`]
//! - **Redraw on tick only**: events mutate state, the next tick paints it

mod frame;
mod reader;
mod render_loop;
mod router;

pub use frame::{FrameNode, FrameTree, NodeContent};
pub use reader::{EventSender, InputReader, StopHandle};
pub use render_loop::{LoopState, RenderLoop};
pub use router::{broadcast_resize, deliver_tick, hit_test, EventRouter, Frame};
