//! State modules - events, focus, and root-level key handling.
//!
//! - `keyboard`, `mouse`, `event`: the event vocabulary
//! - `input`: crossterm conversion
//! - `focus`: focus ring and focused key
//! - `global_keys`: root-level handlers and the dispatch context

pub mod event;
pub mod focus;
pub mod global_keys;
pub mod input;
pub mod keyboard;
pub mod mouse;
