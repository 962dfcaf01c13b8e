//! Focus System - focus ring and focused-key state
//!
//! Manages focus across frames:
//! - The ordered ring of focusable handles, rebuilt every frame
//! - The currently focused key (correlated by key, never by node identity)
//! - Cycling with wrap-around (Tab/Shift+Tab)
//!
//! # Example
//!
//! ```ignore
//! use spark_dsl::state::focus::{FocusHandle, FocusRegistry};
//!
//! let mut focus = FocusRegistry::new();
//! focus.rebuild_from([FocusHandle::new("left"), FocusHandle::new("right")])?;
//!
//! focus.focus_next();
//! assert_eq!(focus.current_focus().map(|k| k.as_str()), Some("left"));
//! ```

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::pipeline::FrameTree;

// =============================================================================
// KEYS AND HANDLES
// =============================================================================

/// Application-assigned identity of a focusable element, stable across frames.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FocusKey(String);

impl FocusKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FocusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FocusKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for FocusKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl Borrow<str> for FocusKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A key plus whether the element currently accepts focus.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FocusHandle {
    pub key: FocusKey,
    pub focusable: bool,
}

impl FocusHandle {
    pub fn new(key: impl Into<FocusKey>) -> Self {
        Self {
            key: key.into(),
            focusable: true,
        }
    }

    /// A handle that keeps its key reserved but stays out of the ring.
    pub fn disabled(key: impl Into<FocusKey>) -> Self {
        Self {
            key: key.into(),
            focusable: false,
        }
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Ordered focus ring plus the focused key.
///
/// Invariant: `current_focus()`, when set, is always a member of `handles()`.
#[derive(Debug, Clone, Default)]
pub struct FocusRegistry {
    ring: Vec<FocusKey>,
    focused: Option<FocusKey>,
}

impl FocusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-scan a materialized frame for focusable nodes.
    pub fn rebuild(&mut self, tree: &FrameTree) -> Result<&[FocusKey]> {
        self.rebuild_from(tree.focus_handles())
    }

    /// Replace the ring with `handles`, in the order given.
    ///
    /// Non-focusable handles are left out of the ring but still take part in
    /// the collision check. On a collision the registry is left untouched.
    /// If the focused key did not survive, focus falls back to the first
    /// handle, or to none when the ring is empty.
    pub fn rebuild_from<I>(&mut self, handles: I) -> Result<&[FocusKey]>
    where
        I: IntoIterator<Item = FocusHandle>,
    {
        let mut seen = HashSet::new();
        let mut ring = Vec::new();

        for handle in handles {
            if !seen.insert(handle.key.clone()) {
                return Err(Error::DuplicateFocusKey {
                    key: handle.key.to_string(),
                });
            }
            if handle.focusable {
                ring.push(handle.key);
            }
        }

        self.ring = ring;

        if let Some(key) = &self.focused {
            if !self.ring.contains(key) {
                let fallback = self.ring.first().cloned();
                debug!(stale = %key, fallback = ?fallback, "focused element disappeared");
                self.focused = fallback;
            }
        }

        trace!(handles = self.ring.len(), "focus ring rebuilt");
        Ok(&self.ring)
    }

    /// The ring in traversal order.
    pub fn handles(&self) -> &[FocusKey] {
        &self.ring
    }

    pub fn current_focus(&self) -> Option<&FocusKey> {
        self.focused.as_ref()
    }

    pub fn is_focused(&self, key: &str) -> bool {
        self.focused.as_ref().is_some_and(|k| k.as_str() == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.ring.iter().any(|k| k.as_str() == key)
    }

    /// Move focus one step forward, wrapping. With nothing focused, picks the
    /// first handle. No-op on an empty ring.
    pub fn focus_next(&mut self) -> Option<&FocusKey> {
        self.step(1)
    }

    /// Move focus one step back, wrapping. With nothing focused, picks the
    /// last handle. No-op on an empty ring.
    pub fn focus_previous(&mut self) -> Option<&FocusKey> {
        self.step(-1)
    }

    fn step(&mut self, direction: isize) -> Option<&FocusKey> {
        let len = self.ring.len() as isize;
        if len == 0 {
            return None;
        }

        let position = self
            .focused
            .as_ref()
            .and_then(|key| self.ring.iter().position(|k| k == key));

        let next = match position {
            // Wrap around in both directions
            Some(pos) => ((pos as isize + direction) % len + len) % len,
            None if direction > 0 => 0,
            None => len - 1,
        };

        let key = self.ring[next as usize].clone();
        self.set_focus(Some(key));
        self.focused.as_ref()
    }

    /// Focus a specific key. Returns false if it is not in the ring.
    pub fn focus(&mut self, key: &str) -> bool {
        match self.ring.iter().find(|k| k.as_str() == key) {
            Some(found) => {
                let found = found.clone();
                self.set_focus(Some(found));
                true
            }
            None => false,
        }
    }

    pub fn focus_first(&mut self) -> Option<&FocusKey> {
        let first = self.ring.first().cloned();
        self.set_focus(first);
        self.focused.as_ref()
    }

    pub fn focus_last(&mut self) -> Option<&FocusKey> {
        let last = self.ring.last().cloned();
        self.set_focus(last);
        self.focused.as_ref()
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        self.set_focus(None);
    }

    fn set_focus(&mut self, key: Option<FocusKey>) {
        if self.focused != key {
            debug!(from = ?self.focused, to = ?key, "focus changed");
            self.focused = key;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(keys: &[&str]) -> FocusRegistry {
        let mut focus = FocusRegistry::new();
        focus
            .rebuild_from(keys.iter().map(|k| FocusHandle::new(*k)))
            .unwrap();
        focus
    }

    fn current(focus: &FocusRegistry) -> Option<&str> {
        focus.current_focus().map(FocusKey::as_str)
    }

    #[test]
    fn test_initial_state() {
        let focus = setup(&["a", "b"]);
        assert_eq!(current(&focus), None);
        assert_eq!(focus.handles().len(), 2);
    }

    #[test]
    fn test_focus_next_wraps() {
        let mut focus = setup(&["a", "b", "c"]);

        focus.focus_next();
        assert_eq!(current(&focus), Some("a"));
        focus.focus_next();
        focus.focus_next();
        assert_eq!(current(&focus), Some("c"));
        focus.focus_next();
        assert_eq!(current(&focus), Some("a"));
    }

    #[test]
    fn test_focus_previous_wraps() {
        let mut focus = setup(&["a", "b", "c"]);

        focus.focus_previous();
        assert_eq!(current(&focus), Some("c"));
        focus.focus("a");
        focus.focus_previous();
        assert_eq!(current(&focus), Some("c"));
    }

    #[test]
    fn test_next_then_previous_returns() {
        let mut focus = setup(&["a", "b", "c"]);
        focus.focus("b");

        focus.focus_next();
        focus.focus_previous();
        assert_eq!(current(&focus), Some("b"));
    }

    #[test]
    fn test_empty_ring_is_noop() {
        let mut focus = setup(&[]);

        assert!(focus.focus_next().is_none());
        assert!(focus.focus_previous().is_none());
        assert!(focus.focus_first().is_none());
        assert_eq!(current(&focus), None);
    }

    #[test]
    fn test_removed_focus_falls_back_to_first() {
        let mut focus = setup(&["a", "b", "c"]);
        focus.focus("b");

        focus
            .rebuild_from([FocusHandle::new("c"), FocusHandle::new("a")])
            .unwrap();
        assert_eq!(current(&focus), Some("c"));

        focus.rebuild_from(std::iter::empty()).unwrap();
        assert_eq!(current(&focus), None);
    }

    #[test]
    fn test_surviving_focus_kept() {
        let mut focus = setup(&["a", "b"]);
        focus.focus("b");

        focus
            .rebuild_from([FocusHandle::new("x"), FocusHandle::new("b")])
            .unwrap();
        assert_eq!(current(&focus), Some("b"));
    }

    #[test]
    fn test_duplicate_key_keeps_previous_state() {
        let mut focus = setup(&["a", "b"]);
        focus.focus("b");

        let err = focus
            .rebuild_from([
                FocusHandle::new("z"),
                FocusHandle::new("a"),
                FocusHandle::new("a"),
            ])
            .unwrap_err();

        assert!(matches!(err, Error::DuplicateFocusKey { ref key } if key == "a"));
        assert_eq!(focus.handles(), &[FocusKey::from("a"), FocusKey::from("b")]);
        assert_eq!(current(&focus), Some("b"));
    }

    #[test]
    fn test_disabled_handles_skip_ring() {
        let mut focus = FocusRegistry::new();
        focus
            .rebuild_from([
                FocusHandle::new("a"),
                FocusHandle::disabled("b"),
                FocusHandle::new("c"),
            ])
            .unwrap();

        assert_eq!(focus.handles(), &[FocusKey::from("a"), FocusKey::from("c")]);
        assert!(!focus.focus("b"));
    }

    #[test]
    fn test_disabled_handle_still_collides() {
        let mut focus = FocusRegistry::new();
        let result = focus.rebuild_from([FocusHandle::new("a"), FocusHandle::disabled("a")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_blur_and_last() {
        let mut focus = setup(&["a", "b"]);
        focus.focus_last();
        assert!(focus.is_focused("b"));
        focus.blur();
        assert_eq!(current(&focus), None);
    }
}
