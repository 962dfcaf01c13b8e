//! Component arena - application-owned storage for stateful components.
//!
//! Manages the lifecycle of component slots:
//! - Generational ids, so a stale id never reaches a recycled slot
//! - Free slot pool for O(1) reuse
//! - Ascending slot iteration (the tick delivery order)
//!
//! The runtime borrows the arena for the duration of a run but never
//! creates or destroys components itself.

use std::fmt;

use super::component::Component;

// =============================================================================
// ComponentId
// =============================================================================

/// Stable handle to a component in a [`Components`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId {
    index: u32,
    generation: u32,
}

impl ComponentId {
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}v{}", self.index, self.generation)
    }
}

// =============================================================================
// Components
// =============================================================================

struct Slot {
    generation: u32,
    component: Option<Box<dyn Component>>,
}

/// Arena of live components keyed by [`ComponentId`].
#[derive(Default)]
pub struct Components {
    slots: Vec<Slot>,
    free: Vec<usize>,
    len: usize,
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a component and return its id.
    pub fn insert(&mut self, component: Box<dyn Component>) -> ComponentId {
        self.len += 1;

        // Reuse a freed slot or grow
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.component = Some(component);
            return ComponentId {
                index: index as u32,
                generation: slot.generation,
            };
        }

        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            component: Some(component),
        });
        ComponentId {
            index: index as u32,
            generation: 0,
        }
    }

    /// Convenience for `insert(Box::new(component))`.
    pub fn add<C: Component + 'static>(&mut self, component: C) -> ComponentId {
        self.insert(Box::new(component))
    }

    /// Remove a component. Returns it if the id was live.
    pub fn remove(&mut self, id: ComponentId) -> Option<Box<dyn Component>> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        let component = slot.component.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        self.len -= 1;
        Some(component)
    }

    pub fn get(&self, id: ComponentId) -> Option<&dyn Component> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.component.as_deref()
    }

    pub fn get_mut(&mut self, id: ComponentId) -> Option<&mut (dyn Component + 'static)> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation {
            return None;
        }
        slot.component.as_deref_mut()
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live ids in ascending slot order.
    pub fn ids(&self) -> Vec<ComponentId> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.component.is_some())
            .map(|(index, slot)| ComponentId {
                index: index as u32,
                generation: slot.generation,
            })
            .collect()
    }
}

impl fmt::Debug for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Components")
            .field("len", &self.len)
            .field("ids", &self.ids())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{Element, text};

    struct Label(&'static str);

    impl Component for Label {
        fn render(&self, _focused: bool) -> Element {
            text(self.0)
        }
    }

    fn setup() -> Components {
        Components::new()
    }

    #[test]
    fn test_insert_and_get() {
        let mut components = setup();
        let a = components.add(Label("a"));
        let b = components.add(Label("b"));

        assert_ne!(a, b);
        assert_eq!(components.len(), 2);
        assert!(components.contains(a));
        assert!(components.get(b).is_some());
    }

    #[test]
    fn test_remove_frees_slot() {
        let mut components = setup();
        let a = components.add(Label("a"));

        assert!(components.remove(a).is_some());
        assert!(components.remove(a).is_none());
        assert!(components.is_empty());
        assert!(!components.contains(a));
    }

    #[test]
    fn test_stale_id_does_not_reach_recycled_slot() {
        let mut components = setup();
        let old = components.add(Label("old"));
        components.remove(old);
        let new = components.add(Label("new"));

        assert_eq!(old.index(), new.index());
        assert!(components.get(old).is_none());
        assert!(components.get_mut(old).is_none());
        assert!(components.get(new).is_some());
    }

    #[test]
    fn test_ids_ascending() {
        let mut components = setup();
        let a = components.add(Label("a"));
        let b = components.add(Label("b"));
        let c = components.add(Label("c"));
        components.remove(b);

        assert_eq!(components.ids(), vec![a, c]);

        let d = components.add(Label("d"));
        assert_eq!(components.ids(), vec![a, d, c]);
    }
}
