//! # Entity handles
//!
//! The [`Registry`](super::registry::Registry) owns every entity record. What
//! callers (and group indices) hold is an [`Entity`]: a slot index paired with
//! a generation.
//!
//! ## Why a generation?
//!
//! Entities are destroyed lazily. `destroy()` only flips the active flag, and
//! the record is dropped during the next `refresh()`. After that the slot is
//! handed out again, so a saved handle could silently start pointing at a
//! brand-new monster:
//!
//! ```text
//! frame 1: spawn projectile      → Entity(4v0)
//! frame 2: projectile hits, destroy + refresh, slot 4 freed
//! frame 3: spawn monster         → Entity(4v1)
//!          stale Entity(4v0) no longer matches, lookups return None
//! ```

use std::fmt;

/// Handle to an entity in a [`Registry`](super::registry::Registry).
///
/// Copyable and cheap to store. Only meaningful for the registry that
/// created it, and only until that entity is removed by `refresh()`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl Entity {
    /// Slot index in the registry's record arena.
    pub fn index(self) -> u32 {
        self.index
    }

    /// How many times this slot has been recycled.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Hands out [`Entity`] handles and recycles the slots of removed entities.
///
/// ```text
/// generations: [2, 0, 1]   ← current generation per slot
/// free:        [0]         ← slots released by refresh()
/// ```
#[derive(Default)]
pub(crate) struct EntityAllocator {
    generations: Vec<u32>,
    free: Vec<u32>,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a recycled slot if one exists, otherwise grow by one.
    pub fn allocate(&mut self) -> Entity {
        match self.free.pop() {
            Some(index) => Entity {
                index,
                generation: self.generations[index as usize],
            },
            None => {
                let index = self.generations.len() as u32;
                self.generations.push(0);
                Entity {
                    index,
                    generation: 0,
                }
            }
        }
    }

    /// Release a slot. Returns `false` for a handle that was already stale.
    pub fn release(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.generations[entity.index as usize] += 1;
        self.free.push(entity.index);
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.generations
            .get(entity.index as usize)
            .is_some_and(|&generation| generation == entity.generation)
    }

    #[cfg(any(feature = "diagnostics", test))]
    pub fn alive_count(&self) -> usize {
        self.generations.len() - self.free.len()
    }

    #[cfg(any(feature = "diagnostics", test))]
    pub(crate) fn free_count(&self) -> usize {
        self.free.len()
    }

    #[cfg(any(feature = "diagnostics", test))]
    pub(crate) fn total_slots(&self) -> usize {
        self.generations.len()
    }
}
