//! Keyboard state.
//!
//! A [`Platform`](crate::platform::Platform) turns device events into
//! [`Input::press`] / [`Input::release`] calls; components read held keys and
//! the keys that went down this frame. The game only ever sees [`Key`]s.

use std::collections::HashSet;
use std::hash::Hash;

/// Logical keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Fire,
}

#[derive(Debug)]
pub struct Input<T: Eq + Hash + Copy> {
    held: HashSet<T>,
    /// Went down since the last `clear_just()`.
    down_edges: HashSet<T>,
}

impl<T: Eq + Hash + Copy> Input<T> {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            down_edges: HashSet::new(),
        }
    }

    pub fn pressed(&self, key: T) -> bool {
        self.held.contains(&key)
    }

    pub fn just_pressed(&self, key: T) -> bool {
        self.down_edges.contains(&key)
    }

    /// Record a key-down. Auto-repeat of a held key is not a new edge.
    pub fn press(&mut self, key: T) {
        if self.held.insert(key) {
            self.down_edges.insert(key);
        }
    }

    pub fn release(&mut self, key: T) {
        self.held.remove(&key);
    }

    /// Forget this frame's edges. Called before polling each frame.
    pub fn clear_just(&mut self) {
        self.down_edges.clear();
    }
}

impl<T: Eq + Hash + Copy> Default for Input<T> {
    fn default() -> Self {
        Self::new()
    }
}
