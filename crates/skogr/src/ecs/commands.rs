//! Deferred structural changes.
//!
//! A component running inside `Registry::update()` can see its own entity and
//! the resources, but not the registry itself. Anything that would reshape the
//! registry (spawning a projectile, destroying some other entity) is pushed
//! here and applied once every entity has been updated.

use std::fmt;

use super::entity::Entity;
use super::registry::Registry;

type Command = Box<dyn FnOnce(&mut Registry)>;

#[derive(Default)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an arbitrary registry mutation.
    pub fn push<F>(&mut self, command: F)
    where
        F: FnOnce(&mut Registry) + 'static,
    {
        self.queue.push(Box::new(command));
    }

    /// Queue a `destroy()` of another entity. Stale handles are ignored.
    pub fn destroy(&mut self, entity: Entity) {
        self.push(move |registry| {
            if let Some(mut e) = registry.entity_mut(entity) {
                e.destroy();
            }
        });
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.queue)
    }
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commands")
            .field("queued", &self.queue.len())
            .finish()
    }
}
