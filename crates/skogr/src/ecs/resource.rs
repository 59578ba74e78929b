//! Type-keyed singletons stored next to the entities.
//!
//! `Time`, `Input<Key>`, the game tuning and the player's bookkeeping live
//! here. They are kept in their own struct so the registry can lend them to a
//! running component while it also holds that component's entity mutably.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

#[derive(Default)]
pub struct Resources {
    map: HashMap<TypeId, Box<dyn Any>>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resource, replacing any previous value of the same type.
    pub fn insert<T: 'static + Send + Sync>(&mut self, value: T) {
        self.map.insert(TypeId::of::<T>(), Box::new(value));
    }

    pub fn get<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    pub fn get_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut::<T>())
    }

    /// # Panics
    ///
    /// Panics if the resource hasn't been inserted.
    pub fn expect<T: 'static + Send + Sync>(&self) -> &T {
        self.get::<T>().unwrap_or_else(|| missing::<T>())
    }

    /// # Panics
    ///
    /// Panics if the resource hasn't been inserted.
    pub fn expect_mut<T: 'static + Send + Sync>(&mut self) -> &mut T {
        self.get_mut::<T>().unwrap_or_else(|| missing::<T>())
    }

    pub fn contains<T: 'static + Send + Sync>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    pub fn remove<T: 'static + Send + Sync>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast::<T>().ok())
            .map(|boxed| *boxed)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn missing<T>() -> ! {
    panic!(
        "Resource `{}` not found. Did you forget to insert it?",
        type_name::<T>()
    )
}
