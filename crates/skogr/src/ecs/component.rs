//! # Component — behavior attached to an entity
//!
//! Unlike a pure-data ECS, a component here carries its own per-frame
//! behavior. The registry drives three hooks:
//!
//! ```text
//! add_component ──► init()      once, right after attachment
//! update()      ──► update()    every frame, in attachment order
//! draw()        ──► draw()      every frame, in attachment order
//! ```
//!
//! A hook receives a [`ComponentCtx`]: the owning entity, its *other*
//! components, the registry's resources and a [`Commands`] queue. The running
//! component is taken out of its slot for the duration of the call, so it can
//! borrow siblings mutably without aliasing itself.
//!
//! ## Type slots
//!
//! Each distinct component type gets a dense slot index the first time it is
//! attached anywhere in the registry. The slot is both the bit in the
//! entity's component mask and the index into its position table, which is
//! what makes `has_component`/`get_component` O(1). The number of slots is
//! bounded by [`EcsConfig::max_components`](crate::config::EcsConfig).

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

use super::commands::Commands;
use super::entity::Entity;
use super::error::EcsError;
use super::group::Group;
use super::record::EntityRecord;
use super::resource::Resources;
use crate::platform::Canvas;

/// Upcast helper so a `&dyn Component` can be downcast to its concrete type.
///
/// Implemented for every `'static` type. Call it on `&dyn Component`, never on
/// a `Box<dyn Component>`: the box is `Any` too and would answer for itself.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A unit of per-entity state and behavior.
///
/// All hooks default to doing nothing, so a plain data struct only needs an
/// empty `impl Component for Foo {}`.
pub trait Component: AsAny + 'static {
    /// Runs once, immediately after the component is attached. Components
    /// attached earlier on the same entity are already reachable through `ctx`.
    fn init(&mut self, _ctx: &mut ComponentCtx<'_>) {}

    /// Runs once per frame from [`Registry::update`](super::Registry::update).
    fn update(&mut self, _ctx: &mut ComponentCtx<'_>) {}

    /// Runs once per frame from the registry's draw passes.
    fn draw(&self, _canvas: &mut dyn Canvas) {}
}

pub(crate) fn downcast_ref<'a, T: Component>(
    component: &'a (dyn Component + 'static),
) -> Option<&'a T> {
    component.as_any().downcast_ref::<T>()
}

pub(crate) fn downcast_mut<'a, T: Component>(
    component: &'a mut (dyn Component + 'static),
) -> Option<&'a mut T> {
    component.as_any_mut().downcast_mut::<T>()
}

// ── ComponentTypes ──────────────────────────────────────────────────────

/// Assigns each component type a dense slot, in order of first use.
pub struct ComponentTypes {
    slots: HashMap<TypeId, usize>,
    names: Vec<&'static str>,
    max: usize,
}

impl ComponentTypes {
    pub(crate) fn new(max: usize) -> Self {
        Self {
            slots: HashMap::new(),
            names: Vec::new(),
            max,
        }
    }

    /// Slot for `T`, assigning the next free one on first use.
    pub(crate) fn register<T: Component>(&mut self) -> Result<usize, EcsError> {
        if let Some(&slot) = self.slots.get(&TypeId::of::<T>()) {
            return Ok(slot);
        }
        let slot = self.names.len();
        if slot >= self.max {
            return Err(EcsError::ComponentCapacity { max: self.max });
        }
        self.slots.insert(TypeId::of::<T>(), slot);
        self.names.push(short_type_name(type_name::<T>()));
        log::trace!("component `{}` assigned slot {slot}", self.names[slot]);
        Ok(slot)
    }

    /// Slot for `T`, or `None` if no entity has ever had one.
    pub fn slot<T: Component>(&self) -> Option<usize> {
        self.slots.get(&TypeId::of::<T>()).copied()
    }

    pub fn name(&self, slot: usize) -> Option<&'static str> {
        self.names.get(slot).copied()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max
    }
}

/// `skogr::components::transform::Transform` → `Transform`.
pub(crate) fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

// ── ComponentCtx ────────────────────────────────────────────────────────

/// What a component sees while one of its hooks runs.
pub struct ComponentCtx<'a> {
    pub(crate) record: &'a mut EntityRecord,
    pub(crate) types: &'a ComponentTypes,
    pub(crate) resources: &'a Resources,
    pub(crate) commands: &'a mut Commands,
}

impl ComponentCtx<'_> {
    /// The entity that owns the running component.
    pub fn entity(&self) -> Entity {
        self.record.entity
    }

    /// A sibling component. The running component itself is not reachable.
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.record.get::<T>(self.types)
    }

    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.record.get_mut::<T>(self.types)
    }

    /// Presence check. Also true for the running component's own type.
    pub fn has<T: Component>(&self) -> bool {
        self.record.has::<T>(self.types)
    }

    /// # Panics
    ///
    /// Panics if the resource hasn't been inserted.
    pub fn resource<T: 'static + Send + Sync>(&self) -> &T {
        self.resources.expect::<T>()
    }

    pub fn get_resource<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.resources.get::<T>()
    }

    pub fn has_group(&self, group: impl Into<Group>) -> bool {
        self.record.has_group(group.into())
    }

    pub fn is_active(&self) -> bool {
        self.record.active
    }

    /// Mark the owning entity for removal at the next `refresh()`.
    pub fn destroy(&mut self) {
        self.record.active = false;
    }

    /// Queue work that needs the whole registry.
    pub fn commands(&mut self) -> &mut Commands {
        &mut *self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health(i32);
    impl Component for Health {}

    struct Armor;
    impl Component for Armor {}

    #[test]
    fn slots_are_dense_and_stable() {
        let mut types = ComponentTypes::new(32);
        assert_eq!(types.register::<Health>(), Ok(0));
        assert_eq!(types.register::<Armor>(), Ok(1));
        assert_eq!(types.register::<Health>(), Ok(0));
        assert_eq!(types.slot::<Armor>(), Some(1));
        assert_eq!(types.name(0), Some("Health"));
        assert_eq!(types.len(), 2);
    }

    #[test]
    fn registering_past_capacity_fails() {
        let mut types = ComponentTypes::new(1);
        assert!(types.register::<Health>().is_ok());
        assert_eq!(
            types.register::<Armor>(),
            Err(EcsError::ComponentCapacity { max: 1 })
        );
        assert_eq!(types.slot::<Armor>(), None);
    }

    #[test]
    fn downcast_goes_through_the_trait_object() {
        let boxed: Box<dyn Component> = Box::new(Health(5));
        let health = downcast_ref::<Health>(&*boxed).map(|h| h.0);
        assert_eq!(health, Some(5));
        assert!(downcast_ref::<Armor>(&*boxed).is_none());
    }

    #[test]
    fn mutable_downcast_edits_in_place() {
        let mut boxed: Box<dyn Component> = Box::new(Health(5));
        if let Some(health) = downcast_mut::<Health>(&mut *boxed) {
            health.0 -= 2;
        }
        assert!(downcast_mut::<Armor>(&mut *boxed).is_none());
        let health = downcast_ref::<Health>(&*boxed);
        assert_eq!(health.map(|h| h.0), Some(3));
    }

    #[test]
    fn short_names() {
        assert_eq!(short_type_name("a::b::Sprite"), "Sprite");
        assert_eq!(short_type_name("a::Input<a::Key>"), "Input");
        assert_eq!(short_type_name("Plain"), "Plain");
    }
}
