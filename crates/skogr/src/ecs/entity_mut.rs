//! Borrowed views of a single entity.
//!
//! [`EntityMut`] is what `Registry::add_entity` hands back: it borrows the
//! whole registry, so attaching a component can register its type slot, run
//! its `init()` with access to resources, and joining a group can update the
//! registry's index in the same call.

use std::fmt;

use super::component::Component;
use super::entity::Entity;
use super::error::EcsError;
use super::group::Group;
use super::record::EntityRecord;
use super::registry::{Registry, lookup, lookup_mut, not_found};
use crate::platform::Canvas;

fn gone(entity: Entity) -> ! {
    panic!("{}", EcsError::EntityNotFound(entity))
}

/// Read-only view of one entity.
pub struct EntityRef<'r> {
    registry: &'r Registry,
    entity: Entity,
}

impl<'r> EntityRef<'r> {
    pub(crate) fn new(registry: &'r Registry, entity: Entity) -> Self {
        Self { registry, entity }
    }

    fn record(&self) -> &'r EntityRecord {
        lookup(&self.registry.records, self.entity).unwrap_or_else(|| gone(self.entity))
    }

    pub fn id(&self) -> Entity {
        self.entity
    }

    pub fn is_active(&self) -> bool {
        self.record().active
    }

    pub fn has_component<T: Component>(&self) -> bool {
        self.record().has::<T>(&self.registry.types)
    }

    pub fn try_get_component<T: Component>(&self) -> Result<&'r T, EcsError> {
        self.record()
            .get::<T>(&self.registry.types)
            .ok_or_else(|| not_found::<T>(self.entity))
    }

    /// # Panics
    ///
    /// Panics if the entity has no `T`.
    pub fn get_component<T: Component>(&self) -> &'r T {
        self.try_get_component::<T>()
            .unwrap_or_else(|err| panic!("{err}"))
    }

    pub fn has_group(&self, group: impl Into<Group>) -> bool {
        self.record().has_group(group.into())
    }

    pub fn groups(&self) -> Vec<Group> {
        self.record().groups().collect()
    }
}

/// Mutable view of one entity, doubling as a builder.
///
/// ```ignore
/// let spider = registry
///     .add_entity()
///     .with_component(Transform::new(x, y, 64.0, 64.0, scale))
///     .with_component(Collider::follow(ColliderTag::Monster, offset, size))
///     .with_group(Role::Monster)
///     .id();
/// ```
pub struct EntityMut<'r> {
    registry: &'r mut Registry,
    entity: Entity,
}

impl<'r> EntityMut<'r> {
    pub(crate) fn new(registry: &'r mut Registry, entity: Entity) -> Self {
        Self { registry, entity }
    }

    fn record(&self) -> &EntityRecord {
        lookup(&self.registry.records, self.entity).unwrap_or_else(|| gone(self.entity))
    }

    fn record_mut(&mut self) -> &mut EntityRecord {
        lookup_mut(&mut self.registry.records, self.entity).unwrap_or_else(|| gone(self.entity))
    }

    pub fn id(&self) -> Entity {
        self.entity
    }

    // ── Components ──

    /// Attach `component`, run its `init()`, and return it.
    ///
    /// If the entity already has a `T`, the new value takes its place (and its
    /// position in the update order) and the old one is dropped.
    pub fn try_add_component<T: Component>(&mut self, component: T) -> Result<&mut T, EcsError> {
        let entity = self.entity;
        let Registry {
            records,
            types,
            resources,
            commands,
            ..
        } = &mut *self.registry;
        let slot = types.register::<T>()?;
        let record = lookup_mut(records, entity).ok_or(EcsError::EntityNotFound(entity))?;

        let (pos, replaced) = record.attach(slot, Box::new(component));
        if replaced.is_some() {
            log::debug!(
                "entity {entity}: replaced existing `{}` component",
                types.name(slot).unwrap_or("?")
            );
        }
        drop(replaced);

        record.init_at(pos, types, resources, commands);
        record
            .get_at_mut::<T>(pos)
            .ok_or_else(|| not_found::<T>(entity))
    }

    /// # Panics
    ///
    /// Panics if the registry has run out of component type slots.
    pub fn add_component<T: Component>(&mut self, component: T) -> &mut T {
        self.try_add_component(component)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Builder form of [`add_component`](Self::add_component).
    pub fn with_component<T: Component>(mut self, component: T) -> Self {
        self.add_component(component);
        self
    }

    pub fn has_component<T: Component>(&self) -> bool {
        self.record().has::<T>(&self.registry.types)
    }

    pub fn try_get_component<T: Component>(&self) -> Result<&T, EcsError> {
        self.record()
            .get::<T>(&self.registry.types)
            .ok_or_else(|| not_found::<T>(self.entity))
    }

    pub fn try_get_component_mut<T: Component>(&mut self) -> Result<&mut T, EcsError> {
        let entity = self.entity;
        let Registry { records, types, .. } = &mut *self.registry;
        lookup_mut(records, entity)
            .ok_or(EcsError::EntityNotFound(entity))?
            .get_mut::<T>(types)
            .ok_or_else(|| not_found::<T>(entity))
    }

    /// # Panics
    ///
    /// Panics if the entity has no `T`.
    pub fn get_component<T: Component>(&self) -> &T {
        self.try_get_component::<T>()
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// # Panics
    ///
    /// Panics if the entity has no `T`.
    pub fn get_component_mut<T: Component>(&mut self) -> &mut T {
        self.try_get_component_mut::<T>()
            .unwrap_or_else(|err| panic!("{err}"))
    }

    // ── Groups ──

    /// Join `group`: set the membership bit and make sure the registry's
    /// index lists this entity exactly once.
    pub fn try_add_group(&mut self, group: impl Into<Group>) -> Result<(), EcsError> {
        let group = group.into();
        let max = self.registry.config.max_groups;
        let record = self.record_mut();
        if record.has_group(group) {
            return Ok(());
        }
        if !record.join(group) {
            return Err(EcsError::GroupCapacity { group, max });
        }
        let rejoined = record.take_left(group);
        self.registry.index_member(self.entity, group, rejoined)
    }

    /// # Panics
    ///
    /// Panics if `group` is beyond `max_groups`.
    pub fn add_group(&mut self, group: impl Into<Group>) {
        if let Err(err) = self.try_add_group(group) {
            panic!("{err}");
        }
    }

    /// Builder form of [`add_group`](Self::add_group).
    pub fn with_group(mut self, group: impl Into<Group>) -> Self {
        self.add_group(group);
        self
    }

    /// Leave `group`. The registry's index keeps the entry until `refresh()`.
    pub fn del_group(&mut self, group: impl Into<Group>) {
        self.record_mut().leave(group.into());
    }

    pub fn has_group(&self, group: impl Into<Group>) -> bool {
        self.record().has_group(group.into())
    }

    // ── Lifecycle ──

    /// Mark for removal at the next `refresh()`.
    pub fn destroy(&mut self) {
        self.record_mut().active = false;
    }

    pub fn is_active(&self) -> bool {
        self.record().active
    }

    /// Run this entity's components once. Commands they queue stay pending
    /// until the registry applies them.
    pub fn update(&mut self) {
        let entity = self.entity;
        let Registry {
            records,
            types,
            resources,
            commands,
            ..
        } = &mut *self.registry;
        if let Some(record) = lookup_mut(records, entity) {
            record.update(types, resources, commands);
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        self.record().draw(canvas);
    }

    pub fn component_count(&self) -> usize {
        self.record().component_count()
    }
}

impl fmt::Debug for EntityMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self
            .record()
            .component_slots()
            .filter_map(|slot| self.registry.types.name(slot))
            .collect();
        f.debug_struct("EntityMut")
            .field("entity", &self.entity)
            .field("components", &names)
            .finish()
    }
}
