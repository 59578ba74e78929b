//! # Registry — owner of every entity
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Registry                                                     │
//! │                                                              │
//! │  records:  [Some(rec 0v2), None, Some(rec 2v0), …]           │
//! │            arena indexed by Entity::index                    │
//! │  order:    [2v0, 0v2, …]     primary order (= update order)  │
//! │  groups:   [[…], [0v2], …]   one handle list per Group       │
//! │  types:    TypeId → slot     shared by all records           │
//! │  resources, commands                                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frame contract
//!
//! ```text
//! refresh()  drop stale group entries, then remove inactive entities
//! update()   every entity in primary order, then queued commands
//! draw*()    whole registry, or one group index at a time
//! ```
//!
//! `destroy()` never removes anything by itself. It only clears the active
//! flag; the record lives until the next `refresh()`. `update()` and the draw
//! passes do not look at the flag either, so callers are expected to call
//! `refresh()` first each frame.
//!
//! ## Group indices
//!
//! A group index is an ordered list of handles, appended to when an entity
//! joins. Leaving a group (or being destroyed) does not touch the list; the
//! stale entry stays visible until `refresh()` filters it. A fresh view of a
//! group is therefore only guaranteed right after `refresh()`.

use std::any::type_name;

use super::commands::Commands;
use super::component::{Component, ComponentTypes, short_type_name};
use super::entity::{Entity, EntityAllocator};
use super::entity_mut::{EntityMut, EntityRef};
use super::error::EcsError;
use super::group::Group;
use super::record::EntityRecord;
use super::resource::Resources;
use crate::config::EcsConfig;
use crate::platform::Canvas;

pub struct Registry {
    pub(crate) config: EcsConfig,
    pub(crate) allocator: EntityAllocator,
    pub(crate) records: Vec<Option<EntityRecord>>,
    pub(crate) order: Vec<Entity>,
    pub(crate) groups: Vec<Vec<Entity>>,
    pub(crate) types: ComponentTypes,
    pub(crate) resources: Resources,
    pub(crate) commands: Commands,
    #[cfg(feature = "diagnostics")]
    pub(crate) spawned_this_frame: u32,
    #[cfg(feature = "diagnostics")]
    pub(crate) removed_this_frame: u32,
}

pub(crate) fn lookup(records: &[Option<EntityRecord>], entity: Entity) -> Option<&EntityRecord> {
    records
        .get(entity.index as usize)?
        .as_ref()
        .filter(|record| record.entity == entity)
}

pub(crate) fn lookup_mut(
    records: &mut [Option<EntityRecord>],
    entity: Entity,
) -> Option<&mut EntityRecord> {
    records
        .get_mut(entity.index as usize)?
        .as_mut()
        .filter(|record| record.entity == entity)
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(EcsConfig::default())
    }

    pub fn with_config(config: EcsConfig) -> Self {
        Self {
            config,
            allocator: EntityAllocator::new(),
            records: Vec::new(),
            order: Vec::new(),
            groups: vec![Vec::new(); config.max_groups],
            types: ComponentTypes::new(config.max_components),
            resources: Resources::new(),
            commands: Commands::new(),
            #[cfg(feature = "diagnostics")]
            spawned_this_frame: 0,
            #[cfg(feature = "diagnostics")]
            removed_this_frame: 0,
        }
    }

    pub fn config(&self) -> &EcsConfig {
        &self.config
    }

    // ── Entities ─────────────────────────────────────────────────────

    /// Create an empty, active entity at the end of the primary order.
    ///
    /// ```ignore
    /// let player = registry
    ///     .add_entity()
    ///     .with_component(Transform::at(144.0, 48.0))
    ///     .with_group(Role::Player)
    ///     .id();
    /// ```
    pub fn add_entity(&mut self) -> EntityMut<'_> {
        let entity = self.allocator.allocate();
        let record = EntityRecord::new(entity, self.config.max_components, self.config.max_groups);
        let index = entity.index as usize;
        if index == self.records.len() {
            self.records.push(Some(record));
        } else {
            self.records[index] = Some(record);
        }
        self.order.push(entity);
        #[cfg(feature = "diagnostics")]
        {
            self.spawned_this_frame += 1;
        }
        log::trace!("added entity {entity}");
        EntityMut::new(self, entity)
    }

    pub fn entity(&self, entity: Entity) -> Option<EntityRef<'_>> {
        lookup(&self.records, entity).map(|_| EntityRef::new(self, entity))
    }

    pub fn entity_mut(&mut self, entity: Entity) -> Option<EntityMut<'_>> {
        if lookup(&self.records, entity).is_some() {
            Some(EntityMut::new(self, entity))
        } else {
            None
        }
    }

    /// `true` until the entity is removed by `refresh()`, even if destroyed.
    pub fn is_alive(&self, entity: Entity) -> bool {
        lookup(&self.records, entity).is_some()
    }

    /// `true` if the entity exists and has not been destroyed.
    pub fn is_active(&self, entity: Entity) -> bool {
        lookup(&self.records, entity).is_some_and(|record| record.active)
    }

    /// Mark an entity for removal at the next `refresh()`.
    pub fn destroy(&mut self, entity: Entity) -> Result<(), EcsError> {
        let record = lookup_mut(&mut self.records, entity).ok_or(EcsError::EntityNotFound(entity))?;
        record.active = false;
        Ok(())
    }

    /// Entities in primary order, including destroyed ones not yet refreshed.
    pub fn entities(&self) -> &[Entity] {
        &self.order
    }

    pub fn entity_count(&self) -> usize {
        self.order.len()
    }

    pub fn component_types(&self) -> &ComponentTypes {
        &self.types
    }

    // ── Components by handle ─────────────────────────────────────────

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        lookup(&self.records, entity).is_some_and(|record| record.has::<T>(&self.types))
    }

    pub fn try_get_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        let record = lookup(&self.records, entity).ok_or(EcsError::EntityNotFound(entity))?;
        record
            .get::<T>(&self.types)
            .ok_or_else(|| not_found::<T>(entity))
    }

    pub fn try_get_component_mut<T: Component>(
        &mut self,
        entity: Entity,
    ) -> Result<&mut T, EcsError> {
        let record =
            lookup_mut(&mut self.records, entity).ok_or(EcsError::EntityNotFound(entity))?;
        record
            .get_mut::<T>(&self.types)
            .ok_or_else(|| not_found::<T>(entity))
    }

    /// # Panics
    ///
    /// Panics if the entity is gone or has no `T`.
    pub fn get_component<T: Component>(&self, entity: Entity) -> &T {
        self.try_get_component::<T>(entity)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// # Panics
    ///
    /// Panics if the entity is gone or has no `T`.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        self.try_get_component_mut::<T>(entity)
            .unwrap_or_else(|err| panic!("{err}"))
    }

    // ── Frame passes ─────────────────────────────────────────────────

    /// Run `update()` on every entity in primary order, then apply whatever
    /// the components queued on [`Commands`].
    pub fn update(&mut self) {
        let Self {
            records,
            order,
            types,
            resources,
            commands,
            ..
        } = self;
        for &entity in order.iter() {
            if let Some(record) = lookup_mut(records, entity) {
                record.update(types, resources, commands);
            }
        }
        self.apply_commands();
    }

    /// Run `draw()` on every entity in primary order.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for &entity in &self.order {
            if let Some(record) = lookup(&self.records, entity) {
                record.draw(canvas);
            }
        }
    }

    /// Run `draw()` on the members of one group, in index order. Entries for
    /// entities that no longer exist are skipped.
    pub fn draw_group(&self, group: impl Into<Group>, canvas: &mut dyn Canvas) {
        for &entity in self.group(group) {
            if let Some(record) = lookup(&self.records, entity) {
                record.draw(canvas);
            }
        }
    }

    /// Compact the registry.
    ///
    /// 1. Every group index drops handles whose entity is inactive, gone, or
    ///    no longer claims the group. Survivors keep their order.
    /// 2. Inactive entities leave the primary order; their records (and
    ///    components) are dropped and their handles go stale.
    pub fn refresh(&mut self) {
        let records = &self.records;
        let mut purged = 0;
        for (index, members) in self.groups.iter_mut().enumerate() {
            let group = Group::new(index);
            let before = members.len();
            members.retain(|&entity| {
                lookup(records, entity)
                    .is_some_and(|record| record.active && record.has_group(group))
            });
            purged += before - members.len();
        }

        let records = &mut self.records;
        let allocator = &mut self.allocator;
        let mut removed = 0u32;
        self.order.retain(|&entity| {
            let Some(slot) = records.get_mut(entity.index as usize) else {
                return false;
            };
            if let Some(record) = slot.as_mut().filter(|record| record.active) {
                record.settle();
                return true;
            }
            *slot = None;
            allocator.release(entity);
            removed += 1;
            false
        });

        #[cfg(feature = "diagnostics")]
        {
            self.removed_this_frame += removed;
        }
        if removed > 0 || purged > 0 {
            log::debug!("refresh: removed {removed} entities, purged {purged} group entries");
        }
    }

    /// Remove every entity immediately, skipping the deferred path. Resources
    /// and component type slots are kept.
    pub fn despawn_all(&mut self) {
        let count = self.order.len();
        for entity in self.order.drain(..) {
            self.allocator.release(entity);
        }
        self.records.iter_mut().for_each(|slot| *slot = None);
        self.groups.iter_mut().for_each(Vec::clear);
        #[cfg(feature = "diagnostics")]
        {
            self.removed_this_frame += count as u32;
        }
        log::debug!("despawned all {count} entities");
    }

    // ── Groups ───────────────────────────────────────────────────────

    fn group_index_mut(&mut self, group: Group) -> Result<&mut Vec<Entity>, EcsError> {
        let max = self.config.max_groups;
        self.groups
            .get_mut(group.index())
            .ok_or(EcsError::GroupCapacity { group, max })
    }

    /// Append `entity` to a group index. No de-duplication happens here, and
    /// the membership bit is not touched; [`EntityMut::add_group`] is the
    /// idempotent way to join.
    ///
    /// # Panics
    ///
    /// Panics if `group` is beyond `max_groups`.
    pub fn add_to_group(&mut self, entity: Entity, group: impl Into<Group>) {
        let group = group.into();
        match self.group_index_mut(group) {
            Ok(members) => members.push(entity),
            Err(err) => panic!("{err}"),
        }
    }

    /// Index a new member of `group`. A first-time member is appended
    /// directly; one that left since the last `refresh()` may still be listed,
    /// so the index is searched first.
    pub(crate) fn index_member(
        &mut self,
        entity: Entity,
        group: Group,
        rejoined: bool,
    ) -> Result<(), EcsError> {
        let members = self.group_index_mut(group)?;
        if !(rejoined && members.contains(&entity)) {
            members.push(entity);
        }
        Ok(())
    }

    /// The current index for `group`. Out-of-range groups read as empty.
    pub fn group(&self, group: impl Into<Group>) -> &[Entity] {
        self.groups
            .get(group.into().index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// # Panics
    ///
    /// Panics if `group` is beyond `max_groups`.
    pub fn group_mut(&mut self, group: impl Into<Group>) -> &mut Vec<Entity> {
        let group = group.into();
        match self.group_index_mut(group) {
            Ok(members) => members,
            Err(err) => panic!("{err}"),
        }
    }

    // ── Resources ────────────────────────────────────────────────────

    /// Insert a resource, replacing any existing one of the same type.
    pub fn insert_resource<T: 'static + Send + Sync>(&mut self, value: T) {
        self.resources.insert(value);
    }

    /// # Panics
    ///
    /// Panics if the resource hasn't been inserted.
    pub fn resource<T: 'static + Send + Sync>(&self) -> &T {
        self.resources.expect::<T>()
    }

    /// # Panics
    ///
    /// Panics if the resource hasn't been inserted.
    pub fn resource_mut<T: 'static + Send + Sync>(&mut self) -> &mut T {
        self.resources.expect_mut::<T>()
    }

    pub fn get_resource<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.resources.get::<T>()
    }

    pub fn get_resource_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.resources.get_mut::<T>()
    }

    pub fn has_resource<T: 'static + Send + Sync>(&self) -> bool {
        self.resources.contains::<T>()
    }

    pub fn resource_remove<T: 'static + Send + Sync>(&mut self) -> Option<T> {
        self.resources.remove::<T>()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn commands(&mut self) -> &mut Commands {
        &mut self.commands
    }

    /// Queue `command` for the next [`apply_commands`](Self::apply_commands),
    /// which `update()` runs at the end of its pass.
    pub fn defer<F>(&mut self, command: F)
    where
        F: FnOnce(&mut Registry) + 'static,
    {
        self.commands.push(command);
    }

    /// Apply queued commands until the queue stays empty.
    pub fn apply_commands(&mut self) {
        loop {
            let queued = self.commands.take();
            if queued.is_empty() {
                break;
            }
            log::trace!("applying {} deferred commands", queued.len());
            for command in queued {
                command(self);
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn not_found<T>(entity: Entity) -> EcsError {
    EcsError::ComponentNotFound {
        component: short_type_name(type_name::<T>()),
        entity,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::ecs::ComponentCtx;

    const MONSTERS: Group = Group::new(1);
    const PROJECTILES: Group = Group::new(2);

    #[derive(Debug, PartialEq)]
    struct Hp(i32);
    impl Component for Hp {}

    /// Appends its label to a shared log on every update.
    struct Trace {
        label: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Component for Trace {
        fn update(&mut self, _ctx: &mut ComponentCtx<'_>) {
            self.log.borrow_mut().push(self.label);
        }
    }

    struct Marker;
    impl Component for Marker {}

    #[test]
    fn add_then_get_returns_the_attached_instance() {
        let mut registry = Registry::new();
        let e = registry.add_entity().with_component(Hp(10)).id();
        assert!(registry.has_component::<Hp>(e));
        assert_eq!(registry.get_component::<Hp>(e), &Hp(10));
        registry.get_component_mut::<Hp>(e).0 -= 3;
        assert_eq!(registry.get_component::<Hp>(e).0, 7);
    }

    #[test]
    fn missing_component_is_reported() {
        let mut registry = Registry::new();
        let e = registry.add_entity().id();
        let err = registry.try_get_component::<Hp>(e).unwrap_err();
        assert_eq!(
            err,
            EcsError::ComponentNotFound {
                component: "Hp",
                entity: e
            }
        );
        assert!(!registry.has_component::<Hp>(e));
    }

    #[test]
    #[should_panic(expected = "has no `Hp` component")]
    fn get_component_panics_when_missing() {
        let mut registry = Registry::new();
        let e = registry.add_entity().id();
        registry.get_component::<Hp>(e);
    }

    #[test]
    fn update_runs_components_in_attachment_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = Registry::new();
        registry
            .add_entity()
            .with_component(Trace { label: "a", log: log.clone() })
            .with_component(Hp(1))
            .with_component(Marker)
            .with_component(Trace2 { log: log.clone() });
        registry
            .add_entity()
            .with_component(Trace { label: "c", log: log.clone() });

        registry.update();
        registry.update();
        assert_eq!(*log.borrow(), vec!["a", "b", "c", "a", "b", "c"]);
    }

    struct Trace2 {
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Component for Trace2 {
        fn update(&mut self, _ctx: &mut ComponentCtx<'_>) {
            self.log.borrow_mut().push("b");
        }
    }

    #[test]
    fn destroy_keeps_entity_until_refresh() {
        let mut registry = Registry::new();
        let e = registry.add_entity().with_group(MONSTERS).id();
        registry.destroy(e).unwrap();

        assert!(registry.is_alive(e));
        assert!(!registry.is_active(e));
        assert_eq!(registry.group(MONSTERS), &[e]);

        registry.refresh();
        assert!(!registry.is_alive(e));
        assert!(registry.group(MONSTERS).is_empty());
        assert_eq!(registry.entity_count(), 0);
        assert_eq!(registry.destroy(e), Err(EcsError::EntityNotFound(e)));
    }

    #[test]
    fn destroyed_entity_leaves_every_group() {
        let mut registry = Registry::new();
        let keep = registry.add_entity().with_group(MONSTERS).id();
        let gone = registry
            .add_entity()
            .with_group(MONSTERS)
            .with_group(PROJECTILES)
            .id();
        registry.entity_mut(gone).unwrap().destroy();
        registry.refresh();

        assert_eq!(registry.group(MONSTERS), &[keep]);
        assert!(registry.group(PROJECTILES).is_empty());
        assert_eq!(registry.entities(), &[keep]);
    }

    #[test]
    fn stale_handle_does_not_reach_recycled_slot() {
        let mut registry = Registry::new();
        let old = registry.add_entity().with_component(Hp(1)).id();
        registry.destroy(old).unwrap();
        registry.refresh();

        let new = registry.add_entity().with_component(Hp(2)).id();
        assert_eq!(new.index(), old.index());
        assert_ne!(new, old);
        assert!(registry.entity(old).is_none());
        assert_eq!(
            registry.try_get_component::<Hp>(old),
            Err(EcsError::EntityNotFound(old))
        );
        assert_eq!(registry.get_component::<Hp>(new).0, 2);
    }

    #[test]
    fn refresh_keeps_survivor_order() {
        let mut registry = Registry::new();
        let ids: Vec<Entity> = (0..5)
            .map(|_| registry.add_entity().with_group(MONSTERS).id())
            .collect();
        registry.destroy(ids[1]).unwrap();
        registry.destroy(ids[3]).unwrap();
        registry.refresh();
        assert_eq!(registry.group(MONSTERS), &[ids[0], ids[2], ids[4]]);
        assert_eq!(registry.entities(), &[ids[0], ids[2], ids[4]]);
    }

    #[test]
    fn leaving_a_group_is_applied_at_refresh() {
        let mut registry = Registry::new();
        let e = registry.add_entity().with_group(MONSTERS).id();
        registry.entity_mut(e).unwrap().del_group(MONSTERS);
        assert_eq!(registry.group(MONSTERS), &[e]);
        registry.refresh();
        assert!(registry.group(MONSTERS).is_empty());
        assert!(registry.is_active(e));
    }

    #[test]
    fn raw_add_to_group_appends_and_refresh_filters_non_members() {
        let mut registry = Registry::new();
        let member = registry.add_entity().with_group(MONSTERS).id();
        let outsider = registry.add_entity().id();
        registry.add_to_group(member, MONSTERS);
        registry.add_to_group(outsider, MONSTERS);
        assert_eq!(registry.group(MONSTERS).len(), 3);

        registry.refresh();
        // the raw duplicate still claims the group, the outsider does not
        assert_eq!(registry.group(MONSTERS), &[member, member]);
    }

    #[test]
    fn out_of_range_group_reads_empty() {
        let registry = Registry::with_config(EcsConfig {
            max_components: 4,
            max_groups: 2,
        });
        assert!(registry.group(Group::new(9)).is_empty());
    }

    #[test]
    #[should_panic(expected = "group 5 is out of range")]
    fn out_of_range_add_to_group_panics() {
        let mut registry = Registry::with_config(EcsConfig {
            max_components: 4,
            max_groups: 2,
        });
        let e = registry.add_entity().id();
        registry.add_to_group(e, Group::new(5));
    }

    #[test]
    fn draw_group_skips_removed_entries() {
        use crate::platform::RecordingCanvas;

        struct Dot;
        impl Component for Dot {
            fn draw(&self, canvas: &mut dyn Canvas) {
                canvas.draw_rect(crate::math::Rect::new(0.0, 0.0, 1.0, 1.0));
            }
        }

        let mut registry = Registry::new();
        let a = registry.add_entity().with_component(Dot).with_group(MONSTERS).id();
        let b = registry.add_entity().with_component(Dot).id();
        registry.destroy(b).unwrap();
        registry.refresh();
        // appended after b was removed, so the entry points at nothing
        registry.add_to_group(b, MONSTERS);
        assert_eq!(registry.group(MONSTERS), &[a, b]);

        let mut canvas = RecordingCanvas::default();
        registry.draw_group(MONSTERS, &mut canvas);
        assert_eq!(canvas.rects.len(), 1);

        canvas.rects.clear();
        registry.draw(&mut canvas);
        assert_eq!(canvas.rects.len(), 1);
    }

    #[test]
    fn commands_run_after_the_update_pass() {
        struct Spawner;
        impl Component for Spawner {
            fn update(&mut self, ctx: &mut ComponentCtx<'_>) {
                ctx.commands().push(|registry: &mut Registry| {
                    registry.add_entity().with_component(Marker).with_group(PROJECTILES);
                });
            }
        }

        let mut registry = Registry::new();
        registry.add_entity().with_component(Spawner);
        registry.update();
        assert_eq!(registry.entity_count(), 2);
        assert_eq!(registry.group(PROJECTILES).len(), 1);
        assert!(registry.commands().is_empty());
    }

    #[test]
    fn deferred_commands_wait_for_apply() {
        let mut registry = Registry::new();
        let e = registry.add_entity().id();
        registry.defer(move |registry: &mut Registry| {
            registry.destroy(e).unwrap();
        });
        assert!(registry.is_active(e));
        registry.apply_commands();
        assert!(!registry.is_active(e));
    }

    #[test]
    fn despawn_all_empties_everything_at_once() {
        let mut registry = Registry::new();
        let a = registry.add_entity().with_component(Marker).with_group(PROJECTILES).id();
        registry.add_entity().with_group(PROJECTILES);
        registry.insert_resource(1u8);

        registry.despawn_all();
        assert_eq!(registry.entity_count(), 0);
        assert!(registry.group(PROJECTILES).is_empty());
        assert!(!registry.is_alive(a));
        assert!(registry.has_resource::<u8>());

        // slots are recycled, old handles stay stale
        let b = registry.add_entity().id();
        assert!(b.index() < 2);
        assert!(b.generation() > 0);
        assert!(!registry.is_alive(a));
    }

    #[test]
    fn resources_round_trip() {
        let mut registry = Registry::new();
        registry.insert_resource(3u8);
        *registry.resource_mut::<u8>() += 1;
        assert_eq!(*registry.resource::<u8>(), 4);
        assert!(registry.has_resource::<u8>());
        assert_eq!(registry.resource_remove::<u8>(), Some(4));
        assert!(registry.get_resource::<u8>().is_none());
    }
}
