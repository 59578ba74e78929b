//! Per-entity storage.
//!
//! ```text
//! EntityRecord
//!   attached:  [Transform, Sprite, Collider]      attachment order
//!   positions: [Some(0), Some(1), None, Some(2)]  type slot → attached index
//!   components: 1101…                              presence bits
//!   groups:     0001…                              membership bits
//!   left:       0000…                              groups left since refresh
//! ```

use super::commands::Commands;
use super::component::{Component, ComponentCtx, ComponentTypes, downcast_mut, downcast_ref};
use super::entity::Entity;
use super::group::Group;
use super::mask::Mask;
use super::resource::Resources;
use crate::platform::Canvas;

struct Attached {
    slot: usize,
    /// `None` only while the component's own hook is running.
    component: Option<Box<dyn Component>>,
}

pub(crate) struct EntityRecord {
    pub entity: Entity,
    pub active: bool,
    attached: Vec<Attached>,
    positions: Vec<Option<usize>>,
    components: Mask,
    groups: Mask,
    /// Groups left since the last `refresh()`. Their index may still hold a
    /// stale entry for this entity.
    left: Mask,
}

impl EntityRecord {
    pub fn new(entity: Entity, max_components: usize, max_groups: usize) -> Self {
        Self {
            entity,
            active: true,
            attached: Vec::new(),
            positions: vec![None; max_components],
            components: Mask::new(max_components),
            groups: Mask::new(max_groups),
            left: Mask::new(max_groups),
        }
    }

    /// Store `component` under `slot` and return its attached index.
    ///
    /// A component already stored under the same slot is swapped out, keeps
    /// its place in the update order, and is returned so the caller can drop
    /// it.
    pub fn attach(
        &mut self,
        slot: usize,
        component: Box<dyn Component>,
    ) -> (usize, Option<Box<dyn Component>>) {
        if let Some(pos) = self.positions[slot] {
            let old = self.attached[pos].component.replace(component);
            return (pos, old);
        }
        let pos = self.attached.len();
        self.attached.push(Attached {
            slot,
            component: Some(component),
        });
        self.positions[slot] = Some(pos);
        self.components.set(slot);
        (pos, None)
    }

    fn position_of<T: Component>(&self, types: &ComponentTypes) -> Option<usize> {
        let slot = types.slot::<T>()?;
        self.positions.get(slot).copied().flatten()
    }

    pub fn get<T: Component>(&self, types: &ComponentTypes) -> Option<&T> {
        let pos = self.position_of::<T>(types)?;
        self.attached[pos]
            .component
            .as_deref()
            .and_then(|c| downcast_ref::<T>(c))
    }

    pub fn get_mut<T: Component>(&mut self, types: &ComponentTypes) -> Option<&mut T> {
        let pos = self.position_of::<T>(types)?;
        self.attached[pos]
            .component
            .as_deref_mut()
            .and_then(|c| downcast_mut::<T>(c))
    }

    pub fn get_at_mut<T: Component>(&mut self, pos: usize) -> Option<&mut T> {
        self.attached
            .get_mut(pos)?
            .component
            .as_deref_mut()
            .and_then(|c| downcast_mut::<T>(c))
    }

    pub fn has<T: Component>(&self, types: &ComponentTypes) -> bool {
        types
            .slot::<T>()
            .is_some_and(|slot| self.components.contains(slot))
    }

    pub fn component_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.attached.iter().map(|a| a.slot)
    }

    pub fn component_count(&self) -> usize {
        self.attached.len()
    }

    // ── Groups ──

    /// Returns `false` if the group is beyond the mask capacity.
    pub fn join(&mut self, group: Group) -> bool {
        self.groups.set(group.index())
    }

    pub fn leave(&mut self, group: Group) {
        if self.groups.contains(group.index()) {
            self.groups.clear(group.index());
            self.left.set(group.index());
        }
    }

    /// Whether the group index may still list this entity from an earlier
    /// membership. Clears the flag.
    pub fn take_left(&mut self, group: Group) -> bool {
        let left = self.left.contains(group.index());
        self.left.clear(group.index());
        left
    }

    /// Forget left groups once `refresh()` has purged their entries.
    pub fn settle(&mut self) {
        self.left = Mask::new(self.left.capacity());
    }

    pub fn has_group(&self, group: Group) -> bool {
        self.groups.contains(group.index())
    }

    pub fn groups(&self) -> impl Iterator<Item = Group> + '_ {
        self.groups.ones().map(Group::new)
    }

    // ── Hooks ──

    pub fn init_at(
        &mut self,
        pos: usize,
        types: &ComponentTypes,
        resources: &Resources,
        commands: &mut Commands,
    ) {
        let Some(mut component) = self.attached[pos].component.take() else {
            return;
        };
        component.init(&mut ComponentCtx {
            record: self,
            types,
            resources,
            commands,
        });
        self.attached[pos].component = Some(component);
    }

    pub fn update(
        &mut self,
        types: &ComponentTypes,
        resources: &Resources,
        commands: &mut Commands,
    ) {
        for pos in 0..self.attached.len() {
            let Some(mut component) = self.attached[pos].component.take() else {
                continue;
            };
            component.update(&mut ComponentCtx {
                record: self,
                types,
                resources,
                commands: &mut *commands,
            });
            self.attached[pos].component = Some(component);
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        for attached in &self.attached {
            if let Some(component) = attached.component.as_deref() {
                component.draw(canvas);
            }
        }
    }
}
