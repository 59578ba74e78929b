//! Diagnostics snapshots.
//!
//! Enabled by the `diagnostics` feature flag. [`Registry::snapshot`] collects
//! container statistics into a serializable struct; [`Game::snapshot`] adds
//! frame timing and the schedule's per-system timings on top. Both render to
//! JSON for logging or shipping to an external viewer.

use serde::Serialize;

use crate::ecs::{Registry, SystemTiming};
use crate::game::Game;
use crate::role::Role;
use crate::time::Time;

#[derive(Debug, Clone, Serialize)]
pub struct RegistrySnapshot {
    pub entity_count: usize,
    pub inactive_count: usize,
    pub groups: Vec<GroupSnapshot>,
    pub component_types: Vec<&'static str>,
    pub entity_pool: EntityPoolSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSnapshot {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Entries in the index, stale ones included.
    pub len: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityPoolSnapshot {
    pub total_slots: usize,
    pub free_count: usize,
    pub alive_count: usize,
    pub spawned_this_frame: u32,
    pub removed_this_frame: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub frame_count: u64,
    pub fps: f32,
    pub delta_ms: f32,
    pub registry: RegistrySnapshot,
    pub system_timings: Vec<SystemTiming>,
}

fn to_json<T: Serialize>(value: &T) -> String {
    // plain data with string keys; serialization cannot fail
    serde_json::to_string(value).unwrap_or_default()
}

impl RegistrySnapshot {
    pub fn to_json(&self) -> String {
        to_json(self)
    }
}

impl FrameSnapshot {
    pub fn to_json(&self) -> String {
        to_json(self)
    }
}

impl Registry {
    pub fn snapshot(&self) -> RegistrySnapshot {
        let inactive_count = self
            .records
            .iter()
            .flatten()
            .filter(|record| !record.active)
            .count();

        let groups = self
            .groups
            .iter()
            .enumerate()
            .filter(|(_, members)| !members.is_empty())
            .map(|(index, members)| GroupSnapshot {
                index,
                role: Role::ALL.get(index).copied(),
                len: members.len(),
            })
            .collect();

        let component_types = (0..self.types.len())
            .filter_map(|slot| self.types.name(slot))
            .collect();

        RegistrySnapshot {
            entity_count: self.order.len(),
            inactive_count,
            groups,
            component_types,
            entity_pool: EntityPoolSnapshot {
                total_slots: self.allocator.total_slots(),
                free_count: self.allocator.free_count(),
                alive_count: self.allocator.alive_count(),
                spawned_this_frame: self.spawned_this_frame,
                removed_this_frame: self.removed_this_frame,
            },
        }
    }

    /// Zero the spawned/removed counters. Called at the start of each frame.
    pub fn reset_frame_counters(&mut self) {
        self.spawned_this_frame = 0;
        self.removed_this_frame = 0;
    }
}

impl Game {
    pub fn snapshot(&self) -> FrameSnapshot {
        let registry = self.registry();
        let (frame_count, fps, delta_ms) = registry
            .get_resource::<Time>()
            .map_or((0, 0.0, 0.0), |time| {
                (time.frame_count(), time.fps(), time.delta_secs() * 1000.0)
            });
        FrameSnapshot {
            frame_count,
            fps,
            delta_ms,
            registry: registry.snapshot(),
            system_timings: self.schedule().timings().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::components::Transform;
    use crate::config::GameConfig;
    use crate::platform::{RecordingCanvas, ScriptedPlatform};
    use crate::spawn::ArenaMap;

    #[test]
    fn snapshot_counts_inactive_until_refresh() {
        let mut registry = Registry::new();
        let a = registry.add_entity().with_component(Transform::at(0.0, 0.0)).id();
        registry
            .add_entity()
            .with_component(Transform::at(1.0, 1.0))
            .with_group(Role::Monster);
        registry.destroy(a).unwrap();

        let snap = registry.snapshot();
        assert_eq!(snap.entity_count, 2);
        assert_eq!(snap.inactive_count, 1);
        assert_eq!(snap.component_types, vec!["Transform"]);
        assert_eq!(snap.groups.len(), 1);
        assert_eq!(snap.groups[0].role, Some(Role::Monster));
        assert_eq!(snap.entity_pool.spawned_this_frame, 2);

        registry.refresh();
        let snap = registry.snapshot();
        assert_eq!(snap.entity_count, 1);
        assert_eq!(snap.inactive_count, 0);
        assert_eq!(snap.entity_pool.free_count, 1);
        assert_eq!(snap.entity_pool.removed_this_frame, 1);

        registry.reset_frame_counters();
        let snap = registry.snapshot();
        assert_eq!(snap.entity_pool.spawned_this_frame, 0);
        assert_eq!(snap.entity_pool.removed_this_frame, 0);
    }

    #[test]
    fn frame_snapshot_serializes_with_timings() {
        let config = GameConfig {
            seed: Some(5),
            ..GameConfig::default()
        };
        let (mut game, _) = Game::arena(config, &ArenaMap::walled(5)).unwrap();
        let mut platform = ScriptedPlatform::new().idle(2);
        let mut canvas = RecordingCanvas::default();
        game.step(Duration::from_millis(20), &mut platform, &mut canvas);
        game.step(Duration::from_millis(20), &mut platform, &mut canvas);

        let snap = game.snapshot();
        assert_eq!(snap.frame_count, 2);
        assert_eq!(snap.system_timings.len(), 3);
        assert_eq!(snap.system_timings[0].name, "track_player");

        let json: serde_json::Value = serde_json::from_str(&snap.to_json()).unwrap();
        assert_eq!(json["registry"]["entity_count"], snap.registry.entity_count);
        assert!(json["system_timings"].is_array());
    }
}
