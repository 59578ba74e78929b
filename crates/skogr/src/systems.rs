//! Gameplay rules that look at more than one entity.
//!
//! All three run after `Registry::update()`, in this order:
//!
//! 1. [`track_player`]: monsters pick a speed and head for the player.
//! 2. [`resolve_terrain`]: the player is pushed back out of walls.
//! 3. [`projectile_hits`]: shots kill monsters and break on walls.

use crate::collision::aabb;
use crate::components::{Collider, ColliderTag, Transform};
use crate::ecs::{Entity, Registry, Schedule};
use crate::math::{Rect, Vec2};
use crate::role::Role;
use crate::state::{GameRng, PlayerState};

/// The arena's systems in their required order.
pub fn arena_schedule() -> Schedule {
    Schedule::new()
        .with_system(track_player)
        .with_system(resolve_terrain)
        .with_system(projectile_hits)
}

fn collider_rect(registry: &Registry, entity: Entity) -> Option<Rect> {
    registry
        .try_get_component::<Collider>(entity)
        .ok()
        .map(|c| c.rect)
}

/// Terrain boxes currently indexed, skipping anything that isn't terrain.
fn terrain_rects(registry: &Registry) -> Vec<Rect> {
    registry
        .group(Role::TerrainCollider)
        .iter()
        .filter_map(|&e| registry.try_get_component::<Collider>(e).ok())
        .filter(|c| c.tag == ColliderTag::Terrain)
        .map(|c| c.rect)
        .collect()
}

fn destroy_or_warn(registry: &mut Registry, entity: Entity) {
    if let Err(err) = registry.destroy(entity) {
        log::warn!("{err}");
    }
}

fn player(registry: &Registry) -> Option<(PlayerState, Vec2, Rect)> {
    let state = *registry.get_resource::<PlayerState>()?;
    let position = registry
        .try_get_component::<Transform>(state.player)
        .ok()?
        .position;
    let rect = collider_rect(registry, state.player)?;
    Some((state, position, rect))
}

/// Each monster jitters its speed within its range, then steers one unit per
/// axis toward the player.
pub fn track_player(registry: &mut Registry) {
    let Some((_, target, player_box)) = player(registry) else {
        return;
    };
    let monsters = registry.group(Role::Monster).to_vec();
    for monster in monsters {
        if !registry.is_active(monster) {
            continue;
        }
        if collider_rect(registry, monster).is_some_and(|rect| aabb(&rect, &player_box)) {
            log::info!("monster {monster} is touching the player");
        }

        let range = registry
            .try_get_component::<Transform>(monster)
            .ok()
            .and_then(|t| t.speed_range);
        let jitter = match (range, registry.get_resource_mut::<GameRng>()) {
            (Some((lo, hi)), Some(rng)) => Some(rng.range(lo, hi)),
            _ => None,
        };

        let Ok(transform) = registry.try_get_component_mut::<Transform>(monster) else {
            log::warn!("monster {monster} has no transform");
            continue;
        };
        if let Some(speed) = jitter {
            transform.speed = speed;
        }
        transform.velocity.x = if target.x < transform.position.x { -1.0 } else { 1.0 };
        transform.velocity.y = if target.y < transform.position.y { -1.0 } else { 1.0 };
    }
}

/// Put the player back on its last safe spot if it walked into terrain;
/// otherwise remember where it is.
pub fn resolve_terrain(registry: &mut Registry) {
    let Some((state, position, player_box)) = player(registry) else {
        return;
    };
    let blocked = terrain_rects(registry)
        .iter()
        .any(|rect| aabb(rect, &player_box));

    if !blocked {
        registry.resource_mut::<PlayerState>().last_safe = position;
        return;
    }

    log::info!("player {} bumped into terrain", state.player);
    if let Ok(transform) = registry.try_get_component_mut::<Transform>(state.player) {
        transform.position = state.last_safe;
    }
    if let Ok(collider) = registry.try_get_component_mut::<Collider>(state.player) {
        let offset = player_box.pos() - position;
        collider.rect.x = state.last_safe.x + offset.x;
        collider.rect.y = state.last_safe.y + offset.y;
    }
}

/// A projectile touching a monster destroys both. A projectile touching
/// terrain is destroyed. A projectile is spent after its first hit.
pub fn projectile_hits(registry: &mut Registry) {
    let projectiles = registry.group(Role::Projectile).to_vec();
    let monsters = registry.group(Role::Monster).to_vec();
    let terrain = terrain_rects(registry);

    for projectile in projectiles {
        if !registry.is_active(projectile) {
            continue;
        }
        let Some(shot) = collider_rect(registry, projectile) else {
            continue;
        };

        let victim = monsters.iter().copied().find(|&m| {
            registry.is_active(m)
                && collider_rect(registry, m).is_some_and(|rect| aabb(&rect, &shot))
        });
        if let Some(monster) = victim {
            log::info!("projectile {projectile} hit monster {monster}");
            destroy_or_warn(registry, projectile);
            destroy_or_warn(registry, monster);
            continue;
        }

        if terrain.iter().any(|rect| aabb(rect, &shot)) {
            log::debug!("projectile {projectile} hit terrain");
            destroy_or_warn(registry, projectile);
        }
    }
}
