//! Entity recipes for the arena scene.
//!
//! Every helper attaches components in the order their updates depend on
//! (transform first, collider last) and joins exactly one [`Role`] group.

use crate::components::transform::DEFAULT_SIZE;
use crate::components::{
    Animation, Collider, ColliderTag, KeyboardController, Projectile, Sprite, Tile, Transform,
};
use crate::config::{GameConfig, MonsterConfig, ProjectileConfig};
use crate::ecs::{Entity, Registry};
use crate::math::{Rect, Vec2};
use crate::platform::TextureId;
use crate::role::Role;
use crate::state::{GameRng, PlayerState};

pub const PLAYER_TEXTURE: TextureId = TextureId("player");
pub const MONSTER_TEXTURE: TextureId = TextureId("monster");
pub const PROJECTILE_TEXTURE: TextureId = TextureId("projectile");
pub const TERRAIN_TEXTURE: TextureId = TextureId("terrain");

pub const IDLE: &str = "Idle";
pub const WALK: &str = "Walk";
pub const MONSTER_WALK: &str = "MonsterWalk";

/// Distinct component types the arena attaches: transform, sprite, keyboard
/// controller, collider, projectile and tile.
pub const ARENA_COMPONENT_TYPES: usize = 6;

/// Tile code that leaves a cell empty.
pub const EMPTY_TILE: u16 = u16::MAX;

/// Spawn the player and record it in [`PlayerState`].
pub fn spawn_player(registry: &mut Registry, config: &GameConfig) -> Entity {
    let p = &config.player;
    let player = registry
        .add_entity()
        .with_component(
            Transform::new(p.start.x, p.start.y, p.size.x, p.size.y, 1.0)
                .facing(Vec2::Y)
                .with_speed(p.speed),
        )
        .with_component(
            Sprite::new(PLAYER_TEXTURE)
                .with_animation(IDLE, Animation::new(0, 3, 100))
                .with_animation(WALK, Animation::new(1, 8, 100))
                .playing(IDLE),
        )
        .with_component(KeyboardController)
        .with_component(Collider::follow(
            ColliderTag::Player,
            p.collider_offset,
            Vec2::splat(config.tile_size),
        ))
        .with_group(Role::Player)
        .id();
    registry.insert_resource(PlayerState {
        player,
        last_safe: p.start,
    });
    log::info!("spawned player {player} at {}", p.start);
    player
}

/// Spawn one monster. Its size and hit box scale with `scale`.
pub fn spawn_monster(
    registry: &mut Registry,
    position: Vec2,
    scale: f32,
    config: &MonsterConfig,
) -> Entity {
    let (lo, hi) = config.speed_range;
    registry
        .add_entity()
        .with_component(
            Transform::new(position.x, position.y, 64.0, 64.0, scale)
                .with_speed(config.speed)
                .with_speed_range(lo, hi),
        )
        .with_component(
            Sprite::new(MONSTER_TEXTURE)
                .with_animation(MONSTER_WALK, Animation::new(0, 3, 100))
                .playing(MONSTER_WALK),
        )
        .with_component(Collider::follow(
            ColliderTag::Monster,
            Vec2::splat(20.0 * scale),
            Vec2::splat(24.0 * scale),
        ))
        .with_group(Role::Monster)
        .id()
}

/// Spawn `config.monster.count` monsters at random spots and sizes.
pub fn spawn_monsters(registry: &mut Registry, config: &GameConfig) -> Vec<Entity> {
    let m = &config.monster;
    if !registry.has_resource::<GameRng>() {
        registry.insert_resource(GameRng::new(config.seed));
    }
    let placements: Vec<(Vec2, f32)> = {
        let rng = registry.resource_mut::<GameRng>();
        (0..m.count)
            .map(|_| {
                let scale = rng.range(m.scale.0, m.scale.1);
                let offset = Vec2::new(
                    rng.range(0.0, m.spawn_extent.x),
                    rng.range(0.0, m.spawn_extent.y),
                );
                (m.spawn_origin + offset, scale)
            })
            .collect()
    };
    placements
        .into_iter()
        .map(|(position, scale)| spawn_monster(registry, position, scale, m))
        .collect()
}

/// Launch a projectile centered on `center`, flying along `direction`.
pub fn spawn_projectile(
    registry: &mut Registry,
    center: Vec2,
    direction: Vec2,
    config: &ProjectileConfig,
) -> Entity {
    let corner = center - Vec2::splat(DEFAULT_SIZE / 2.0);
    registry
        .add_entity()
        .with_component(Transform::new(corner.x, corner.y, DEFAULT_SIZE, DEFAULT_SIZE, 1.0))
        .with_component(Sprite::new(PROJECTILE_TEXTURE))
        .with_component(Projectile::new(config.range, config.speed, direction))
        .with_component(Collider::follow(
            ColliderTag::Projectile,
            Vec2::splat(13.0),
            Vec2::splat(6.0),
        ))
        .with_group(Role::Projectile)
        .id()
}

pub fn spawn_terrain_collider(
    registry: &mut Registry,
    x: f32,
    y: f32,
    size: f32,
    visible: bool,
) -> Entity {
    registry
        .add_entity()
        .with_component(
            Collider::fixed(ColliderTag::Terrain, Rect::new(x, y, size, size)).visible(visible),
        )
        .with_group(Role::TerrainCollider)
        .id()
}

/// Lay out a grid of tile codes, row by row. [`EMPTY_TILE`] cells are skipped.
pub fn spawn_tile_layer(
    registry: &mut Registry,
    texture: TextureId,
    codes: &[Vec<u16>],
    tile_size: f32,
    scale: f32,
    role: Role,
) -> Vec<Entity> {
    let step = tile_size * scale;
    let mut spawned = Vec::new();
    for (row, line) in codes.iter().enumerate() {
        for (col, &code) in line.iter().enumerate() {
            if code == EMPTY_TILE {
                continue;
            }
            let tile = Tile::new(
                texture,
                code,
                col as f32 * step,
                row as f32 * step,
                tile_size,
                scale,
            );
            spawned.push(registry.add_entity().with_component(tile).with_group(role).id());
        }
    }
    log::debug!("spawned {} tiles into {role:?}", spawned.len());
    spawned
}

/// One terrain collider per non-zero cell.
pub fn spawn_collider_layer(
    registry: &mut Registry,
    solid: &[Vec<u16>],
    tile_size: f32,
    scale: f32,
    visible: bool,
) -> Vec<Entity> {
    let step = tile_size * scale;
    let mut spawned = Vec::new();
    for (row, line) in solid.iter().enumerate() {
        for (col, &cell) in line.iter().enumerate() {
            if cell != 0 {
                spawned.push(spawn_terrain_collider(
                    registry,
                    col as f32 * step,
                    row as f32 * step,
                    step,
                    visible,
                ));
            }
        }
    }
    spawned
}

/// Already-parsed layers of an arena map.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaMap {
    pub background: Vec<Vec<u16>>,
    pub tiles: Vec<Vec<u16>>,
    pub fx: Vec<Vec<u16>>,
    /// Non-zero cells are solid.
    pub colliders: Vec<Vec<u16>>,
    pub scale: f32,
}

impl ArenaMap {
    /// A `size`×`size` floor ringed by a one-tile wall.
    pub fn walled(size: usize) -> Self {
        let edge = |i: usize| i == 0 || i + 1 == size;
        let grid = |wall: u16, floor: u16| -> Vec<Vec<u16>> {
            (0..size)
                .map(|row| {
                    (0..size)
                        .map(|col| if edge(row) || edge(col) { wall } else { floor })
                        .collect()
                })
                .collect()
        };
        Self {
            background: grid(0, 0),
            tiles: grid(11, EMPTY_TILE),
            fx: grid(EMPTY_TILE, EMPTY_TILE),
            colliders: grid(1, 0),
            scale: 1.0,
        }
    }
}

/// Populate a whole scene in back-to-front spawn order.
pub fn spawn_arena(registry: &mut Registry, map: &ArenaMap, config: &GameConfig) -> Entity {
    let (size, scale) = (config.tile_size, map.scale);
    let layer = |registry: &mut Registry, codes: &[Vec<u16>], role: Role| {
        spawn_tile_layer(registry, TERRAIN_TEXTURE, codes, size, scale, role);
    };
    layer(registry, &map.background, Role::MapBackground);
    layer(registry, &map.tiles, Role::Map);
    let player = spawn_player(registry, config);
    spawn_monsters(registry, config);
    layer(registry, &map.fx, Role::MapFx);
    spawn_collider_layer(registry, &map.colliders, size, scale, config.debug_colliders);
    player
}
