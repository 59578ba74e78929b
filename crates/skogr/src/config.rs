//! Configuration.
//!
//! Two layers, both plain serde structs with defaults for every field, so a
//! JSON file only has to mention what it overrides:
//!
//! ```json
//! { "ecs": { "max_groups": 16 }, "monster": { "count": 6 } }
//! ```
//!
//! - [`EcsConfig`] sizes the container (component type slots, group count).
//! - [`GameConfig`] carries the gameplay tuning used by the spawn helpers and
//!   systems.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::role::Role;
use crate::spawn::ARENA_COMPONENT_TYPES;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Capacities of a [`Registry`](crate::Registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcsConfig {
    /// Distinct component types one registry can hold.
    pub max_components: usize,
    /// Distinct groups one registry can index.
    pub max_groups: usize,
}

impl Default for EcsConfig {
    fn default() -> Self {
        Self {
            max_components: 32,
            max_groups: 32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start: Vec2,
    /// Sprite size in pixels, before scaling.
    pub size: Vec2,
    pub speed: f32,
    /// Collider offset from the sprite's top-left corner.
    pub collider_offset: Vec2,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start: Vec2::new(5.0 * 32.0 - 16.0, 2.0 * 32.0 - 16.0),
            size: Vec2::new(64.0, 64.0),
            speed: 3.0,
            collider_offset: Vec2::new(16.0, 16.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterConfig {
    pub count: usize,
    /// Range the random per-monster scale is drawn from.
    pub scale: (f32, f32),
    /// Speed a monster starts with.
    pub speed: f32,
    /// Range the per-frame speed jitter is drawn from.
    pub speed_range: (f32, f32),
    /// Spawn area, top-left and size.
    pub spawn_origin: Vec2,
    pub spawn_extent: Vec2,
}

impl Default for MonsterConfig {
    fn default() -> Self {
        Self {
            count: 3,
            scale: (0.2, 1.5),
            speed: 2.5,
            speed_range: (1.0, 3.5),
            spawn_origin: Vec2::ZERO,
            spawn_extent: Vec2::new(200.0, 100.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Distance travelled before the projectile expires.
    pub range: f32,
    pub speed: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            range: 200.0,
            speed: 2.0,
        }
    }
}

/// Gameplay tuning for the arena scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub ecs: EcsConfig,
    pub tile_size: f32,
    pub player: PlayerConfig,
    pub monster: MonsterConfig,
    pub projectile: ProjectileConfig,
    /// Draw terrain collider outlines.
    pub debug_colliders: bool,
    /// Fixed RNG seed for reproducible runs. Random when absent.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ecs: EcsConfig::default(),
            tile_size: 32.0,
            player: PlayerConfig::default(),
            monster: MonsterConfig::default(),
            projectile: ProjectileConfig::default(),
            debug_colliders: false,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded game config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ecs.max_components == 0 || self.ecs.max_groups == 0 {
            return Err(ConfigError::Invalid(
                "ecs capacities must be at least 1".into(),
            ));
        }
        if self.ecs.max_groups < Role::ALL.len() {
            return Err(ConfigError::Invalid(format!(
                "ecs.max_groups must fit all {} scene roles",
                Role::ALL.len()
            )));
        }
        if self.ecs.max_components < ARENA_COMPONENT_TYPES {
            return Err(ConfigError::Invalid(format!(
                "ecs.max_components must fit all {ARENA_COMPONENT_TYPES} arena component types"
            )));
        }
        if self.tile_size <= 0.0 {
            return Err(ConfigError::Invalid("tile_size must be positive".into()));
        }
        let (lo, hi) = self.monster.speed_range;
        if lo > hi {
            return Err(ConfigError::Invalid(format!(
                "monster.speed_range is reversed: ({lo}, {hi})"
            )));
        }
        let (lo, hi) = self.monster.scale;
        if lo <= 0.0 || lo > hi {
            return Err(ConfigError::Invalid(format!(
                "monster.scale must be a positive, ordered range: ({lo}, {hi})"
            )));
        }
        if self.projectile.range < 0.0 {
            return Err(ConfigError::Invalid("projectile.range is negative".into()));
        }
        Ok(())
    }
}
