//! Convenience re-exports: `use skogr::prelude::*` for the common items.

// Container
pub use crate::ecs::{
    Commands, Component, ComponentCtx, EcsError, Entity, EntityMut, EntityRef, Group, Registry,
    Schedule, System,
};

// Game
pub use crate::components::{
    Animation, Collider, ColliderTag, KeyboardController, Projectile, Sprite, Tile, Transform,
};
pub use crate::config::{ConfigError, EcsConfig, GameConfig};
pub use crate::game::Game;
pub use crate::input::{Input, Key};
pub use crate::math::{Rect, Vec2};
pub use crate::platform::{Canvas, Flip, Platform, PlatformEvent, TextureId};
pub use crate::role::Role;
pub use crate::spawn::ArenaMap;
pub use crate::state::{GameRng, PlayerState};
pub use crate::time::Time;

// Headless
pub use crate::platform::{KeyEvent, RecordingCanvas, ScriptedPlatform};

// Diagnostics (feature-gated)
#[cfg(feature = "diagnostics")]
pub use crate::diag::{FrameSnapshot, RegistrySnapshot};
