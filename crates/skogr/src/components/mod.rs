//! Game components.
//!
//! Each one is attached in a fixed order by the spawn helpers, which matters:
//! `update()` runs in attachment order, so a sprite attached after its
//! transform always draws the position the transform just computed.
//!
//! ```text
//! player:      Transform → Sprite → KeyboardController → Collider
//! monster:     Transform → Sprite → Collider
//! projectile:  Transform → Sprite → Projectile → Collider
//! tile:        Tile
//! terrain:     Collider (fixed)
//! ```

pub mod collider;
pub mod controller;
pub mod projectile;
pub mod sprite;
pub mod tile;
pub mod transform;

pub use collider::{Collider, ColliderTag};
pub use controller::KeyboardController;
pub use projectile::Projectile;
pub use sprite::{Animation, Sprite};
pub use tile::Tile;
pub use transform::Transform;
