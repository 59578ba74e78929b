//! # ECS — entities, components, groups
//!
//! A small container in the classic "component owns behavior" style:
//!
//! - [`Entity`]: a generational handle.
//! - [`Component`]: a trait object stored per entity, with `init`, `update`
//!   and `draw` hooks.
//! - [`Group`]: a role tag; the [`Registry`] keeps one ordered index of
//!   handles per group so render layers and gameplay queries don't scan every
//!   entity.
//! - [`Registry`]: owns all of it, and removes destroyed entities in one
//!   batch during `refresh()`.
//!
//! ```text
//!   frame N                         frame N+1
//!   ───────                         ─────────
//!   update(): bullet hits spider    refresh(): group indices filtered,
//!             both destroy()                   bullet + spider dropped
//!   draw():   both still drawn      update(): neither runs again
//! ```
//!
//! ## Comparison
//!
//! - **bevy_ecs / hecs**: components are plain data and behavior lives in
//!   systems that query by type. Here components carry their own behavior and
//!   systems ([`System`]) handle what spans several entities.
//! - **specs**: similar bitset-based membership, but storage is per type
//!   rather than per entity.

mod commands;
mod component;
mod entity;
mod entity_mut;
mod error;
mod group;
mod mask;
mod record;
mod registry;
mod resource;
mod system;

pub use commands::Commands;
pub use component::{AsAny, Component, ComponentCtx, ComponentTypes};
pub use entity::Entity;
pub use entity_mut::{EntityMut, EntityRef};
pub use error::EcsError;
pub use group::Group;
pub use registry::Registry;
pub use resource::Resources;
pub use system::{Schedule, System};

#[cfg(feature = "diagnostics")]
pub use system::SystemTiming;
