//! # Skogr — entity container for a 2D top-down arena game
//!
//! A small component container ([`ecs`]) with heterogeneous components held
//! per entity, tag-style group indices and deferred destruction, plus the
//! arena game built on it: components, spawn recipes, systems and a frame
//! loop that draws through a pluggable [`Canvas`](platform::Canvas).
//!
//! Start with `use skogr::prelude::*` and build a [`Game`](game::Game).

pub mod collision;
pub mod components;
pub mod config;
pub mod ecs;
pub mod game;
pub mod input;
pub mod math;
pub mod platform;
pub mod prelude;
pub mod role;
pub mod spawn;
pub mod state;
pub mod systems;
pub mod time;

#[cfg(feature = "diagnostics")]
pub mod diag;

pub use ecs::{Entity, Registry};
