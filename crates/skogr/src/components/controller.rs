//! Keyboard steering for the player.
//!
//! Held arrow keys set the velocity; opposite keys cancel out. `Fire` (on the
//! frame it goes down) launches a projectile from the player's center in the
//! direction it last moved. The projectile is spawned through
//! [`Commands`](crate::ecs::Commands), after every entity has been updated.

use super::sprite::Sprite;
use super::transform::Transform;
use crate::config::GameConfig;
use crate::ecs::{Component, ComponentCtx};
use crate::input::{Input, Key};
use crate::math::Vec2;
use crate::platform::Flip;
use crate::spawn::{self, IDLE, WALK};

#[derive(Debug, Clone, Copy, Default)]
pub struct KeyboardController;

fn axis(input: &Input<Key>, negative: Key, positive: Key) -> f32 {
    match (input.pressed(negative), input.pressed(positive)) {
        (true, false) => -1.0,
        (false, true) => 1.0,
        _ => 0.0,
    }
}

impl Component for KeyboardController {
    fn update(&mut self, ctx: &mut ComponentCtx<'_>) {
        let Some(input) = ctx.get_resource::<Input<Key>>() else {
            return;
        };
        let velocity = Vec2::new(
            axis(input, Key::Left, Key::Right),
            axis(input, Key::Up, Key::Down),
        );
        let fire = input.just_pressed(Key::Fire);
        let projectile = ctx
            .get_resource::<GameConfig>()
            .map(|config| config.projectile.clone())
            .unwrap_or_default();

        let Some(transform) = ctx.get_mut::<Transform>() else {
            return;
        };
        transform.velocity = velocity;
        if velocity != Vec2::ZERO {
            transform.facing = velocity;
        }
        let facing = transform.facing;
        let center = transform.position + transform.size() * 0.5;

        if let Some(sprite) = ctx.get_mut::<Sprite>() {
            let wanted = if velocity == Vec2::ZERO { IDLE } else { WALK };
            if sprite.current() != Some(wanted) {
                sprite.play(wanted);
            }
            if velocity.x < 0.0 {
                sprite.flip = Flip::Horizontal;
            } else if velocity.x > 0.0 {
                sprite.flip = Flip::None;
            }
        }

        if fire {
            log::debug!("entity {} fires toward {facing}", ctx.entity());
            ctx.commands().push(move |registry| {
                spawn::spawn_projectile(registry, center, facing, &projectile);
            });
        }
    }
}
