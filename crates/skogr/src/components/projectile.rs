//! Straight-flying shots that expire after a set distance.

use super::transform::Transform;
use crate::ecs::{Component, ComponentCtx};
use crate::math::Vec2;

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Distance budget.
    pub range: f32,
    /// Distance charged per update.
    pub speed: f32,
    pub velocity: Vec2,
    distance: f32,
}

impl Projectile {
    pub fn new(range: f32, speed: f32, velocity: Vec2) -> Self {
        Self {
            range,
            speed,
            velocity,
            distance: 0.0,
        }
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }
}

impl Component for Projectile {
    fn init(&mut self, ctx: &mut ComponentCtx<'_>) {
        // Transform::init zeroed the velocity when it was attached.
        if let Some(transform) = ctx.get_mut::<Transform>() {
            transform.velocity = self.velocity;
            transform.facing = self.velocity;
        }
    }

    fn update(&mut self, ctx: &mut ComponentCtx<'_>) {
        self.distance += self.speed;
        if self.distance > self.range {
            log::trace!("projectile {} out of range", ctx.entity());
            ctx.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Registry;

    #[test]
    fn init_launches_the_transform() {
        let mut registry = Registry::new();
        let e = registry
            .add_entity()
            .with_component(Transform::at(0.0, 0.0))
            .with_component(Projectile::new(100.0, 2.0, Vec2::X))
            .id();
        assert_eq!(registry.get_component::<Transform>(e).velocity, Vec2::X);
        registry.update();
        assert_eq!(
            registry.get_component::<Transform>(e).position,
            Vec2::new(3.0, 0.0)
        );
    }

    #[test]
    fn expires_once_past_range() {
        let mut registry = Registry::new();
        let e = registry
            .add_entity()
            .with_component(Transform::at(0.0, 0.0))
            .with_component(Projectile::new(5.0, 2.0, Vec2::Y))
            .id();
        for _ in 0..2 {
            registry.update();
        }
        assert!(registry.is_active(e)); // 4 ≤ 5
        registry.update();
        assert!(!registry.is_active(e)); // 6 > 5
        registry.refresh();
        assert!(!registry.is_alive(e));
    }
}
