//! Position and movement.
//!
//! Movement is on a pixel grid: each update moves by `speed` along the
//! direction of `velocity`, with each axis truncated toward zero. A diagonal
//! at speed 3 therefore moves (2, 2), not (2.12, 2.12).

use crate::ecs::{Component, ComponentCtx};
use crate::math::Vec2;

/// Default edge length of an unscaled sprite, in pixels.
pub const DEFAULT_SIZE: f32 = 32.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Direction of travel. Only its direction matters unless it is zero.
    pub velocity: Vec2,
    /// Last direction the entity moved or was told to face.
    pub facing: Vec2,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub speed: f32,
    /// Bounds for per-frame speed jitter, if this entity wanders.
    pub speed_range: Option<(f32, f32)>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            facing: Vec2::Y,
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            scale: 1.0,
            speed: 3.0,
            speed_range: None,
        }
    }
}

impl Transform {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Self::default()
        }
    }

    pub fn new(x: f32, y: f32, width: f32, height: f32, scale: f32) -> Self {
        Self {
            width,
            height,
            scale,
            ..Self::at(x, y)
        }
    }

    pub fn facing(mut self, facing: Vec2) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_speed_range(mut self, lo: f32, hi: f32) -> Self {
        self.speed_range = Some((lo, hi));
        self
    }

    /// On-screen size after scaling.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width * self.scale, self.height * self.scale)
    }

    /// The displacement one update applies.
    pub fn step(&self) -> Vec2 {
        let norm = self.velocity.length();
        let raw = if norm != 0.0 {
            self.velocity * self.speed / norm
        } else {
            self.velocity * self.speed
        };
        raw.trunc()
    }
}

impl Component for Transform {
    fn init(&mut self, _ctx: &mut ComponentCtx<'_>) {
        self.velocity = Vec2::ZERO;
    }

    fn update(&mut self, _ctx: &mut ComponentCtx<'_>) {
        self.position += self.step();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Registry;

    #[test]
    fn attach_zeroes_velocity() {
        let mut registry = Registry::new();
        let mut t = Transform::at(1.0, 2.0);
        t.velocity = Vec2::new(5.0, 5.0);
        let e = registry.add_entity().with_component(t).id();
        assert_eq!(registry.get_component::<Transform>(e).velocity, Vec2::ZERO);
    }

    #[test]
    fn unit_velocity_moves_by_speed() {
        let mut registry = Registry::new();
        let e = registry.add_entity().with_component(Transform::at(10.0, 10.0)).id();
        registry.get_component_mut::<Transform>(e).velocity = Vec2::new(1.0, 0.0);
        registry.update();
        assert_eq!(
            registry.get_component::<Transform>(e).position,
            Vec2::new(13.0, 10.0)
        );
    }

    #[test]
    fn diagonal_is_normalised_then_truncated() {
        let mut t = Transform::default();
        t.velocity = Vec2::new(1.0, 1.0);
        // 3 / sqrt(2) ≈ 2.12 per axis
        assert_eq!(t.step(), Vec2::new(2.0, 2.0));
        t.velocity = Vec2::new(-1.0, -1.0);
        assert_eq!(t.step(), Vec2::new(-2.0, -2.0));
    }

    #[test]
    fn fractional_speed_can_stall() {
        let mut t = Transform::default().with_speed(0.9);
        t.velocity = Vec2::X;
        assert_eq!(t.step(), Vec2::ZERO);
    }

    #[test]
    fn zero_velocity_stays_put() {
        let t = Transform::default();
        assert_eq!(t.step(), Vec2::ZERO);
    }

    #[test]
    fn size_is_scaled() {
        let t = Transform::new(0.0, 0.0, 64.0, 64.0, 0.5);
        assert_eq!(t.size(), Vec2::new(32.0, 32.0));
    }
}
