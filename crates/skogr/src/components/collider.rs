//! Hit boxes.
//!
//! Moving entities use a *following* collider: its box is the sibling
//! [`Transform`]'s position plus a fixed offset, recomputed every update.
//! Terrain uses a *fixed* collider whose box never moves.

use super::transform::Transform;
use crate::ecs::{Component, ComponentCtx};
use crate::math::{Rect, Vec2};
use crate::platform::Canvas;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderTag {
    Player,
    Monster,
    Projectile,
    Terrain,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub tag: ColliderTag,
    /// Current box in world pixels.
    pub rect: Rect,
    offset: Vec2,
    fixed: bool,
    /// Outline the box when drawn.
    pub visible: bool,
}

impl Collider {
    /// A box `size` wide, `offset` from the owner's transform position.
    pub fn follow(tag: ColliderTag, offset: Vec2, size: Vec2) -> Self {
        Self {
            tag,
            rect: Rect::from_pos_size(offset, size),
            offset,
            fixed: false,
            visible: false,
        }
    }

    /// A box that stays where it is put.
    pub fn fixed(tag: ColliderTag, rect: Rect) -> Self {
        Self {
            tag,
            rect,
            offset: Vec2::ZERO,
            fixed: true,
            visible: false,
        }
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    fn track(&mut self, ctx: &ComponentCtx<'_>) {
        if self.fixed {
            return;
        }
        if let Some(transform) = ctx.get::<Transform>() {
            self.rect.x = transform.position.x + self.offset.x;
            self.rect.y = transform.position.y + self.offset.y;
        }
    }
}

impl Component for Collider {
    fn init(&mut self, ctx: &mut ComponentCtx<'_>) {
        if !self.fixed && !ctx.has::<Transform>() {
            log::warn!("entity {} has a following collider but no transform", ctx.entity());
        }
        self.track(ctx);
    }

    fn update(&mut self, ctx: &mut ComponentCtx<'_>) {
        self.track(ctx);
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        if self.visible {
            canvas.draw_rect(self.rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Registry;
    use crate::platform::RecordingCanvas;

    #[test]
    fn following_box_moves_with_the_transform() {
        let mut registry = Registry::new();
        let e = registry
            .add_entity()
            .with_component(Transform::at(100.0, 50.0))
            .with_component(Collider::follow(
                ColliderTag::Player,
                Vec2::new(16.0, 16.0),
                Vec2::new(32.0, 32.0),
            ))
            .id();
        assert_eq!(
            registry.get_component::<Collider>(e).rect,
            Rect::new(116.0, 66.0, 32.0, 32.0)
        );

        registry.get_component_mut::<Transform>(e).velocity = Vec2::NEG_Y;
        registry.update();
        assert_eq!(registry.get_component::<Collider>(e).rect.y, 63.0);
    }

    #[test]
    fn fixed_box_ignores_the_transform() {
        let mut registry = Registry::new();
        let wall = Rect::new(64.0, 64.0, 32.0, 32.0);
        let e = registry
            .add_entity()
            .with_component(Transform::at(0.0, 0.0))
            .with_component(Collider::fixed(ColliderTag::Terrain, wall))
            .id();
        registry.update();
        assert_eq!(registry.get_component::<Collider>(e).rect, wall);
    }

    #[test]
    fn only_visible_boxes_are_drawn() {
        let mut canvas = RecordingCanvas::default();
        let rect = Rect::new(0.0, 0.0, 8.0, 8.0);
        Collider::fixed(ColliderTag::Terrain, rect).draw(&mut canvas);
        assert!(canvas.rects.is_empty());
        Collider::fixed(ColliderTag::Terrain, rect)
            .visible(true)
            .draw(&mut canvas);
        assert_eq!(canvas.rects, vec![rect]);
    }
}
