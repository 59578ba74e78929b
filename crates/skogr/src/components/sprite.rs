//! Textured quads with optional sprite-sheet animation.
//!
//! A sheet holds one animation per row and one frame per column:
//!
//! ```text
//!        col 0   col 1   col 2  …
//! row 0  idle0   idle1   idle2
//! row 1  walk0   walk1   walk2   walk3 …
//! ```
//!
//! The frame is picked from elapsed time, so all sprites playing the same
//! animation stay in step.

use std::collections::HashMap;

use super::transform::Transform;
use crate::ecs::{Component, ComponentCtx};
use crate::math::Rect;
use crate::platform::{Canvas, Flip, TextureId};
use crate::time::Time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    /// Sheet row.
    pub row: u32,
    pub frames: u32,
    /// Milliseconds per frame.
    pub speed_ms: u32,
}

impl Animation {
    pub const fn new(row: u32, frames: u32, speed_ms: u32) -> Self {
        Self {
            row,
            frames,
            speed_ms,
        }
    }

    /// Column to show after `elapsed_ms`.
    pub fn frame_at(&self, elapsed_ms: u64) -> u32 {
        if self.frames == 0 {
            return 0;
        }
        ((elapsed_ms / u64::from(self.speed_ms.max(1))) % u64::from(self.frames)) as u32
    }
}

#[derive(Debug, Clone)]
pub struct Sprite {
    texture: TextureId,
    pub src: Rect,
    pub dst: Rect,
    pub flip: Flip,
    animations: HashMap<&'static str, Animation>,
    playing: Option<&'static str>,
}

impl Sprite {
    /// A still image.
    pub fn new(texture: TextureId) -> Self {
        Self {
            texture,
            src: Rect::default(),
            dst: Rect::default(),
            flip: Flip::None,
            animations: HashMap::new(),
            playing: None,
        }
    }

    pub fn with_animation(mut self, name: &'static str, animation: Animation) -> Self {
        self.animations.insert(name, animation);
        self
    }

    /// Builder form of [`play`](Self::play).
    pub fn playing(mut self, name: &'static str) -> Self {
        self.play(name);
        self
    }

    /// Switch animation. Unknown names are ignored and return `false`.
    pub fn play(&mut self, name: &'static str) -> bool {
        if self.animations.contains_key(name) {
            self.playing = Some(name);
            true
        } else {
            log::warn!("sprite `{}` has no animation `{name}`", self.texture);
            false
        }
    }

    pub fn current(&self) -> Option<&'static str> {
        self.playing
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    fn animation(&self) -> Option<&Animation> {
        self.playing.and_then(|name| self.animations.get(name))
    }
}

impl Component for Sprite {
    fn init(&mut self, ctx: &mut ComponentCtx<'_>) {
        if let Some(transform) = ctx.get::<Transform>() {
            self.src = Rect::new(0.0, 0.0, transform.width, transform.height);
        }
    }

    fn update(&mut self, ctx: &mut ComponentCtx<'_>) {
        if let Some(animation) = self.animation().copied() {
            let elapsed = ctx.get_resource::<Time>().map_or(0, Time::elapsed_ms);
            self.src.x = self.src.w * animation.frame_at(elapsed) as f32;
            self.src.y = self.src.h * animation.row as f32;
        }
        if let Some(transform) = ctx.get::<Transform>() {
            self.dst = Rect::from_pos_size(transform.position, transform.size());
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_sprite(self.texture, self.src, self.dst, self.flip);
    }
}
