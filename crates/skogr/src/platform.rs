//! The seams to the outside world.
//!
//! Windowing, texture upload and device input belong to whoever embeds the
//! game. They plug in through two traits:
//!
//! - [`Canvas`]: receives draw calls for one frame.
//! - [`Platform`]: turns device events into [`Input<Key>`] updates and
//!   reports when the player wants to quit.
//!
//! [`RecordingCanvas`] and [`ScriptedPlatform`] implement both headlessly; the
//! demo and the tests drive whole frames with them.

use std::collections::VecDeque;
use std::fmt;

use crate::input::{Input, Key};
use crate::math::Rect;

/// Name of a texture the embedding layer has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub &'static str);

impl fmt::Display for TextureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flip {
    #[default]
    None,
    Horizontal,
}

pub trait Canvas {
    /// Start a frame.
    fn clear(&mut self);
    /// Copy `src` out of `texture` into `dst` on screen.
    fn draw_sprite(&mut self, texture: TextureId, src: Rect, dst: Rect, flip: Flip);
    /// Outline a box. Used for collider debugging.
    fn draw_rect(&mut self, rect: Rect);
    /// Finish the frame.
    fn present(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    Continue,
    Quit,
}

pub trait Platform {
    /// Drain pending device events into `input`.
    fn poll(&mut self, input: &mut Input<Key>) -> PlatformEvent;
}

// ── Headless implementations ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct SpriteCall {
    pub texture: TextureId,
    pub src: Rect,
    pub dst: Rect,
    pub flip: Flip,
}

/// A canvas that remembers the last frame's draw calls.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub sprites: Vec<SpriteCall>,
    pub rects: Vec<Rect>,
    pub frames_presented: u64,
}

impl RecordingCanvas {
    /// Textures in the order they were drawn.
    pub fn texture_order(&self) -> Vec<&'static str> {
        self.sprites.iter().map(|call| call.texture.0).collect()
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self) {
        self.sprites.clear();
        self.rects.clear();
    }

    fn draw_sprite(&mut self, texture: TextureId, src: Rect, dst: Rect, flip: Flip) {
        self.sprites.push(SpriteCall {
            texture,
            src,
            dst,
            flip,
        });
    }

    fn draw_rect(&mut self, rect: Rect) {
        self.rects.push(rect);
    }

    fn present(&mut self) {
        self.frames_presented += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(Key),
    Up(Key),
}

/// Replays a fixed list of per-frame key events, then asks to quit.
#[derive(Debug, Default)]
pub struct ScriptedPlatform {
    frames: VecDeque<Vec<KeyEvent>>,
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the events for the next frame.
    pub fn then(mut self, events: impl IntoIterator<Item = KeyEvent>) -> Self {
        self.frames.push_back(events.into_iter().collect());
        self
    }

    /// Queue `n` frames with no events.
    pub fn idle(mut self, n: usize) -> Self {
        self.frames.extend(std::iter::repeat_n(Vec::new(), n));
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl Platform for ScriptedPlatform {
    fn poll(&mut self, input: &mut Input<Key>) -> PlatformEvent {
        let Some(events) = self.frames.pop_front() else {
            return PlatformEvent::Quit;
        };
        for event in events {
            match event {
                KeyEvent::Down(key) => input.press(key),
                KeyEvent::Up(key) => input.release(key),
            }
        }
        PlatformEvent::Continue
    }
}
