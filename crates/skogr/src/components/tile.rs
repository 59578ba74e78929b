//! Map tiles.
//!
//! A tile is one cell of a tile sheet copied to a fixed spot on screen. Tile
//! codes are two decimal digits, row then column of the sheet: `23` is row 2,
//! column 3.

use crate::ecs::Component;
use crate::math::Rect;
use crate::platform::{Canvas, Flip, TextureId};

#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub texture: TextureId,
    pub src: Rect,
    pub dst: Rect,
    pub code: u16,
}

impl Tile {
    /// Tile `code` from a sheet of `size`-pixel cells, placed at `(x, y)` and
    /// drawn `size * scale` wide.
    pub fn new(texture: TextureId, code: u16, x: f32, y: f32, size: f32, scale: f32) -> Self {
        let (row, col) = (code / 10, code % 10);
        Self {
            texture,
            src: Rect::new(col as f32 * size, row as f32 * size, size, size),
            dst: Rect::new(x, y, size * scale, size * scale),
            code,
        }
    }
}

impl Component for Tile {
    fn draw(&self, canvas: &mut dyn Canvas) {
        canvas.draw_sprite(self.texture, self.src, self.dst, Flip::None);
    }
}
