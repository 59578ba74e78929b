//! Axis-aligned box overlap.

use crate::math::Rect;

/// `true` if the boxes overlap. Touching edges count as a hit.
pub fn aabb(a: &Rect, b: &Rect) -> bool {
    a.right() >= b.x && b.right() >= a.x && a.bottom() >= b.y && b.bottom() >= a.y
}
