//! Geometry predicates shared by every collision test
//!
//! All bullet-vs-airplane and airplane-vs-pickup checks reduce to the
//! same circle overlap test, and all despawn checks reduce to the same
//! centered-rectangle containment test.

use glam::Vec2;

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// True iff two circles overlap. Strict inequality: circles touching at
/// exact tangency do not count as overlapping.
#[inline]
pub fn circles_overlap(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> bool {
    distance(pos_a, pos_b) < radius_a + radius_b
}

/// True if `pos` lies outside the centered rectangle
/// `[-w/2, w/2] x [-h/2, h/2]`.
#[inline]
pub fn is_off_screen(pos: Vec2, width: f32, height: f32) -> bool {
    !(-width / 2.0 < pos.x && pos.x < width / 2.0 && -height / 2.0 < pos.y && pos.y < height / 2.0)
}

/// True once `pos` has fallen below the bottom edge
#[inline]
pub fn is_below_screen(pos: Vec2, height: f32) -> bool {
    pos.y < -height / 2.0
}
