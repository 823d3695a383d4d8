//! Axis-aligned rectangles and the overlap test used by every collision check

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, origin at the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    #[serde(rename = "width")]
    pub w: f32,
    #[serde(rename = "height")]
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered(center: Vec2, w: f32, h: f32) -> Self {
        Self::new(center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Same rectangle shifted horizontally (world → screen with a camera offset)
    #[inline]
    pub fn offset_x(&self, dx: f32) -> Self {
        Self::new(self.x + dx, self.y, self.w, self.h)
    }

    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self, other)
    }
}

/// Strict overlap on both axes. Rectangles that only share an edge do not overlap.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}
