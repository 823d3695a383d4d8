//! Triangle batch that implements [`Surface`]
//!
//! Draw calls append in order, so later calls paint over earlier ones when
//! the batch is submitted as a single draw.

use glam::Vec2;

use super::Surface;
use super::shapes;
use super::vertex::{Color, Vertex, colors};
use crate::sim::Rect;

#[derive(Debug, Clone, Default)]
pub struct VertexBatch {
    vertices: Vec<Vertex>,
    /// Sprite texture uploaded; otherwise the player is a placeholder block
    sprite_ready: bool,
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sprite_ready(&mut self, ready: bool) {
        self.sprite_ready = ready;
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Start a new frame
    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}

impl Surface for VertexBatch {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.vertices.extend(shapes::rect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.vertices
            .extend(shapes::rect_outline(rect, color, line_width));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.vertices.extend(shapes::polygon(points, color));
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, line_width: f32) {
        self.vertices
            .extend(shapes::polygon_outline(points, color, line_width));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.vertices
            .extend(shapes::circle(center, radius, color, shapes::CIRCLE_SEGMENTS));
    }

    fn fill_gradient(&mut self, rect: Rect, top: Color, bottom: Color) {
        self.vertices
            .extend(shapes::gradient_rect(rect, top, bottom));
    }

    fn draw_sprite(&mut self, rect: Rect) {
        if self.sprite_ready {
            self.vertices.extend(shapes::sprite(rect));
        } else {
            self.fill_rect(rect, colors::PURPLE);
            self.stroke_rect(rect, colors::WHITE, 2.0);
        }
    }
}
