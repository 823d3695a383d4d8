//! Rendering module
//!
//! The simulation draws through [`Surface`], a small set of 2D primitives in
//! screen space. [`VertexBatch`] tessellates those primitives into triangles
//! that the WebGPU pipeline uploads once per frame.

pub mod batch;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use batch::VertexBatch;
pub use pipeline::RenderState;
pub use scene::draw_world;
pub use vertex::{Color, Vertex, colors};

use glam::Vec2;

use crate::sim::Rect;

/// 2D drawing surface. All coordinates are screen space (camera already applied).
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32);

    /// Fill a simple (possibly concave) polygon
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);

    /// Outline a closed polygon
    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, line_width: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Fill with a vertical linear gradient from `top` to `bottom`
    fn fill_gradient(&mut self, rect: Rect, top: Color, bottom: Color);

    /// Draw the player sprite scaled into `rect`
    fn draw_sprite(&mut self, rect: Rect);
}
