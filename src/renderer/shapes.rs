//! Shape generation for 2D primitives
//!
//! Every function returns a triangle list in screen space.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Color, Vertex};
use crate::sim::Rect;

/// Segments used for small circles (crown jewels)
pub const CIRCLE_SEGMENTS: u32 = 12;

fn quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], colors: [Color; 4]) {
    let [a, b, c, d] = corners;
    out.push(Vertex::new(a.x, a.y, colors[0]));
    out.push(Vertex::new(b.x, b.y, colors[1]));
    out.push(Vertex::new(c.x, c.y, colors[2]));

    out.push(Vertex::new(c.x, c.y, colors[2]));
    out.push(Vertex::new(d.x, d.y, colors[3]));
    out.push(Vertex::new(a.x, a.y, colors[0]));
}

fn corners(rect: &Rect) -> [Vec2; 4] {
    [
        Vec2::new(rect.x, rect.y),
        Vec2::new(rect.right(), rect.y),
        Vec2::new(rect.right(), rect.bottom()),
        Vec2::new(rect.x, rect.bottom()),
    ]
}

/// Generate vertices for a filled rectangle
pub fn rect(rect: Rect, color: Color) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    quad(&mut vertices, corners(&rect), [color; 4]);
    vertices
}

/// Rectangle with a vertical gradient
pub fn gradient_rect(rect: Rect, top: Color, bottom: Color) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(6);
    quad(&mut vertices, corners(&rect), [top, top, bottom, bottom]);
    vertices
}

/// Rectangle outline centered on the rectangle's edges
pub fn rect_outline(r: Rect, color: Color, line_width: f32) -> Vec<Vertex> {
    let half = line_width / 2.0;
    let inner_h = (r.h - line_width).max(0.0);
    let bands = [
        Rect::new(r.x - half, r.y - half, r.w + line_width, line_width),
        Rect::new(r.x - half, r.bottom() - half, r.w + line_width, line_width),
        Rect::new(r.x - half, r.y + half, line_width, inner_h),
        Rect::new(r.right() - half, r.y + half, line_width, inner_h),
    ];

    let mut vertices = Vec::with_capacity(24);
    for band in bands {
        quad(&mut vertices, corners(&band), [color; 4]);
    }
    vertices
}

/// Textured quad covering `rect` with the full sprite
pub fn sprite(rect: Rect) -> Vec<Vertex> {
    let [a, b, c, d] = corners(&rect);
    vec![
        Vertex::textured(a.x, a.y, 0.0, 0.0),
        Vertex::textured(b.x, b.y, 1.0, 0.0),
        Vertex::textured(c.x, c.y, 1.0, 1.0),
        Vertex::textured(c.x, c.y, 1.0, 1.0),
        Vertex::textured(d.x, d.y, 0.0, 1.0),
        Vertex::textured(a.x, a.y, 0.0, 0.0),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Twice the signed area (positive when the winding is counter-clockwise in y-up terms)
fn signed_area2(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum()
}

fn strictly_inside(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    (d1 > 0.0 && d2 > 0.0 && d3 > 0.0) || (d1 < 0.0 && d2 < 0.0 && d3 < 0.0)
}

/// Fill a simple polygon (convex or concave) by ear clipping.
///
/// Degenerate input never fails: whatever cannot be clipped is fanned.
pub fn polygon(points: &[Vec2], color: Color) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }
    let orientation = signed_area2(points).signum();
    let mut remaining: Vec<usize> = (0..points.len()).collect();
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);

    let mut push_triangle = |a: Vec2, b: Vec2, c: Vec2| {
        vertices.push(Vertex::new(a.x, a.y, color));
        vertices.push(Vertex::new(b.x, b.y, color));
        vertices.push(Vertex::new(c.x, c.y, color));
    };

    while remaining.len() > 3 {
        let n = remaining.len();
        let ear = (0..n).find(|&i| {
            let a = points[remaining[(i + n - 1) % n]];
            let b = points[remaining[i]];
            let c = points[remaining[(i + 1) % n]];
            let convex = (b - a).perp_dot(c - b) * orientation > 0.0;
            convex
                && !remaining.iter().any(|&j| {
                    let p = points[j];
                    p != a && p != b && p != c && strictly_inside(p, a, b, c)
                })
        });

        let Some(i) = ear else { break };
        push_triangle(
            points[remaining[(i + n - 1) % n]],
            points[remaining[i]],
            points[remaining[(i + 1) % n]],
        );
        remaining.remove(i);
    }

    // Last triangle, or a fan over whatever could not be clipped
    for k in 1..remaining.len() - 1 {
        push_triangle(
            points[remaining[0]],
            points[remaining[k]],
            points[remaining[k + 1]],
        );
    }

    vertices
}

/// Closed polygon outline, one band per edge centered on the edge
pub fn polygon_outline(points: &[Vec2], color: Color, line_width: f32) -> Vec<Vertex> {
    if points.len() < 2 {
        return Vec::new();
    }
    let half = line_width / 2.0;
    let mut vertices = Vec::with_capacity(points.len() * 6);

    for i in 0..points.len() {
        let p1 = points[i];
        let p2 = points[(i + 1) % points.len()];
        let dir = (p2 - p1).normalize_or_zero();
        // Perpendicular for width
        let perp = Vec2::new(-dir.y, dir.x) * half;
        quad(
            &mut vertices,
            [p1 + perp, p2 + perp, p2 - perp, p1 - perp],
            [color; 4],
        );
    }

    vertices
}
