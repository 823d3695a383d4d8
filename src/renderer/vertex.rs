//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// RGBA, 0-1 per channel, sRGB encoded (same values a CSS color would use)
pub type Color = [f32; 4];

/// 2D vertex with position, color and sprite texture coordinates.
///
/// `uv.x < 0` marks an untextured vertex; the shader then uses `color` only.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl Vertex {
    /// UV marker for solid-colored geometry
    pub const NO_UV: [f32; 2] = [-1.0, -1.0];

    pub const fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color,
            uv: Self::NO_UV,
        }
    }

    pub const fn textured(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            position: [x, y],
            color: [1.0; 4],
            uv: [u, v],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Build an opaque color from a 0xRRGGBB literal
pub const fn rgb(hex: u32) -> Color {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Same color with its alpha multiplied by `alpha`
#[inline]
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], color[3] * alpha]
}

/// Colors for game elements
pub mod colors {
    use super::{Color, rgb};

    pub const PURPLE: Color = rgb(0x790ECB);
    pub const PURPLE_LIGHT: Color = rgb(0x9A3DE8);
    pub const GOLD: Color = rgb(0xFFD700);
    pub const ORANGE: Color = rgb(0xFFA500);
    pub const WHITE: Color = rgb(0xFFFFFF);

    pub const EXPLOSION: [Color; 3] = [rgb(0xFF6B35), rgb(0xFF8C42), rgb(0xFFA500)];
    pub const SPARKLE: [Color; 2] = [WHITE, GOLD];
    pub const CONFETTI: [Color; 3] = [PURPLE, GOLD, WHITE];

    pub const PLATFORM_FILL: Color = rgb(0x2A2A3E);
    pub const SKY_TOP: Color = rgb(0x1A1A2E);
    pub const SKY_BOTTOM: Color = rgb(0x0F0F1E);
    pub const STAR: Color = [1.0, 1.0, 1.0, 0.5];
    pub const BACKGROUND: Color = SKY_BOTTOM;
}
