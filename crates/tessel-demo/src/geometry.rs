//! Static quad geometry: two triangles, six vertices, centered at the origin
//! with half-extent 0.5 in clip space.

use bytemuck::{Pod, Zeroable};
use tessel_engine::render::Vertex;

// ── plain quad ────────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PositionVertex {
    pub pos: [f32; 2],
}

impl Vertex for PositionVertex {
    const ATTRIBUTES: &'static [wgpu::VertexAttribute] = &wgpu::vertex_attr_array![0 => Float32x2];
}

pub const SOLID_QUAD: [PositionVertex; 6] = [
    PositionVertex { pos: [-0.5, -0.5] },
    PositionVertex { pos: [0.5, -0.5] },
    PositionVertex { pos: [0.5, 0.5] },
    PositionVertex { pos: [0.5, 0.5] },
    PositionVertex { pos: [-0.5, 0.5] },
    PositionVertex { pos: [-0.5, -0.5] },
];

// ── textured quad ─────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub pos: [f32; 2],
    /// (0, 0) is the bottom-left of the image.
    pub uv: [f32; 2],
}

impl Vertex for TexturedVertex {
    const ATTRIBUTES: &'static [wgpu::VertexAttribute] =
        &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];
}

pub const TEXTURED_QUAD: [TexturedVertex; 6] = [
    TexturedVertex { pos: [-0.5, -0.5], uv: [0.0, 0.0] },
    TexturedVertex { pos: [0.5, -0.5], uv: [1.0, 0.0] },
    TexturedVertex { pos: [0.5, 0.5], uv: [1.0, 1.0] },
    TexturedVertex { pos: [0.5, 0.5], uv: [1.0, 1.0] },
    TexturedVertex { pos: [-0.5, 0.5], uv: [0.0, 1.0] },
    TexturedVertex { pos: [-0.5, -0.5], uv: [0.0, 0.0] },
];
