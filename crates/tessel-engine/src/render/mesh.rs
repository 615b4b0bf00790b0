use bytemuck::Pod;
use wgpu::util::DeviceExt;

use super::Release;

/// Vertex type uploadable into a [`StaticMesh`].
pub trait Vertex: Pod {
    /// Attribute list; shader locations must match the vertex stage inputs.
    const ATTRIBUTES: &'static [wgpu::VertexAttribute];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: Self::ATTRIBUTES,
        }
    }
}

/// Immutable vertex buffer, drawn non-indexed.
pub struct StaticMesh {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl StaticMesh {
    /// Uploads `vertices` once into a vertex-only buffer.
    pub fn upload<V: Vertex>(device: &wgpu::Device, label: &str, vertices: &[V]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::debug!(
            "uploaded mesh '{label}': {} vertices, {} bytes",
            vertices.len(),
            std::mem::size_of_val(vertices)
        );

        Self {
            buffer,
            vertex_count: vertices.len() as u32,
        }
    }

    /// Binds the buffer at slot 0 and issues one draw over all vertices.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }

}

impl Release for StaticMesh {
    fn release(self) {
        self.buffer.destroy();
        log::debug!("released mesh buffer");
    }
}
