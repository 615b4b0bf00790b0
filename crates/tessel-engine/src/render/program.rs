use std::borrow::Cow;

use crate::shader::{LinkedProgram, ResourceKind, ResourceSlot, ShaderError};

use super::{QuadTexture, Release};

/// A linked program on the GPU: render pipeline plus the bind group layout
/// reflected from its resource slots.
pub struct GpuProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: Option<wgpu::BindGroupLayout>,
    resources: Vec<ResourceSlot>,
}

impl GpuProgram {
    /// Builds the render pipeline for `program`, drawing triangle lists from
    /// one vertex buffer laid out as `vertex_layout` into `target_format`.
    ///
    /// The stage IR moves into wgpu shader modules that are dropped once the
    /// pipeline exists. Fails if the vertex layout does not feed every vertex
    /// input.
    pub fn new(
        device: &wgpu::Device,
        target_format: wgpu::TextureFormat,
        program: LinkedProgram,
        vertex_layout: wgpu::VertexBufferLayout<'_>,
    ) -> Result<Self, ShaderError> {
        program.check_vertex_attributes(vertex_layout.attributes)?;

        let resources = program.resources().to_vec();
        let LinkedProgram { vertex, fragment, .. } = program;

        let vs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(vertex.label.as_str()),
            source: wgpu::ShaderSource::Naga(Cow::Owned(vertex.module)),
        });
        let fs_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(fragment.label.as_str()),
            source: wgpu::ShaderSource::Naga(Cow::Owned(fragment.module)),
        });

        let bind_group_layout = if resources.is_empty() {
            None
        } else {
            let entries: Vec<wgpu::BindGroupLayoutEntry> =
                resources.iter().map(layout_entry).collect();
            Some(device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("tessel program bgl"),
                entries: &entries,
            }))
        };

        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> =
            bind_group_layout.iter().collect();
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessel program pipeline layout"),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tessel program pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(vertex.entry_point.as_str()),
                compilation_options: Default::default(),
                buffers: &[vertex_layout],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some(fragment.entry_point.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::info!(
            "program pipeline ready ({} -> {}, {} binding(s))",
            vertex.label,
            fragment.label,
            resources.len()
        );

        Ok(Self {
            pipeline,
            bind_group_layout,
            resources,
        })
    }

    /// Bind group feeding every texture slot with `texture`'s view and every
    /// sampler slot with its sampler. `None` for programs without resources.
    pub fn texture_bind_group(
        &self,
        device: &wgpu::Device,
        texture: &QuadTexture,
    ) -> Option<wgpu::BindGroup> {
        let layout = self.bind_group_layout.as_ref()?;

        let entries: Vec<wgpu::BindGroupEntry<'_>> = self
            .resources
            .iter()
            .map(|slot| wgpu::BindGroupEntry {
                binding: slot.binding,
                resource: match slot.kind {
                    ResourceKind::Texture2d => wgpu::BindingResource::TextureView(texture.view()),
                    ResourceKind::Sampler => wgpu::BindingResource::Sampler(texture.sampler()),
                },
            })
            .collect();

        Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessel texture bind group"),
            layout,
            entries: &entries,
        }))
    }

    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
    }

}

impl Release for GpuProgram {
    fn release(self) {
        drop(self.pipeline);
        drop(self.bind_group_layout);
        log::debug!("released program");
    }
}

fn layout_entry(slot: &ResourceSlot) -> wgpu::BindGroupLayoutEntry {
    let ty = match slot.kind {
        ResourceKind::Texture2d => wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        ResourceKind::Sampler => wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
    };

    wgpu::BindGroupLayoutEntry {
        binding: slot.binding,
        visibility: slot.visibility,
        ty,
        count: None,
    }
}
