//! The textured board slab.

use crate::assets::Assets;
use crate::error::ShaderError;
use crate::renderer::mesh::{GpuMesh, MeshVertex};
use crate::renderer::pipeline_builder::{BindGroupLayoutBuilder, PipelineBuilder};
use crate::renderer::shader_source::{Program, ShaderLibrary};
use crate::renderer::texture::create_repeat_sampler;

pub struct BoardRenderer {
    pipeline: wgpu::RenderPipeline,
    mesh: GpuMesh,
    texture_bind_group: wgpu::BindGroup,
}

impl BoardRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        library: &ShaderLibrary,
        camera_layout: &wgpu::BindGroupLayout,
        assets: &Assets,
    ) -> Result<Self, ShaderError> {
        let stages = library.program(Program::Board)?;

        let texture_layout = BindGroupLayoutBuilder::new(device)
            .with_label("Board Texture Layout")
            .with_texture(0, wgpu::ShaderStages::FRAGMENT)
            .with_texture(1, wgpu::ShaderStages::FRAGMENT)
            .with_sampler(2, wgpu::ShaderStages::FRAGMENT)
            .build();

        let marble = assets.marble.upload(device, queue, "Marble Texture");
        let wood = assets.wood.upload(device, queue, "Wood Texture");
        let sampler = create_repeat_sampler(device);
        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Board Texture Bind Group"),
            layout: &texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&marble),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&wood),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let pipeline = PipelineBuilder::new(device, surface_format)
            .with_label("Board Pipeline")
            .with_shader(&stages)
            .with_vertex_buffer(MeshVertex::layout())
            .with_bind_group_layout(camera_layout)
            .with_bind_group_layout(&texture_layout)
            .with_no_culling()
            .with_depth(true)
            .build();

        Ok(Self {
            pipeline,
            mesh: assets.board.upload(device, "Board"),
            texture_bind_group,
        })
    }

    pub fn render(&self, pass: &mut wgpu::RenderPass, camera_bind_group: &wgpu::BindGroup) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera_bind_group, &[]);
        pass.set_bind_group(1, &self.texture_bind_group, &[]);
        pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(self.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.mesh.index_count, 0, 0..1);
    }
}
