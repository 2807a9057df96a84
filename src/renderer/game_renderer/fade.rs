//! Fullscreen black overlay used to fade out a finished game.

use crate::error::ShaderError;
use crate::renderer::frame::FrameState;
use crate::renderer::pipeline_builder::{
    BindGroupLayoutBuilder, PipelineBuilder, create_fullscreen_vertices, create_uniform_bind_group,
    create_uniform_buffer, create_vertex_2d_layout,
};
use crate::renderer::shader_source::{Program, ShaderLibrary};
use crate::renderer::uniform::as_bytes;

pub struct FadeRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl FadeRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        library: &ShaderLibrary,
    ) -> Result<Self, ShaderError> {
        let stages = library.program(Program::Fade)?;

        let uniform_buffer =
            create_uniform_buffer(device, &FrameState::default().fade(), "Fade Uniform Buffer");
        let layout = BindGroupLayoutBuilder::new(device)
            .with_label("Fade Bind Group Layout")
            .with_uniform_buffer(0, wgpu::ShaderStages::FRAGMENT)
            .build();
        let bind_group = create_uniform_bind_group(device, &layout, &uniform_buffer, "Fade Bind Group");

        let pipeline = PipelineBuilder::new(device, surface_format)
            .with_label("Fade Pipeline")
            .with_shader(&stages)
            .with_vertex_buffer(create_vertex_2d_layout())
            .with_bind_group_layout(&layout)
            .with_alpha_blending()
            .with_no_culling()
            .build();

        Ok(Self {
            pipeline,
            vertex_buffer: create_fullscreen_vertices(device),
            uniform_buffer,
            bind_group,
        })
    }

    pub fn prepare(&self, queue: &wgpu::Queue, frame: &FrameState) {
        queue.write_buffer(&self.uniform_buffer, 0, as_bytes(&frame.fade()));
    }

    /// Draws into a pass without a depth attachment.
    pub fn render(&self, pass: &mut wgpu::RenderPass) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..6, 0..1);
    }
}
