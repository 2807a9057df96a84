//! Loading screen: a row of white points with a travelling bump.
//!
//! Each point is a tiny instanced quad. The quad corners reuse the
//! fullscreen vertex buffer and are scaled down in the vertex stage.

use wgpu::util::DeviceExt;

use crate::error::ShaderError;
use crate::renderer::frame::FrameState;
use crate::renderer::pipeline_builder::{
    BindGroupLayoutBuilder, PipelineBuilder, create_fullscreen_vertices, create_uniform_bind_group,
    create_uniform_buffer, create_vertex_2d_layout,
};
use crate::renderer::shader_source::{Program, ShaderLibrary};
use crate::renderer::uniform::as_bytes;
use crate::shading::loading::row_points;

pub struct LoadingRenderer {
    pipeline: wgpu::RenderPipeline,
    corner_buffer: wgpu::Buffer,
    point_buffer: wgpu::Buffer,
    point_count: u32,
    wave_buffer: wgpu::Buffer,
    wave_bind_group: wgpu::BindGroup,
}

impl LoadingRenderer {
    const POINT_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];

    pub fn new(
        device: &wgpu::Device,
        surface_config: &wgpu::SurfaceConfiguration,
        library: &ShaderLibrary,
    ) -> Result<Self, ShaderError> {
        let stages = library.program(Program::Loading)?;

        let wave_buffer =
            create_uniform_buffer(device, &FrameState::default().wave(), "Wave Uniform Buffer");
        let wave_layout = BindGroupLayoutBuilder::new(device)
            .with_label("Wave Bind Group Layout")
            .with_uniform_buffer(0, wgpu::ShaderStages::VERTEX)
            .build();
        let wave_bind_group =
            create_uniform_bind_group(device, &wave_layout, &wave_buffer, "Wave Bind Group");

        let points = row_points();
        let point_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Loading Point Buffer"),
            contents: bytemuck::cast_slice(&points),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let pipeline = PipelineBuilder::new(device, surface_config.format)
            .with_label("Loading Pipeline")
            .with_shader(&stages)
            .with_vertex_buffer(create_vertex_2d_layout())
            .with_vertex_buffer(wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &Self::POINT_ATTRIBUTES,
            })
            .with_bind_group_layout(&wave_layout)
            .with_no_culling()
            .build();

        Ok(Self {
            pipeline,
            corner_buffer: create_fullscreen_vertices(device),
            point_buffer,
            point_count: points.len() as u32,
            wave_buffer,
            wave_bind_group,
        })
    }

    pub fn prepare(&self, queue: &wgpu::Queue, frame: &FrameState) {
        queue.write_buffer(&self.wave_buffer, 0, as_bytes(&frame.wave()));
    }

    pub fn render(&self, pass: &mut wgpu::RenderPass) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.wave_bind_group, &[]);
        pass.set_vertex_buffer(0, self.corner_buffer.slice(..));
        pass.set_vertex_buffer(1, self.point_buffer.slice(..));
        pass.draw(0..6, 0..self.point_count);
    }
}
