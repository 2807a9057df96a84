//! Highlighted destination tiles, drawn as lifted translucent quads.
//!
//! Each instance carries only its tile and capture flag. The vertex stage
//! picks colour, alpha and lift from those and the `hovered` / `prev_move`
//! uniform at bind group 1.

use wgpu::util::DeviceExt;

use crate::error::ShaderError;
use crate::renderer::frame::{FrameState, HighlightInstance};
use crate::renderer::pipeline_builder::{
    BindGroupLayoutBuilder, PipelineBuilder, create_instance_buffer, create_uniform_bind_group,
    create_uniform_buffer, create_vertex_2d_layout,
};
use crate::renderer::shader_source::{Program, ShaderLibrary};
use crate::renderer::uniform::as_bytes;
use crate::shading::highlight::Highlight;

/// Half the side of a highlight quad, leaving a thin gap between tiles.
pub const TILE_HALF_SIZE: f32 = 0.45;
/// A queen in the centre reaches 27 squares; one more for the previous move.
pub const MAX_HIGHLIGHTS: usize = 64;

pub struct OverlayRenderer {
    pipeline: wgpu::RenderPipeline,
    quad_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    count: u32,
    highlight_buffer: wgpu::Buffer,
    highlight_bind_group: wgpu::BindGroup,
}

impl OverlayRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        library: &ShaderLibrary,
        camera_layout: &wgpu::BindGroupLayout,
    ) -> Result<Self, ShaderError> {
        let stages = library.program(Program::Overlay)?;

        let h = TILE_HALF_SIZE;
        let quad: [[f32; 2]; 6] = [[-h, -h], [h, -h], [h, h], [-h, -h], [h, h], [-h, h]];
        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Highlight Quad Buffer"),
            contents: bytemuck::cast_slice(&quad),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let highlight_buffer = create_uniform_buffer(
            device,
            &FrameState::default().highlight(),
            "Highlight Uniform Buffer",
        );
        let highlight_layout = BindGroupLayoutBuilder::new(device)
            .with_label("Highlight Bind Group Layout")
            .with_uniform_buffer(0, wgpu::ShaderStages::VERTEX)
            .build();
        let highlight_bind_group = create_uniform_bind_group(
            device,
            &highlight_layout,
            &highlight_buffer,
            "Highlight Bind Group",
        );

        let pipeline = PipelineBuilder::new(device, surface_format)
            .with_label("Highlight Pipeline")
            .with_shader(&stages)
            .with_vertex_buffer(create_vertex_2d_layout())
            .with_vertex_buffer(HighlightInstance::layout())
            .with_bind_group_layout(camera_layout)
            .with_bind_group_layout(&highlight_layout)
            .with_alpha_blending()
            .with_no_culling()
            .with_depth(false)
            .build();

        Ok(Self {
            pipeline,
            quad_buffer,
            instance_buffer: create_instance_buffer::<HighlightInstance>(
                device,
                MAX_HIGHLIGHTS,
                "Highlight Instance Buffer",
            ),
            count: 0,
            highlight_buffer,
            highlight_bind_group,
        })
    }

    pub fn prepare(&mut self, queue: &wgpu::Queue, frame: &FrameState, highlights: &[Highlight]) {
        queue.write_buffer(&self.highlight_buffer, 0, as_bytes(&frame.highlight()));

        let instances: Vec<HighlightInstance> = highlights
            .iter()
            .take(MAX_HIGHLIGHTS)
            .map(HighlightInstance::new)
            .collect();
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
        self.count = instances.len() as u32;
    }

    pub fn render(&self, pass: &mut wgpu::RenderPass, camera_bind_group: &wgpu::BindGroup) {
        if self.count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera_bind_group, &[]);
        pass.set_bind_group(1, &self.highlight_bind_group, &[]);
        pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        pass.draw(0..6, 0..self.count);
    }
}
