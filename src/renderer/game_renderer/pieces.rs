//! Piece meshes drawn instanced, one instance buffer per piece kind.

use std::collections::HashMap;

use tracing::warn;

use crate::assets::Assets;
use crate::chess::PieceKind;
use crate::error::ShaderError;
use crate::renderer::frame::{FrameState, PieceDraw, PieceInstance};
use crate::renderer::mesh::{GpuMesh, MeshVertex};
use crate::renderer::pipeline_builder::{
    BindGroupLayoutBuilder, PipelineBuilder, create_instance_buffer, create_uniform_bind_group,
    create_uniform_buffer,
};
use crate::renderer::shader_source::{Program, ShaderLibrary};
use crate::renderer::uniform::as_bytes;

/// Instances per kind. Covers a full side of one kind plus promotion props.
pub const MAX_INSTANCES_PER_KIND: usize = 32;

struct KindBatch {
    mesh: GpuMesh,
    instances: wgpu::Buffer,
    count: u32,
}

pub struct PieceRenderer {
    pipeline: wgpu::RenderPipeline,
    batches: HashMap<PieceKind, KindBatch>,
    selection_buffer: wgpu::Buffer,
    selection_bind_group: wgpu::BindGroup,
}

impl PieceRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        library: &ShaderLibrary,
        camera_layout: &wgpu::BindGroupLayout,
        assets: &Assets,
    ) -> Result<Self, ShaderError> {
        let stages = library.program(Program::Pieces)?;

        let selection_buffer = create_uniform_buffer(
            device,
            &FrameState::default().selection(),
            "Selection Uniform Buffer",
        );
        let selection_layout = BindGroupLayoutBuilder::new(device)
            .with_label("Selection Bind Group Layout")
            .with_uniform_buffer(0, wgpu::ShaderStages::VERTEX)
            .build();
        let selection_bind_group = create_uniform_bind_group(
            device,
            &selection_layout,
            &selection_buffer,
            "Selection Bind Group",
        );

        let batches = assets
            .pieces
            .iter()
            .map(|(&kind, mesh)| {
                let batch = KindBatch {
                    mesh: mesh.upload(device, kind.name()),
                    instances: create_instance_buffer::<PieceInstance>(
                        device,
                        MAX_INSTANCES_PER_KIND,
                        "Piece Instance Buffer",
                    ),
                    count: 0,
                };
                (kind, batch)
            })
            .collect();

        let pipeline = PipelineBuilder::new(device, surface_format)
            .with_label("Piece Pipeline")
            .with_shader(&stages)
            .with_vertex_buffer(MeshVertex::layout())
            .with_vertex_buffer(PieceInstance::layout())
            .with_bind_group_layout(camera_layout)
            .with_bind_group_layout(&selection_layout)
            .with_no_culling()
            .with_depth(true)
            .build();

        Ok(Self {
            pipeline,
            batches,
            selection_buffer,
            selection_bind_group,
        })
    }

    /// Groups the frame's pieces by kind and rewrites every instance buffer.
    pub fn prepare(&mut self, queue: &wgpu::Queue, frame: &FrameState, pieces: &[PieceDraw]) {
        queue.write_buffer(&self.selection_buffer, 0, as_bytes(&frame.selection()));

        for (kind, batch) in &mut self.batches {
            let mut instances: Vec<PieceInstance> = pieces
                .iter()
                .filter(|piece| piece.kind == *kind)
                .map(PieceDraw::instance)
                .collect();
            if instances.len() > MAX_INSTANCES_PER_KIND {
                warn!(kind = kind.name(), count = instances.len(), "too many piece instances");
                instances.truncate(MAX_INSTANCES_PER_KIND);
            }
            if !instances.is_empty() {
                queue.write_buffer(&batch.instances, 0, bytemuck::cast_slice(&instances));
            }
            batch.count = instances.len() as u32;
        }
    }

    pub fn render(&self, pass: &mut wgpu::RenderPass, camera_bind_group: &wgpu::BindGroup) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, camera_bind_group, &[]);
        pass.set_bind_group(1, &self.selection_bind_group, &[]);

        for batch in self.batches.values().filter(|batch| batch.count > 0) {
            pass.set_vertex_buffer(0, batch.mesh.vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, batch.instances.slice(..));
            pass.set_index_buffer(batch.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..batch.mesh.index_count, 0, 0..batch.count);
        }
    }
}
