//! Renderers for the side-selection and game screens.
//!
//! [`GameRenderer`] is built once the assets have loaded. It owns the camera
//! uniform shared by the board, piece and highlight pipelines (bind group 0)
//! and the depth texture they test against.

pub mod board;
pub mod fade;
pub mod overlay;
pub mod pieces;

use crate::assets::Assets;
use crate::error::ShaderError;
use crate::renderer::frame::{FrameState, SceneDraw};
use crate::renderer::pipeline_builder::{
    BindGroupLayoutBuilder, DEPTH_FORMAT, create_uniform_bind_group, create_uniform_buffer,
};
use crate::renderer::shader_source::ShaderLibrary;
use crate::renderer::uniform::as_bytes;

use board::BoardRenderer;
use fade::FadeRenderer;
use overlay::OverlayRenderer;
use pieces::PieceRenderer;

pub struct GameRenderer {
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    board: BoardRenderer,
    pieces: PieceRenderer,
    overlay: OverlayRenderer,
    fade: FadeRenderer,
    depth_texture: Option<wgpu::Texture>,
}

impl GameRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_config: &wgpu::SurfaceConfiguration,
        library: &ShaderLibrary,
        assets: &Assets,
    ) -> Result<Self, ShaderError> {
        let format = surface_config.format;

        let camera_buffer =
            create_uniform_buffer(device, &FrameState::default().camera(), "Camera Uniform Buffer");
        let camera_layout = BindGroupLayoutBuilder::new(device)
            .with_label("Camera Bind Group Layout")
            .with_uniform_buffer(0, wgpu::ShaderStages::VERTEX)
            .build();
        let camera_bind_group =
            create_uniform_bind_group(device, &camera_layout, &camera_buffer, "Camera Bind Group");

        Ok(Self {
            board: BoardRenderer::new(device, queue, format, library, &camera_layout, assets)?,
            pieces: PieceRenderer::new(device, format, library, &camera_layout, assets)?,
            overlay: OverlayRenderer::new(device, format, library, &camera_layout)?,
            fade: FadeRenderer::new(device, format, library)?,
            camera_buffer,
            camera_bind_group,
            depth_texture: None,
        })
    }

    /// Returns a view of the depth texture, recreating it when the surface size changed.
    pub fn update_depth_texture(
        &mut self,
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = match self.depth_texture.take() {
            Some(texture) if texture.width() == width && texture.height() == height => texture,
            _ => device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            }),
        };
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.depth_texture = Some(texture);
        view
    }

    /// Uploads every uniform and instance buffer the scene will draw with.
    pub fn prepare(&mut self, queue: &wgpu::Queue, frame: &FrameState, scene: &SceneDraw) {
        queue.write_buffer(&self.camera_buffer, 0, as_bytes(&frame.camera()));
        match *scene {
            SceneDraw::Loading => {}
            SceneDraw::SideSelection { pieces } => {
                self.pieces.prepare(queue, frame, pieces);
            }
            SceneDraw::Game {
                pieces,
                highlights,
                fading,
            } => {
                self.pieces.prepare(queue, frame, pieces);
                self.overlay.prepare(queue, frame, highlights);
                if fading {
                    self.fade.prepare(queue, frame);
                }
            }
        }
    }

    /// Depth-tested passes: board, pieces, then highlight tiles.
    pub fn render_scene(&self, pass: &mut wgpu::RenderPass, scene: &SceneDraw) {
        match *scene {
            SceneDraw::Loading => {}
            SceneDraw::SideSelection { .. } => {
                self.pieces.render(pass, &self.camera_bind_group);
            }
            SceneDraw::Game { fading, .. } => {
                self.board.render(pass, &self.camera_bind_group);
                self.pieces.render(pass, &self.camera_bind_group);
                // highlights are hidden once the game is over
                if !fading {
                    self.overlay.render(pass, &self.camera_bind_group);
                }
            }
        }
    }

    pub fn render_fade(&self, pass: &mut wgpu::RenderPass) {
        self.fade.render(pass);
    }
}
