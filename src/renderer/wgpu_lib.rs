//! The wgpu device, surface and the per-screen renderers.
//!
//! [`WgpuRenderer::new`] brings up the adapter, device and surface and builds
//! the loading renderer. The game renderer follows once
//! [`WgpuRenderer::load_assets`] has the meshes and textures. Each redraw goes
//! through [`WgpuRenderer::render`] with that frame's [`FrameState`].

use tracing::{debug, info, warn};

use crate::assets::Assets;
use crate::error::RenderError;
use crate::renderer::frame::{FrameState, SceneDraw};
use crate::renderer::game_renderer::GameRenderer;
use crate::renderer::loading_renderer::LoadingRenderer;
use crate::renderer::shader_source::ShaderLibrary;

/// Background colour behind the board.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.15,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};

pub struct WgpuRenderer {
    pub surface: wgpu::Surface<'static>,
    pub surface_config: wgpu::SurfaceConfiguration,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    library: ShaderLibrary,
    loading_renderer: LoadingRenderer,
    game_renderer: Option<GameRenderer>,
}

impl WgpuRenderer {
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'static>,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let adapter = Self::create_adapter(instance, &surface).await?;
        info!(adapter = %adapter.get_info().name, "using GPU adapter");
        let (device, queue) = Self::create_device(&adapter).await?;
        let surface_config = Self::create_surface_config(&surface, &adapter, width, height)?;

        surface.configure(&device, &surface_config);

        let library = ShaderLibrary::default();
        let loading_renderer = LoadingRenderer::new(&device, &surface_config, &library)?;

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            library,
            loading_renderer,
            game_renderer: None,
        })
    }

    /// Uploads the loaded assets and builds the board and piece pipelines.
    pub fn load_assets(&mut self, assets: &Assets) -> Result<(), RenderError> {
        let renderer = GameRenderer::new(
            &self.device,
            &self.queue,
            &self.surface_config,
            &self.library,
            assets,
        )?;
        self.game_renderer = Some(renderer);
        debug!("game renderer ready");
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    pub fn aspect(&self) -> f32 {
        self.surface_config.width as f32 / self.surface_config.height.max(1) as f32
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Draws one frame. A lost or outdated surface is reconfigured and the
    /// frame skipped.
    pub fn render(&mut self, frame: &FrameState, scene: &SceneDraw) -> Result<(), RenderError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                debug!("surface outdated, reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("timed out waiting for the next frame");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        match (scene, self.game_renderer.as_mut()) {
            (SceneDraw::Loading, _) | (_, None) => {
                self.loading_renderer.prepare(&self.queue, frame);
                Self::render_loading(&self.loading_renderer, &mut encoder, &surface_view);
            }
            (scene, Some(game_renderer)) => {
                let (width, height) = (self.surface_config.width, self.surface_config.height);
                let depth_view = game_renderer.update_depth_texture(&self.device, width, height);
                game_renderer.prepare(&self.queue, frame, scene);
                Self::render_scene(game_renderer, &mut encoder, &surface_view, &depth_view, scene);
                if matches!(scene, SceneDraw::Game { fading: true, .. }) {
                    Self::render_fade(game_renderer, &mut encoder, &surface_view);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    async fn create_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'static>,
    ) -> Result<wgpu::Adapter, RenderError> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: Some(surface),
            })
            .await
            .ok_or(RenderError::NoAdapter)
    }

    async fn create_device(
        adapter: &wgpu::Adapter,
    ) -> Result<(wgpu::Device, wgpu::Queue), RenderError> {
        let device = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_defaults(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;
        Ok(device)
    }

    fn create_surface_config(
        surface: &wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<wgpu::SurfaceConfiguration, RenderError> {
        let capabilities = surface.get_capabilities(adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| capabilities.formats.first().copied())
            .ok_or(RenderError::UnsupportedSurface)?;
        let alpha_mode = capabilities
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode,
            view_formats: vec![],
        })
    }

    fn render_loading(
        loading_renderer: &LoadingRenderer,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Loading Screen Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        loading_renderer.render(&mut pass);
    }

    fn render_scene(
        game_renderer: &GameRenderer,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        scene: &SceneDraw,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Main Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        game_renderer.render_scene(&mut pass, scene);
    }

    fn render_fade(
        game_renderer: &GameRenderer,
        encoder: &mut wgpu::CommandEncoder,
        surface_view: &wgpu::TextureView,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Fade Overlay Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: surface_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        game_renderer.render_fade(&mut pass);
    }
}
