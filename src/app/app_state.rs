use std::sync::Arc;
use std::time::Instant;

use tracing::info;
use winit::window::Window;

use crate::assets::AssetLoader;
use crate::chess::Player;
use crate::config::Config;
use crate::engine::EngineSettings;
use crate::error::RenderError;
use crate::math::Ray;
use crate::renderer::wgpu_lib::WgpuRenderer;
use crate::scene::Screen;
use crate::scene::opponent::{DebugOpponent, EngineOpponent, Opponent};
use crate::scene::picking::PieceBounds;

/// State that exists while the application has a window.
pub struct AppState {
    pub renderer: WgpuRenderer,
    pub screen: Screen,
    pub config: Config,
    pub loader: Option<AssetLoader>,
    pub bounds: PieceBounds,
    /// Cursor position in physical pixels, `None` while outside the window.
    pub cursor: Option<(f64, f64)>,
    pub started: Instant,
}

impl AppState {
    pub async fn new(
        instance: &wgpu::Instance,
        window: Arc<Window>,
        config: Config,
    ) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let surface = instance.create_surface(window)?;
        let renderer = WgpuRenderer::new(instance, surface, size.width, size.height).await?;

        Ok(Self {
            renderer,
            screen: Screen::Loading,
            loader: Some(AssetLoader::spawn(config.assets.clone())),
            config,
            bounds: PieceBounds::default(),
            cursor: None,
            started: Instant::now(),
        })
    }

    /// Ray under the cursor for the current screen's camera.
    pub fn cursor_ray(&self) -> Option<Ray> {
        let cursor = self.cursor?;
        let camera = match &self.screen {
            Screen::Loading => return None,
            Screen::SideSelection(selection) => selection.camera(),
            Screen::Game(game) => game.camera(),
        };
        camera.cursor_to_ray(cursor, self.renderer.size())
    }

    /// The engine for the other side, or the debug opponent when asked for.
    pub fn create_opponent(&self, side: Player) -> Box<dyn Opponent> {
        if self.config.debug {
            info!(?side, "debug opponent");
            return Box::new(DebugOpponent::new(side));
        }
        Box::new(EngineOpponent::spawn(EngineSettings::from(&self.config), side))
    }
}
