//! Per-frame update and redraw.

use tracing::{error, info};

use crate::error::RenderError;
use crate::renderer::frame::{FrameState, SceneDraw};
use crate::scene::picking::PieceBounds;
use crate::scene::{GameScene, Screen, SideSelection};

use super::app_state::AppState;

impl AppState {
    /// Advances the current screen by one frame and handles transitions.
    pub fn update(&mut self) -> Result<(), RenderError> {
        match self.screen {
            Screen::Loading => {
                let Some(assets) = self.loader.as_ref().and_then(|loader| loader.poll()) else {
                    return Ok(());
                };
                self.renderer.load_assets(&assets)?;
                self.bounds = PieceBounds::from_assets(&assets);
                self.loader = None;
                info!(
                    seconds = self.started.elapsed().as_secs_f32(),
                    "assets loaded"
                );
                self.set_screen(Screen::SideSelection(SideSelection::new()));
            }
            Screen::SideSelection(_) => {}
            Screen::Game(_) => {
                let ray = self.cursor_ray();
                let finished = match &mut self.screen {
                    Screen::Game(game) => {
                        game.update(ray);
                        game.is_over()
                    }
                    _ => false,
                };
                if finished {
                    self.set_screen(Screen::SideSelection(SideSelection::new()));
                }
            }
        }
        Ok(())
    }

    pub fn handle_click(&mut self) {
        let Some(ray) = self.cursor_ray() else {
            return;
        };
        match &mut self.screen {
            Screen::Loading => {}
            Screen::SideSelection(selection) => {
                if let Some(player) = selection.click(&ray, &self.bounds) {
                    let opponent = self.create_opponent(player.other());
                    let game = GameScene::new(player, opponent, self.bounds.clone());
                    self.set_screen(Screen::Game(Box::new(game)));
                }
            }
            Screen::Game(game) => game.click(&ray),
        }
    }

    pub fn cancel_selection(&mut self) {
        if let Screen::Game(game) = &mut self.screen {
            game.cancel_selection();
        }
    }

    pub fn render(&mut self) -> Result<(), RenderError> {
        let aspect = self.renderer.aspect();
        let (frame, scene) = match &self.screen {
            Screen::Loading => (
                FrameState {
                    time: self.started.elapsed().as_secs_f32(),
                    ..FrameState::default()
                },
                SceneDraw::Loading,
            ),
            Screen::SideSelection(selection) => (
                selection.frame(aspect),
                SceneDraw::SideSelection {
                    pieces: selection.pieces(),
                },
            ),
            Screen::Game(game) => (game.frame(aspect), game.draw()),
        };
        self.renderer.render(&frame, &scene)
    }

    fn set_screen(&mut self, screen: Screen) {
        info!(from = self.screen.name(), to = screen.name(), "switching screen");
        self.screen = screen;
    }

    /// Update then draw; errors are logged and returned so the caller can exit.
    pub fn frame(&mut self) -> Result<(), RenderError> {
        self.update()
            .and_then(|()| self.render())
            .inspect_err(|err| error!(%err, "frame failed"))
    }
}
