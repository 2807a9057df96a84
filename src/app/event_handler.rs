//! Window and input event routing.

use std::sync::Arc;

use tracing::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::app::app_state::AppState;
use crate::config::Config;
use crate::keys::GameKey;

pub struct App {
    pub instance: wgpu::Instance,
    pub config: Config,
    pub state: Option<AppState>,
    pub window: Option<Arc<Window>>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        Self {
            instance,
            config,
            state: None,
            window: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Option<Arc<Window>> {
        let attributes = Window::default_attributes()
            .with_title("Marble Chess")
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        match event_loop.create_window(attributes) {
            Ok(window) => Some(Arc::new(window)),
            Err(err) => {
                error!(%err, "failed to create window");
                None
            }
        }
    }

    pub fn handle_redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        if window.is_minimized().unwrap_or(false) {
            return;
        }
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.frame().is_err() {
            event_loop.exit();
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        match GameKey::from_key_code(code) {
            Some(GameKey::CancelSelection) => {
                if let Some(state) = self.state.as_mut() {
                    state.cancel_selection();
                }
            }
            Some(GameKey::Quit) => event_loop.exit(),
            None => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(window) = self.create_window(event_loop) else {
            event_loop.exit();
            return;
        };

        match pollster::block_on(AppState::new(
            &self.instance,
            window.clone(),
            self.config.clone(),
        )) {
            Ok(state) => {
                info!("renderer initialised");
                self.state = Some(state);
                self.window = Some(window);
            }
            Err(err) => {
                error!(%err, "failed to initialise the renderer");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(state) = self.state.as_mut() {
                    state.renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(state) = self.state.as_mut() {
                    state.cursor = Some((position.x, position.y));
                }
            }
            WindowEvent::CursorLeft { .. } => {
                if let Some(state) = self.state.as_mut() {
                    state.cursor = None;
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(state) = self.state.as_mut() {
                    state.handle_click();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::RedrawRequested => self.handle_redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
