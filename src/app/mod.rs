//! Application shell: window, event routing and the per-frame loop.
//!
//! - [`event_handler`]: [`App`], the winit `ApplicationHandler`
//! - [`app_state`]: [`AppState`], everything that exists once a window does
//! - [`update`]: screen transitions and the redraw path
//!
//! Everything here runs on the event loop thread. Asset loading and engine
//! searches report back through channels polled once per frame.

pub mod app_state;
pub mod event_handler;
pub mod update;

pub use app_state::AppState;
pub use event_handler::App;
