//! GPU side of the application.
//!
//! Shader sources are preprocessed by [`shader_source`] and compiled through
//! [`pipeline_builder`]. Each frame the app hands a [`frame::FrameState`] and
//! a [`frame::SceneDraw`] to [`wgpu_lib::WgpuRenderer`].

pub mod frame;
/// Board, piece, highlight and fade pipelines.
pub mod game_renderer;
pub mod loading_renderer;
pub mod mesh;
pub mod pipeline_builder;
pub mod shader_source;
pub mod texture;
pub mod uniform;
pub mod wgpu_lib;
