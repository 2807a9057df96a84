//! Marble Chess: a 3D chess board rendered with wgpu.
//!
//! - `app/`: window, input and the per-frame loop
//! - `scene/`: loading, side selection and game screens, picking, opponents
//! - `chess/`: board model and move rules
//! - `renderer/`: shader preprocessing, pipelines and draw passes
//! - `shading/`: shader constants and their CPU-side rules
//! - `engine/`: UCI engine subprocess
//! - `math/`: matrices, vectors, rays and boxes

pub mod app;
pub mod assets;
pub mod chess;
pub mod config;
pub mod engine;
pub mod error;
pub mod keys;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod shading;
