//! Error types for the host side of the application.
//!
//! Shader programs themselves are total; everything that can fail lives on the
//! CPU and is reported through one of these enums.

use std::path::PathBuf;

use thiserror::Error;

use crate::chess::Square;

/// Failures while turning a shader source file into two stage modules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShaderError {
    #[error("shader `{program}` has no `{marker}` section")]
    MissingStage {
        program: String,
        marker: &'static str,
    },

    #[error("shader `{program}` declares `{marker}` more than once (line {line})")]
    DuplicateStage {
        program: String,
        marker: &'static str,
        line: usize,
    },

    #[error("shader `{program}` includes unknown source `{name}` (line {line})")]
    UnknownInclude {
        program: String,
        name: String,
        line: usize,
    },

    #[error("included source `{name}` may not contain directive `{directive}`")]
    NestedDirective { name: String, directive: String },
}

/// Failures while loading meshes and textures from disk.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("OBJ parse error on line {line}: {message}")]
    Obj { line: usize, message: String },

    #[error("OBJ file has no faces")]
    EmptyMesh,
}

/// Failures talking to a UCI engine process.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("engine I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("engine did not answer `{0}` in time")]
    Timeout(&'static str),

    #[error("engine process closed its output")]
    Exited,

    #[error("malformed move `{0}`")]
    BadMove(String),
}

/// A requested move that the board refuses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("it is not the moving piece's turn")]
    WrongTurn,

    #[error("illegal move {from} -> {to}")]
    Illegal { from: Square, to: Square },

    #[error("a pawn reaching {0} needs a promotion piece")]
    MissingPromotion(Square),

    #[error("the game is already over")]
    GameOver,
}

/// Failures setting up or driving the GPU.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no compatible GPU adapter found")]
    NoAdapter,

    #[error("the surface reports no usable texture format")]
    UnsupportedSurface,

    #[error("failed to create the surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to acquire a device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("failed to acquire the next frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),

    #[error(transparent)]
    Shader(#[from] ShaderError),
}
