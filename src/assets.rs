//! Piece meshes and board textures, loaded off the render thread.
//!
//! Files are looked up under the asset directory:
//!
//! - `models/<piece>.obj` for each piece kind
//! - `textures/marble.{png,jpg}` and `textures/wood.{png,jpg}`
//!
//! Anything missing or unreadable is replaced by a procedural stand-in, so
//! loading always produces a complete [`Assets`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use tracing::{info, warn};

use crate::chess::PieceKind;
use crate::error::AssetError;
use crate::renderer::mesh::Mesh;
use crate::renderer::texture::{Surface, TextureImage};

/// Thickness of the board slab below the playing surface.
pub const BOARD_DEPTH: f32 = 0.5;
/// Side of the board slab, one rim tile around the 8x8 grid.
pub const BOARD_SIZE: f32 = 9.0;
const TEXTURE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
const GENERATED_TEXTURE_SIZE: u32 = 256;

/// Everything the game screen needs on the GPU, still in CPU memory.
#[derive(Debug, Clone)]
pub struct Assets {
    pub board: Mesh,
    pub pieces: HashMap<PieceKind, Mesh>,
    pub marble: TextureImage,
    pub wood: TextureImage,
}

impl Assets {
    pub fn load(dir: &Path) -> Assets {
        let mut board = Mesh::cuboid([BOARD_SIZE, BOARD_SIZE, BOARD_DEPTH]);
        board.anchor([0.0, 0.0, 1.0]);

        let pieces = PieceKind::ALL
            .into_iter()
            .map(|kind| {
                let path = dir.join("models").join(format!("{}.obj", kind.name()));
                let mut mesh = Mesh::load_obj(&path).unwrap_or_else(|err| {
                    warn!(piece = kind.name(), %err, "using procedural piece mesh");
                    Mesh::piece(kind)
                });
                mesh.anchor([0.5, 0.5, 0.0]);
                (kind, mesh)
            })
            .collect();

        let mut rng = rand::thread_rng();
        let mut texture = |name: &str, surface: Surface| {
            load_texture(dir, name).unwrap_or_else(|err| {
                warn!(texture = name, %err, "using procedural texture");
                TextureImage::generate(surface, GENERATED_TEXTURE_SIZE, &mut rng)
            })
        };
        let marble = texture("marble", Surface::Marble);
        let wood = texture("wood", Surface::Wood);

        Assets {
            board,
            pieces,
            marble,
            wood,
        }
    }

    pub fn piece_mesh(&self, kind: PieceKind) -> Option<&Mesh> {
        self.pieces.get(&kind)
    }
}

fn load_texture(dir: &Path, name: &str) -> Result<TextureImage, AssetError> {
    let textures = dir.join("textures");
    let path = TEXTURE_EXTENSIONS
        .iter()
        .map(|ext| textures.join(format!("{name}.{ext}")))
        .find(|path| path.exists())
        .unwrap_or_else(|| textures.join(format!("{name}.png")));
    TextureImage::load(&path)
}

/// One-shot background load. Poll once per frame until it yields.
pub struct AssetLoader {
    receiver: Receiver<Assets>,
}

impl AssetLoader {
    pub fn spawn(dir: PathBuf) -> Self {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            info!(dir = %dir.display(), "loading assets");
            let assets = Assets::load(&dir);
            // receiver gone means the app already quit
            let _ = sender.send(assets);
        });
        Self { receiver }
    }

    /// `Some` exactly once, when loading has finished.
    pub fn poll(&self) -> Option<Assets> {
        match self.receiver.try_recv() {
            Ok(assets) => Some(assets),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}
