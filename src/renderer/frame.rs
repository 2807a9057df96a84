//! Per-frame snapshot of everything the passes read.
//!
//! Scenes build one [`FrameState`] and one [`SceneDraw`] per redraw; the
//! renderers only read them. Nothing here outlives the frame.

use crate::chess::{EntityId, PieceKind, Player, Square};
use crate::math::Mat4;
use crate::renderer::uniform::{
    CameraUniform, FadeUniform, HighlightUniform, SelectionUniform, WaveUniform,
};
use crate::shading::highlight::{Highlight, tile_coords};
use crate::shading::pieces::NO_SELECTION;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub proj: Mat4,
    pub view: Mat4,
    /// Seconds since the current screen appeared.
    pub time: f32,
    pub selected: Option<EntityId>,
    pub hovered: Option<Square>,
    /// Destination of the most recent move.
    pub prev_move: Option<Square>,
    pub opacity: f32,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            proj: Mat4::identity(),
            view: Mat4::identity(),
            time: 0.0,
            selected: None,
            hovered: None,
            prev_move: None,
            opacity: 0.0,
        }
    }
}

impl FrameState {
    pub fn camera(&self) -> CameraUniform {
        CameraUniform {
            proj: self.proj.into(),
            view: self.view.into(),
        }
    }

    pub fn selection(&self) -> SelectionUniform {
        SelectionUniform {
            selected: self.selected.map_or(NO_SELECTION, EntityId::shader_id),
            _padding: [0; 3],
        }
    }

    pub fn wave(&self) -> WaveUniform {
        WaveUniform {
            time: self.time,
            _padding: [0.0; 3],
        }
    }

    pub fn fade(&self) -> FadeUniform {
        FadeUniform {
            opacity: self.opacity.clamp(0.0, 1.0),
            _padding: [0.0; 3],
        }
    }

    pub fn highlight(&self) -> HighlightUniform {
        HighlightUniform {
            hovered: tile_coords(self.hovered),
            prev_move: tile_coords(self.prev_move),
        }
    }
}

/// One piece mesh to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceDraw {
    pub kind: PieceKind,
    pub player: Player,
    pub entity: EntityId,
    pub model: Mat4,
}

impl PieceDraw {
    pub fn instance(&self) -> PieceInstance {
        PieceInstance {
            model: self.model.into(),
            player: self.player.shader_flag(),
            entity: self.entity.shader_id(),
        }
    }
}

/// What the current screen wants drawn this frame.
#[derive(Debug, Clone, Copy)]
pub enum SceneDraw<'a> {
    Loading,
    SideSelection {
        pieces: &'a [PieceDraw],
    },
    Game {
        pieces: &'a [PieceDraw],
        highlights: &'a [Highlight],
        /// Draw the dim overlay at `FrameState::opacity`.
        fading: bool,
    },
}

/// Per-instance attributes of `pieces.wgsl`, locations 2 to 7.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PieceInstance {
    pub model: [[f32; 4]; 4],
    pub player: u32,
    pub entity: i32,
}

impl PieceInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Uint32,
        7 => Sint32,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PieceInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Per-instance attributes of `overlay.wgsl`: `i_board` at location 1 and
/// `i_capture` at location 2.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct HighlightInstance {
    pub board: [i32; 2],
    pub capture: u32,
}

impl HighlightInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        1 => Sint32x2,
        2 => Uint32,
    ];

    pub fn new(highlight: &Highlight) -> Self {
        Self {
            board: tile_coords(Some(highlight.square)),
            capture: highlight.capture as u32,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<HighlightInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
