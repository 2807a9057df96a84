//! Chess model: squares, pieces, moves and the rules that connect them.
//!
//! The model knows nothing about rendering. Scenes read it to build instance
//! buffers and write to it only through [`Board::make_move`].

pub mod board;
pub mod moves;

use std::fmt;

pub use board::{Board, Outcome};
pub use moves::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub fn other(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Rank direction pawns of this player advance in.
    pub fn forward(self) -> i8 {
        match self {
            Player::Black => -1,
            Player::White => 1,
        }
    }

    /// Rank a piece of this player starts on; pawns start one rank further in.
    pub fn home_rank(self) -> u8 {
        match self {
            Player::Black => 7,
            Player::White => 0,
        }
    }

    /// Value of the per-instance `player` attribute.
    pub fn shader_flag(self) -> u32 {
        match self {
            Player::Black => 0,
            Player::White => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Choices offered when a pawn reaches the last rank, in display order.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
    ];

    /// Lowercase letter used in long algebraic notation.
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_letter(letter: char) -> Option<PieceKind> {
        PieceKind::ALL
            .into_iter()
            .find(|kind| kind.letter() == letter.to_ascii_lowercase())
    }

    /// Base name of the mesh file for this kind, e.g. `knight` for `knight.obj`.
    pub fn name(self) -> &'static str {
        match self {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        }
    }

    pub fn is_minor(self) -> bool {
        matches!(self, PieceKind::Knight | PieceKind::Bishop)
    }
}

/// A board square. `file` and `rank` are both in `0..=7`, `a1` is `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub file: u8,
    pub rank: u8,
}

impl Square {
    /// Builds a square from coordinates that may fall off the board.
    pub fn try_new(file: i32, rank: i32) -> Option<Square> {
        ((0..8).contains(&file) && (0..8).contains(&rank)).then(|| Square {
            file: file as u8,
            rank: rank as u8,
        })
    }

    /// # Panics
    /// If either coordinate is outside `0..=7`.
    pub const fn new(file: u8, rank: u8) -> Square {
        assert!(file < 8 && rank < 8, "square out of range");
        Square { file, rank }
    }

    pub fn offset(self, files: i8, ranks: i8) -> Option<Square> {
        Square::try_new(
            self.file as i32 + files as i32,
            self.rank as i32 + ranks as i32,
        )
    }

    /// World-space centre of the square on the board surface.
    pub fn world_center(self) -> [f32; 3] {
        [self.file as f32 + 1.0, self.rank as f32 + 1.0, 0.0]
    }

    /// Parses algebraic coordinates such as `e4`.
    pub fn parse(text: &str) -> Option<Square> {
        let mut chars = text.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() || !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }
        Some(Square::new(file as u8 - b'a', rank as u8 - b'1'))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

/// Stable identity of a piece, shared with the GPU as the `entity` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl EntityId {
    pub fn shader_id(self) -> i32 {
        self.0 as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub id: EntityId,
    pub kind: PieceKind,
    pub player: Player,
    pub square: Square,
    /// Square the piece stood on before its most recent move.
    pub prev_square: Square,
    pub moved: bool,
}

impl Piece {
    pub fn new(id: EntityId, kind: PieceKind, player: Player, square: Square) -> Self {
        Self {
            id,
            kind,
            player,
            square,
            prev_square: square,
            moved: false,
        }
    }
}
