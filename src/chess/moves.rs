//! Move generation over a plain 8x8 mailbox.
//!
//! Legality is decided by playing the move on a copy of the position and
//! asking whether the mover's king is attacked afterwards.

use super::{Piece, PieceKind, Player, Square};

const KNIGHT_HOPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, 2),
    (1, -2),
    (2, 1),
    (2, -1),
];
const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
const LINES: [(i8, i8); 4] = [(0, -1), (0, 1), (1, 0), (-1, 0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// Square of the captured piece. Differs from `to` for en passant.
    pub capture: Option<Square>,
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            capture: None,
            promotion: None,
        }
    }

    pub fn is_capture(&self) -> bool {
        self.capture.is_some()
    }

    /// Long algebraic notation as spoken by UCI engines, e.g. `e7e8q`.
    pub fn to_uci(&self) -> String {
        match self.promotion {
            Some(kind) => format!("{}{}{}", self.from, self.to, kind.letter()),
            None => format!("{}{}", self.from, self.to),
        }
    }

    /// A king stepping two files castles; the rook jumps over it.
    fn castling_rook(&self, piece: &Piece) -> Option<(Square, Square)> {
        if piece.kind != PieceKind::King || (self.from.file as i8 - self.to.file as i8).abs() != 2
        {
            return None;
        }
        let rank = self.from.rank;
        if self.to.file < self.from.file {
            Some((Square::new(0, rank), Square::new(3, rank)))
        } else {
            Some((Square::new(7, rank), Square::new(5, rank)))
        }
    }
}

/// Piece placement without any game history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    squares: [[Option<Piece>; 8]; 8],
}

impl Default for Position {
    fn default() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }
}

impl Position {
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.squares[square.rank as usize][square.file as usize].as_ref()
    }

    pub fn piece_at_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.squares[square.rank as usize][square.file as usize].as_mut()
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    pub fn place(&mut self, piece: Piece) {
        self.squares[piece.square.rank as usize][piece.square.file as usize] = Some(piece);
    }

    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.rank as usize][square.file as usize].take()
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().flatten().flatten()
    }

    pub fn king(&self, player: Player) -> Option<Square> {
        self.pieces()
            .find(|piece| piece.kind == PieceKind::King && piece.player == player)
            .map(|piece| piece.square)
    }

    pub fn in_check(&self, player: Player) -> bool {
        self.king(player)
            .is_some_and(|king| self.is_controlled(king, player.other()))
    }

    fn first_piece_along(&self, from: Square, (dx, dy): (i8, i8)) -> Option<&Piece> {
        let mut current = from.offset(dx, dy);
        while let Some(square) = current {
            if let Some(piece) = self.piece_at(square) {
                return Some(piece);
            }
            current = square.offset(dx, dy);
        }
        None
    }

    /// Whether any piece of `by` attacks `square`.
    pub fn is_controlled(&self, square: Square, by: Player) -> bool {
        let owned = |piece: Option<&Piece>, kinds: &[PieceKind]| {
            piece.is_some_and(|p| p.player == by && kinds.contains(&p.kind))
        };

        let knight = KNIGHT_HOPS
            .iter()
            .any(|&(dx, dy)| owned(square.offset(dx, dy).and_then(|s| self.piece_at(s)), &[PieceKind::Knight]));
        let king = DIAGONALS.iter().chain(LINES.iter()).any(|&(dx, dy)| {
            owned(square.offset(dx, dy).and_then(|s| self.piece_at(s)), &[PieceKind::King])
        });
        let pawn = [-1, 1].iter().any(|&dx| {
            owned(
                square.offset(dx, -by.forward()).and_then(|s| self.piece_at(s)),
                &[PieceKind::Pawn],
            )
        });
        let diagonal = DIAGONALS.iter().any(|&dir| {
            owned(self.first_piece_along(square, dir), &[PieceKind::Bishop, PieceKind::Queen])
        });
        let line = LINES.iter().any(|&dir| {
            owned(self.first_piece_along(square, dir), &[PieceKind::Rook, PieceKind::Queen])
        });

        knight || king || pawn || diagonal || line
    }

    /// Moves the piece on `mv.from`, removing any capture and dragging the rook
    /// along when castling.
    pub fn apply(&mut self, mv: &Move) {
        if let Some(captured) = mv.capture {
            self.take(captured);
        }
        let Some(mut piece) = self.take(mv.from) else {
            return;
        };
        if let Some((rook_from, rook_to)) = mv.castling_rook(&piece) {
            if let Some(mut rook) = self.take(rook_from) {
                rook.prev_square = rook_from;
                rook.square = rook_to;
                rook.moved = true;
                self.place(rook);
            }
        }
        piece.prev_square = mv.from;
        piece.square = mv.to;
        piece.moved = true;
        if let Some(kind) = mv.promotion {
            piece.kind = kind;
        }
        self.place(piece);
    }

    /// Whether `king` may castle with the rook on `corner`. The king must
    /// stand unmoved on its e-file home square, since the rook's landing
    /// square is fixed.
    fn can_castle(&self, king: &Piece, corner: Square) -> bool {
        if king.square != Square::new(4, king.player.home_rank()) {
            return false;
        }
        let rook_ok = self.piece_at(corner).is_some_and(|rook| {
            rook.kind == PieceKind::Rook && rook.player == king.player && !rook.moved
        });
        if king.moved || !rook_ok {
            return false;
        }
        let (low, high) = if corner.file < king.square.file {
            (corner.file + 1, king.square.file)
        } else {
            (king.square.file + 1, corner.file)
        };
        let between_empty = (low..high).all(|file| self.is_empty(Square::new(file, king.square.rank)));
        let step = if corner.file < king.square.file { -1 } else { 1 };
        let passes_safely = king
            .square
            .offset(step, 0)
            .is_some_and(|square| !self.is_controlled(square, king.player.other()));

        between_empty && !self.in_check(king.player) && passes_safely
    }

    /// Moves that follow the piece's movement pattern, ignoring whether the
    /// mover's king ends up attacked.
    pub fn pseudo_moves(&self, piece: &Piece, last_mover: Option<&Piece>) -> Vec<Move> {
        let mut moves = Vec::new();
        let from = piece.square;

        let push_target = |moves: &mut Vec<Move>, to: Square| match self.piece_at(to) {
            None => moves.push(Move::new(from, to)),
            Some(other) if other.player != piece.player => moves.push(Move {
                capture: Some(to),
                ..Move::new(from, to)
            }),
            Some(_) => {}
        };

        match piece.kind {
            PieceKind::Pawn => {
                let forward = piece.player.forward();
                if let Some(one) = from.offset(0, forward).filter(|s| self.is_empty(*s)) {
                    moves.push(Move::new(from, one));
                    let two = one.offset(0, forward);
                    if let Some(two) = two.filter(|s| !piece.moved && self.is_empty(*s)) {
                        moves.push(Move::new(from, two));
                    }
                }
                for dx in [-1, 1] {
                    let Some(target) = from.offset(dx, forward) else {
                        continue;
                    };
                    if self
                        .piece_at(target)
                        .is_some_and(|other| other.player != piece.player)
                    {
                        moves.push(Move {
                            capture: Some(target),
                            ..Move::new(from, target)
                        });
                    }
                    let beside = from.offset(dx, 0).and_then(|s| self.piece_at(s));
                    if let Some(victim) = beside {
                        let double_stepped =
                            (victim.square.rank as i8 - victim.prev_square.rank as i8).abs() == 2;
                        if victim.kind == PieceKind::Pawn
                            && victim.player != piece.player
                            && double_stepped
                            && last_mover.is_some_and(|last| last.id == victim.id)
                            && self.is_empty(target)
                        {
                            moves.push(Move {
                                capture: Some(victim.square),
                                ..Move::new(from, target)
                            });
                        }
                    }
                }
            }
            PieceKind::Knight | PieceKind::King => {
                let steps: &[(i8, i8)] = if piece.kind == PieceKind::Knight {
                    &KNIGHT_HOPS
                } else {
                    &[
                        (-1, -1),
                        (-1, 1),
                        (1, -1),
                        (1, 1),
                        (0, -1),
                        (0, 1),
                        (1, 0),
                        (-1, 0),
                    ]
                };
                for &(dx, dy) in steps {
                    if let Some(to) = from.offset(dx, dy) {
                        push_target(&mut moves, to);
                    }
                }
                if piece.kind == PieceKind::King {
                    for (corner_file, step) in [(0u8, -2i8), (7, 2)] {
                        let corner = Square::new(corner_file, from.rank);
                        let target = from.offset(step, 0);
                        if let Some(to) = target.filter(|_| self.can_castle(piece, corner)) {
                            moves.push(Move::new(from, to));
                        }
                    }
                }
            }
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                let directions: Vec<(i8, i8)> = match piece.kind {
                    PieceKind::Bishop => DIAGONALS.to_vec(),
                    PieceKind::Rook => LINES.to_vec(),
                    _ => DIAGONALS.iter().chain(LINES.iter()).copied().collect(),
                };
                for (dx, dy) in directions {
                    let mut current = from.offset(dx, dy);
                    while let Some(to) = current {
                        push_target(&mut moves, to);
                        if !self.is_empty(to) {
                            break;
                        }
                        current = to.offset(dx, dy);
                    }
                }
            }
        }

        moves
    }

    /// Pseudo moves that do not leave the mover's own king attacked.
    pub fn legal_moves(&self, piece: &Piece, last_mover: Option<&Piece>) -> Vec<Move> {
        self.pseudo_moves(piece, last_mover)
            .into_iter()
            .filter(|mv| {
                let mut after = *self;
                after.apply(mv);
                !after.in_check(piece.player)
            })
            .collect()
    }
}
