use std::collections::HashMap;

use tracing::{debug, info};

use super::moves::{Move, Position};
use super::{EntityId, Piece, PieceKind, Player, Square};
use crate::error::MoveError;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Player),
    Draw,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// A game in progress: placement plus everything needed to judge the next move.
#[derive(Debug, Clone)]
pub struct Board {
    position: Position,
    turn: Player,
    previous_move: Option<Move>,
    history: Vec<Move>,
    repetitions: HashMap<String, u32>,
    outcome: Option<Outcome>,
    next_id: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard starting position, white to move.
    pub fn new() -> Self {
        let mut pieces = Vec::with_capacity(32);
        for player in [Player::White, Player::Black] {
            let home = player.home_rank();
            let pawns = (home as i8 + player.forward()) as u8;
            for (file, kind) in BACK_RANK.iter().enumerate() {
                pieces.push((*kind, player, Square::new(file as u8, home)));
                pieces.push((PieceKind::Pawn, player, Square::new(file as u8, pawns)));
            }
        }
        Self::from_pieces(&pieces, Player::White)
    }

    /// Builds an arbitrary position. Pieces are treated as never having moved.
    pub fn from_pieces(pieces: &[(PieceKind, Player, Square)], turn: Player) -> Self {
        let mut board = Self {
            position: Position::default(),
            turn,
            previous_move: None,
            history: Vec::new(),
            repetitions: HashMap::new(),
            outcome: None,
            next_id: 0,
        };
        for &(kind, player, square) in pieces {
            let id = board.allocate_id();
            board.position.place(Piece::new(id, kind, player, square));
        }
        let key = board.position_key();
        board.repetitions.insert(key, 1);
        board
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn is_turn(&self, player: Player) -> bool {
        self.turn == player
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn previous_move(&self) -> Option<&Move> {
        self.previous_move.as_ref()
    }

    /// Every move played so far, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.position.piece_at(square)
    }

    pub fn piece(&self, id: EntityId) -> Option<&Piece> {
        self.pieces().find(|piece| piece.id == id)
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.position.pieces()
    }

    pub fn in_check(&self, player: Player) -> bool {
        self.position.in_check(player)
    }

    pub fn last_piece_to_move(&self) -> Option<&Piece> {
        self.previous_move
            .and_then(|mv| self.position.piece_at(mv.to))
    }

    /// Legal moves of whatever piece stands on `square`.
    pub fn legal_moves_from(&self, square: Square) -> Vec<Move> {
        match self.position.piece_at(square) {
            Some(piece) => self
                .position
                .legal_moves(piece, self.last_piece_to_move()),
            None => Vec::new(),
        }
    }

    pub fn legal_moves(&self, player: Player) -> Vec<Move> {
        self.pieces()
            .filter(|piece| piece.player == player)
            .flat_map(|piece| self.position.legal_moves(piece, self.last_piece_to_move()))
            .collect()
    }

    /// Whether moving from `from` to `to` would put a pawn on its last rank.
    pub fn is_promotion(&self, from: Square, to: Square) -> bool {
        self.position.piece_at(from).is_some_and(|piece| {
            piece.kind == PieceKind::Pawn && to.rank == piece.player.other().home_rank()
        })
    }

    /// Plays a move for the side to move and updates the game outcome.
    ///
    /// `promotion` is required when a pawn reaches the last rank and ignored
    /// otherwise.
    pub fn make_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<Move, MoveError> {
        if self.outcome.is_some() {
            return Err(MoveError::GameOver);
        }
        let piece = *self
            .position
            .piece_at(from)
            .ok_or(MoveError::EmptySquare(from))?;
        if piece.player != self.turn {
            return Err(MoveError::WrongTurn);
        }

        let mut mv = self
            .legal_moves_from(from)
            .into_iter()
            .find(|mv| mv.to == to)
            .ok_or(MoveError::Illegal { from, to })?;

        if self.is_promotion(from, to) {
            let kind = promotion.ok_or(MoveError::MissingPromotion(to))?;
            if !PieceKind::PROMOTIONS.contains(&kind) {
                return Err(MoveError::Illegal { from, to });
            }
            mv.promotion = Some(kind);
        }

        self.position.apply(&mv);
        if mv.promotion.is_some() {
            let id = self.allocate_id();
            if let Some(promoted) = self.position.piece_at_mut(to) {
                promoted.id = id;
            }
        }

        debug!(mv = %mv.to_uci(), player = ?self.turn, "move played");
        self.turn = self.turn.other();
        self.previous_move = Some(mv);
        self.history.push(mv);
        self.update_outcome();
        Ok(mv)
    }

    /// Position text used to count repetitions: placement plus side to move.
    fn position_key(&self) -> String {
        let mut key = String::with_capacity(65);
        for rank in 0..8 {
            for file in 0..8 {
                let letter = match self.position.piece_at(Square::new(file, rank)) {
                    Some(piece) if piece.player == Player::White => {
                        piece.kind.letter().to_ascii_uppercase()
                    }
                    Some(piece) => piece.kind.letter(),
                    None => '.',
                };
                key.push(letter);
            }
        }
        key.push(if self.turn == Player::White { 'w' } else { 'b' });
        key
    }

    fn update_outcome(&mut self) {
        let count = self.repetitions.entry(self.position_key()).or_insert(0);
        *count += 1;
        let outcome = if *count >= 3 {
            Some(Outcome::Draw)
        } else if self.legal_moves(self.turn).is_empty() {
            if self.in_check(self.turn) {
                Some(Outcome::Winner(self.turn.other()))
            } else {
                Some(Outcome::Draw)
            }
        } else if self.insufficient_material() {
            Some(Outcome::Draw)
        } else {
            None
        };

        if let Some(outcome) = outcome {
            info!(?outcome, "game over");
            self.outcome = Some(outcome);
        }
    }

    /// No pawns or major pieces and at most one minor piece per side.
    fn insufficient_material(&self) -> bool {
        let mut minors = Vec::new();
        for piece in self.pieces() {
            match piece.kind {
                PieceKind::King => {}
                kind if kind.is_minor() => minors.push(piece.player),
                _ => return false,
            }
        }
        match minors.as_slice() {
            [] | [_] => true,
            [a, b] => a != b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::parse(name).expect("test square")
    }

    fn play(board: &mut Board, moves: &[&str]) {
        for text in moves {
            let from = sq(&text[0..2]);
            let to = sq(&text[2..4]);
            let promotion = text.chars().nth(4).and_then(PieceKind::from_letter);
            board
                .make_move(from, to, promotion)
                .unwrap_or_else(|err| panic!("{text}: {err}"));
        }
    }

    #[test]
    fn test_starting_position() {
        let board = Board::new();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.turn(), Player::White);
        assert_eq!(board.legal_moves(Player::White).len(), 20);
        assert_eq!(
            board.piece_at(sq("e1")).map(|p| p.kind),
            Some(PieceKind::King)
        );
        assert_eq!(
            board.piece_at(sq("d8")).map(|p| (p.kind, p.player)),
            Some((PieceKind::Queen, Player::Black))
        );
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let board = Board::new();
        let mut ids: Vec<_> = board.pieces().map(|p| p.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 32);
    }

    #[test]
    fn test_wrong_turn_and_illegal_moves_are_rejected() {
        let mut board = Board::new();
        assert_eq!(
            board.make_move(sq("e7"), sq("e5"), None),
            Err(MoveError::WrongTurn)
        );
        assert_eq!(
            board.make_move(sq("e2"), sq("e5"), None),
            Err(MoveError::Illegal {
                from: sq("e2"),
                to: sq("e5")
            })
        );
        assert_eq!(
            board.make_move(sq("e4"), sq("e5"), None),
            Err(MoveError::EmptySquare(sq("e4")))
        );
    }

    #[test]
    fn test_fools_mate() {
        let mut board = Board::new();
        play(&mut board, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(board.in_check(Player::White));
        assert_eq!(board.outcome(), Some(Outcome::Winner(Player::Black)));
        assert_eq!(
            board.make_move(sq("a2"), sq("a3"), None),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn test_stalemate_is_a_draw() {
        let mut board = Board::from_pieces(
            &[
                (PieceKind::King, Player::Black, sq("a8")),
                (PieceKind::King, Player::White, sq("c7")),
                (PieceKind::Queen, Player::White, sq("c1")),
            ],
            Player::White,
        );
        play(&mut board, &["c1b6"]);
        assert!(!board.in_check(Player::Black));
        assert_eq!(board.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn test_en_passant_only_right_after_double_step() {
        let mut board = Board::new();
        play(&mut board, &["e2e4", "a7a6", "e4e5", "d7d5"]);
        let moves = board.legal_moves_from(sq("e5"));
        let ep = moves
            .iter()
            .find(|mv| mv.to == sq("d6"))
            .expect("en passant available");
        assert_eq!(ep.capture, Some(sq("d5")));

        play(&mut board, &["e5d6"]);
        assert!(board.piece_at(sq("d5")).is_none());
        assert_eq!(board.pieces().count(), 31);

        let mut late = Board::new();
        play(&mut late, &["e2e4", "d7d5", "e4e5", "a7a6", "h2h3", "a6a5"]);
        assert!(!late.legal_moves_from(sq("e5")).iter().any(|mv| mv.to == sq("d6")));
    }

    #[test]
    fn test_castling_moves_the_rook() {
        let mut board = Board::new();
        play(&mut board, &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6"]);
        assert!(board.legal_moves_from(sq("e1")).iter().any(|mv| mv.to == sq("g1")));
        play(&mut board, &["e1g1"]);
        assert_eq!(board.piece_at(sq("f1")).map(|p| p.kind), Some(PieceKind::Rook));
        assert!(board.piece_at(sq("h1")).is_none());
    }

    #[test]
    fn test_castling_blocked_through_attacked_square() {
        let board = Board::from_pieces(
            &[
                (PieceKind::King, Player::White, sq("e1")),
                (PieceKind::Rook, Player::White, sq("h1")),
                (PieceKind::King, Player::Black, sq("e8")),
                (PieceKind::Rook, Player::Black, sq("f8")),
            ],
            Player::White,
        );
        assert!(!board.legal_moves_from(sq("e1")).iter().any(|mv| mv.to == sq("g1")));
    }

    #[test]
    fn test_no_castling_away_from_the_home_square() {
        let mut board = Board::from_pieces(
            &[
                (PieceKind::King, Player::White, sq("d1")),
                (PieceKind::Rook, Player::White, sq("h1")),
                (PieceKind::King, Player::Black, sq("e8")),
            ],
            Player::White,
        );
        let targets: Vec<Square> = board
            .legal_moves_from(sq("d1"))
            .iter()
            .map(|mv| mv.to)
            .collect();
        assert!(!targets.contains(&sq("f1")));
        assert!(!targets.contains(&sq("b1")));

        assert!(board.make_move(sq("d1"), sq("f1"), None).is_err());
        assert_eq!(board.pieces().count(), 3);
        assert_eq!(board.piece_at(sq("h1")).map(|p| p.kind), Some(PieceKind::Rook));
    }

    #[test]
    fn test_castling_blocked_by_piece_between() {
        let board = Board::from_pieces(
            &[
                (PieceKind::King, Player::White, sq("e1")),
                (PieceKind::Rook, Player::White, sq("a1")),
                (PieceKind::Knight, Player::White, sq("b1")),
                (PieceKind::King, Player::Black, sq("e8")),
            ],
            Player::White,
        );
        assert!(!board.legal_moves_from(sq("e1")).iter().any(|mv| mv.to == sq("c1")));
    }

    #[test]
    fn test_promotion_requires_a_choice_and_assigns_new_id() {
        let mut board = Board::from_pieces(
            &[
                (PieceKind::King, Player::White, sq("a1")),
                (PieceKind::Pawn, Player::White, sq("b7")),
                (PieceKind::King, Player::Black, sq("h8")),
                (PieceKind::Rook, Player::Black, sq("h2")),
            ],
            Player::White,
        );
        assert!(board.is_promotion(sq("b7"), sq("b8")));
        assert_eq!(
            board.make_move(sq("b7"), sq("b8"), None),
            Err(MoveError::MissingPromotion(sq("b8")))
        );

        let pawn_id = board.piece_at(sq("b7")).map(|p| p.id);
        let mv = board
            .make_move(sq("b7"), sq("b8"), Some(PieceKind::Knight))
            .expect("promotion is legal");
        assert_eq!(mv.to_uci(), "b7b8n");
        let promoted = board.piece_at(sq("b8")).expect("promoted piece");
        assert_eq!(promoted.kind, PieceKind::Knight);
        assert_ne!(Some(promoted.id), pawn_id);
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        let board = Board::from_pieces(
            &[
                (PieceKind::King, Player::White, sq("e1")),
                (PieceKind::Bishop, Player::White, sq("e2")),
                (PieceKind::Rook, Player::Black, sq("e8")),
                (PieceKind::King, Player::Black, sq("a8")),
            ],
            Player::White,
        );
        assert!(board.legal_moves_from(sq("e2")).is_empty());
    }

    #[test]
    fn test_threefold_repetition() {
        let mut board = Board::new();
        play(
            &mut board,
            &["g1f3", "g8f6", "f3g1", "f6g8", "g1f3", "g8f6", "f3g1"],
        );
        assert_eq!(board.outcome(), None);
        play(&mut board, &["f6g8"]);
        assert_eq!(board.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn test_insufficient_material() {
        let mut same_side = Board::from_pieces(
            &[
                (PieceKind::King, Player::White, sq("e1")),
                (PieceKind::Bishop, Player::White, sq("c1")),
                (PieceKind::Knight, Player::White, sq("b1")),
                (PieceKind::King, Player::Black, sq("e8")),
            ],
            Player::White,
        );
        play(&mut same_side, &["e1e2"]);
        assert_eq!(same_side.outcome(), None);

        let mut one_each = Board::from_pieces(
            &[
                (PieceKind::King, Player::White, sq("e1")),
                (PieceKind::Bishop, Player::White, sq("c1")),
                (PieceKind::Knight, Player::Black, sq("b8")),
                (PieceKind::King, Player::Black, sq("e8")),
            ],
            Player::White,
        );
        play(&mut one_each, &["e1e2"]);
        assert_eq!(one_each.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn test_history_and_previous_move() {
        let mut board = Board::new();
        play(&mut board, &["e2e4", "c7c5"]);
        let history: Vec<_> = board.history().iter().map(Move::to_uci).collect();
        assert_eq!(history, ["e2e4", "c7c5"]);
        assert_eq!(board.previous_move().map(|mv| mv.to), Some(sq("c5")));
        assert_eq!(
            board.last_piece_to_move().map(|p| p.prev_square),
            Some(sq("c7"))
        );
    }
}
