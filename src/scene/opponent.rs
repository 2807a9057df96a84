//! The side of the board the local user is not playing.
//!
//! An opponent is polled once per game frame through
//! [`Opponent::handle_turn`]. Engine searches run on a worker thread and are
//! collected with `try_recv`, so a slow engine never blocks rendering.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use rand::seq::SliceRandom;
use tracing::{debug, error, warn};

use crate::chess::{Board, Move, PieceKind, Player, Square};
use crate::engine::{EngineSettings, UciEngine, UciMove};
use crate::error::EngineError;
use crate::scene::picking::Pick;

pub trait Opponent {
    fn player(&self) -> Player;

    /// Square of a piece the opponent has picked up, if it shows one.
    fn selected(&self) -> Option<Square> {
        None
    }

    /// Called every frame while the game is running. Plays a move on the
    /// board once the opponent has one ready on its turn.
    fn handle_turn(&mut self, board: &mut Board);

    /// A click made while it is the opponent's turn.
    fn handle_click(&mut self, _board: &Board, _pick: &Pick) {}
}

/// Plays whatever the UCI engine suggests.
///
/// Any engine failure, including a binary that cannot be started, is logged
/// once and the opponent plays random legal moves from then on.
pub struct EngineOpponent {
    player: Player,
    requests: Sender<Vec<String>>,
    replies: Receiver<Result<UciMove, EngineError>>,
    thinking: bool,
    failed: bool,
}

impl EngineOpponent {
    /// Returns at once. Starting the process, configuring it and every
    /// search happen on the worker thread, which reports failures as replies.
    pub fn spawn(settings: EngineSettings, player: Player) -> Self {
        let (requests, request_rx) = mpsc::channel::<Vec<String>>();
        let (reply_tx, replies) = mpsc::channel();

        thread::spawn(move || {
            let started = UciEngine::spawn(&settings.command).and_then(|mut engine| {
                engine.configure(&settings)?;
                Ok(engine)
            });
            let mut engine = match started {
                Ok(engine) => engine,
                Err(err) => {
                    let _ = reply_tx.send(Err(err));
                    return;
                }
            };
            debug!(command = %settings.command, "engine ready");

            for moves in request_rx {
                let reply = engine.best_move(&moves, settings.depth);
                if reply_tx.send(reply).is_err() {
                    break;
                }
            }
            debug!("engine worker finished");
        });

        Self {
            player,
            requests,
            replies,
            thinking: false,
            failed: false,
        }
    }

    fn give_up(&mut self, err: &dyn std::fmt::Display) {
        error!(%err, "engine unavailable, falling back to random moves");
        self.thinking = false;
        self.failed = true;
    }

    /// Collects a finished search or a worker failure, otherwise asks for the
    /// next move if no search is running.
    fn poll_engine(&mut self, board: &mut Board) {
        match self.replies.try_recv() {
            Ok(Ok(mv)) => {
                self.thinking = false;
                debug!(%mv, "engine move");
                if let Err(err) = board.make_move(mv.from, mv.to, mv.promotion) {
                    self.give_up(&err);
                }
            }
            Ok(Err(err)) => self.give_up(&err),
            Err(TryRecvError::Empty) if self.thinking => {}
            Err(TryRecvError::Empty) => {
                let moves = board.history().iter().map(Move::to_uci).collect();
                match self.requests.send(moves) {
                    Ok(()) => self.thinking = true,
                    Err(_) => self.give_up(&EngineError::Exited),
                }
            }
            Err(TryRecvError::Disconnected) => self.give_up(&EngineError::Exited),
        }
    }
}

impl Opponent for EngineOpponent {
    fn player(&self) -> Player {
        self.player
    }

    fn handle_turn(&mut self, board: &mut Board) {
        if !board.is_turn(self.player) || board.outcome().is_some() {
            return;
        }
        if !self.failed {
            self.poll_engine(board);
        }
        if self.failed && board.is_turn(self.player) {
            play_random_move(board, self.player);
        }
    }
}

/// Lets the local user move the opponent's pieces as well.
#[derive(Debug, Clone)]
pub struct DebugOpponent {
    player: Player,
    selected: Option<Square>,
    pending: Option<(Square, Square)>,
}

impl DebugOpponent {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            selected: None,
            pending: None,
        }
    }
}

impl Opponent for DebugOpponent {
    fn player(&self) -> Player {
        self.player
    }

    fn selected(&self) -> Option<Square> {
        self.selected
    }

    fn handle_turn(&mut self, board: &mut Board) {
        if !board.is_turn(self.player()) {
            return;
        }
        let Some((from, to)) = self.pending.take() else {
            return;
        };
        let promotion = board.is_promotion(from, to).then_some(PieceKind::Queen);
        if let Err(err) = board.make_move(from, to, promotion) {
            warn!(%err, "debug move rejected");
        }
    }

    fn handle_click(&mut self, board: &Board, pick: &Pick) {
        match self.selected.take() {
            None => {
                let own = pick
                    .entity
                    .and_then(|id| board.piece(id))
                    .filter(|piece| piece.player == self.player());
                self.selected = own.map(|piece| piece.square);
            }
            Some(from) => {
                let legal = |to: &Square| {
                    board
                        .legal_moves_from(from)
                        .iter()
                        .any(|mv| mv.to == *to)
                };
                self.pending = pick.square.filter(legal).map(|to| (from, to));
            }
        }
    }
}

/// Plays a uniformly random legal move for `player`, auto-queening.
pub fn play_random_move(board: &mut Board, player: Player) -> Option<Move> {
    let moves = board.legal_moves(player);
    let mv = *moves.choose(&mut rand::thread_rng())?;
    let promotion = board.is_promotion(mv.from, mv.to).then_some(PieceKind::Queen);
    match board.make_move(mv.from, mv.to, promotion) {
        Ok(played) => Some(played),
        Err(err) => {
            warn!(%err, "random move rejected");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use crate::engine::uci::READY_TIMEOUT;

    fn pick_piece(board: &Board, square: &str) -> Pick {
        let square = Square::parse(square).unwrap();
        Pick {
            entity: board.piece_at(square).map(|piece| piece.id),
            square: Some(square),
        }
    }

    fn pick_square(square: &str) -> Pick {
        Pick {
            entity: None,
            square: Square::parse(square),
        }
    }

    #[test]
    fn test_debug_opponent_moves_by_clicks() {
        let mut board = Board::new();
        board.make_move(Square::parse("e2").unwrap(), Square::parse("e4").unwrap(), None).unwrap();

        let mut opponent = DebugOpponent::new(Player::Black);
        opponent.handle_click(&board, &pick_piece(&board, "e7"));
        assert_eq!(opponent.selected(), Square::parse("e7"));

        opponent.handle_click(&board, &pick_square("e5"));
        assert_eq!(opponent.selected(), None);

        opponent.handle_turn(&mut board);
        assert_eq!(board.turn(), Player::White);
        assert!(board.piece_at(Square::parse("e5").unwrap()).is_some());
    }

    #[test]
    fn test_debug_opponent_ignores_other_side() {
        let board = Board::new();
        let mut opponent = DebugOpponent::new(Player::Black);
        opponent.handle_click(&board, &pick_piece(&board, "e2"));
        assert_eq!(opponent.selected(), None);
    }

    #[test]
    fn test_debug_opponent_drops_illegal_target() {
        let mut board = Board::new();
        board.make_move(Square::parse("d2").unwrap(), Square::parse("d4").unwrap(), None).unwrap();
        let mut opponent = DebugOpponent::new(Player::Black);
        opponent.handle_click(&board, &pick_piece(&board, "e7"));
        opponent.handle_click(&board, &pick_square("e3"));
        opponent.handle_turn(&mut board);
        assert_eq!(board.turn(), Player::Black);
    }

    #[test]
    fn test_debug_opponent_promotes_to_queen() {
        let mut board = Board::from_pieces(
            &[
                (PieceKind::King, Player::White, Square::parse("a1").unwrap()),
                (PieceKind::King, Player::Black, Square::parse("h8").unwrap()),
                (PieceKind::Pawn, Player::Black, Square::parse("c2").unwrap()),
            ],
            Player::Black,
        );
        let mut opponent = DebugOpponent::new(Player::Black);
        opponent.handle_click(&board, &pick_piece(&board, "c2"));
        opponent.handle_click(&board, &pick_square("c1"));
        opponent.handle_turn(&mut board);
        let promoted = board.piece_at(Square::parse("c1").unwrap()).unwrap();
        assert_eq!(promoted.kind, PieceKind::Queen);
    }

    #[test]
    fn test_random_move_is_legal() {
        let mut board = Board::new();
        let played = play_random_move(&mut board, Player::White).unwrap();
        assert_eq!(board.previous_move(), Some(&played));
        assert_eq!(board.turn(), Player::Black);
    }

    #[test]
    fn test_missing_engine_falls_back_without_blocking() {
        let settings = EngineSettings {
            command: "definitely-not-a-chess-engine-binary".to_string(),
            elo: 1350,
            threads: 1,
            depth: 1,
        };
        let started = Instant::now();
        let mut opponent = EngineOpponent::spawn(settings, Player::White);
        assert!(started.elapsed() < READY_TIMEOUT);

        let mut board = Board::new();
        for _ in 0..200 {
            opponent.handle_turn(&mut board);
            if board.turn() == Player::Black {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(board.turn(), Player::Black);
        assert_eq!(board.history().len(), 1);
    }
}
