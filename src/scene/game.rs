//! A running game between the local user and an [`Opponent`].

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::chess::{Board, EntityId, Outcome, PieceKind, Player, Square};
use crate::math::Ray;
use crate::renderer::frame::{FrameState, PieceDraw, SceneDraw};
use crate::scene::camera::PerspectiveCamera;
use crate::scene::opponent::Opponent;
use crate::scene::picking::{Pick, PieceBounds, hovered_square};
use crate::scene::{piece_transform, resting_theta};
use crate::shading::highlight::Highlight;

/// Opacity added to the dim overlay each frame once the game has ended.
pub const FADE_STEP: f32 = 0.01;
/// Promotion props sit above the rim so they never collide with board ids.
const PROP_ID_BASE: u32 = 1 << 16;
/// How far promotion props float above the board.
const PROP_LIFT: f32 = 0.25;

/// A promotion waiting for the user to click one of the offered pieces.
#[derive(Debug, Clone)]
struct PendingPromotion {
    from: Square,
    to: Square,
    props: Vec<(PieceKind, PieceDraw)>,
}

impl PendingPromotion {
    /// Queen above the target file, knight and rook to its left, bishop to
    /// its right, one rank beyond the promotion rank.
    fn new(from: Square, to: Square, player: Player) -> Self {
        let [x, _, _] = to.world_center();
        let y = if to.rank == 7 { 9.0 } else { 0.0 };
        let props = PieceKind::PROMOTIONS
            .into_iter()
            .zip(0u32..)
            .map(|(kind, index)| {
                let offset = match kind {
                    PieceKind::Knight => -1.0,
                    PieceKind::Bishop => 1.0,
                    PieceKind::Rook => -2.0,
                    _ => 0.0,
                };
                let draw = PieceDraw {
                    kind,
                    player,
                    entity: EntityId(PROP_ID_BASE + index),
                    model: piece_transform(
                        [x + offset, y, PROP_LIFT],
                        resting_theta(kind, player) + 180.0,
                    ),
                };
                (kind, draw)
            })
            .collect();
        Self { from, to, props }
    }

    fn choice(&self, entity: EntityId) -> Option<PieceKind> {
        self.props
            .iter()
            .find(|(_, draw)| draw.entity == entity)
            .map(|(kind, _)| *kind)
    }
}

pub struct GameScene {
    player: Player,
    board: Board,
    opponent: Box<dyn Opponent>,
    camera: PerspectiveCamera,
    bounds: PieceBounds,
    selected: Option<EntityId>,
    hovered: Option<Square>,
    promotion: Option<PendingPromotion>,
    opacity: f32,
    game_over: bool,
    started: Instant,
    pieces: Vec<PieceDraw>,
    highlights: Vec<Highlight>,
}

impl GameScene {
    pub fn new(player: Player, opponent: Box<dyn Opponent>, bounds: PieceBounds) -> Self {
        Self::with_board(player, Board::new(), opponent, bounds)
    }

    pub fn with_board(
        player: Player,
        board: Board,
        opponent: Box<dyn Opponent>,
        bounds: PieceBounds,
    ) -> Self {
        info!(?player, opponent = ?opponent.player(), "game started");
        let mut scene = Self {
            player,
            board,
            opponent,
            camera: Self::camera_for(player),
            bounds,
            selected: None,
            hovered: None,
            promotion: None,
            opacity: 0.0,
            game_over: false,
            started: Instant::now(),
            pieces: Vec::new(),
            highlights: Vec::new(),
        };
        scene.rebuild_draws();
        scene
    }

    /// White looks up the board from rank 1, black down from rank 8.
    pub fn camera_for(player: Player) -> PerspectiveCamera {
        match player {
            Player::White => PerspectiveCamera::new([4.5, -3.0, 8.5], [0.0, 7.0, -8.5], 45.0),
            Player::Black => PerspectiveCamera::new([4.5, 12.0, 8.5], [0.0, -7.0, -8.5], 45.0),
        }
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    pub fn promotion_pending(&self) -> bool {
        self.promotion.is_some()
    }

    /// True once the end-of-game fade has fully covered the board.
    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// Handles a left click along `ray`.
    pub fn click(&mut self, ray: &Ray) {
        if self.board.outcome().is_some() {
            return;
        }
        let pick = Pick::cast(ray, &self.pieces, &self.bounds);

        if !self.board.is_turn(self.player) {
            self.opponent.handle_click(&self.board, &pick);
        } else if self.promotion.is_some() {
            self.choose_promotion(pick.entity);
        } else if self.selected.is_none() {
            self.select_piece(pick.entity);
        } else {
            if let Some(square) = pick.square {
                self.request_move(square);
            }
            self.selected = None;
        }
        self.rebuild_draws();
    }

    /// Drops the current selection without moving.
    pub fn cancel_selection(&mut self) {
        self.selected = None;
        self.rebuild_draws();
    }

    /// Advances one frame: fades out a finished game, otherwise lets the
    /// opponent act and tracks the hovered square.
    pub fn update(&mut self, cursor_ray: Option<Ray>) {
        if self.board.outcome().is_some() {
            self.fade_out();
        } else {
            self.opponent.handle_turn(&mut self.board);
            self.hovered = cursor_ray.as_ref().and_then(hovered_square);
        }
        self.rebuild_draws();
    }

    pub fn frame(&self, aspect: f32) -> FrameState {
        FrameState {
            proj: self.camera.proj(aspect),
            view: self.camera.view(),
            time: self.started.elapsed().as_secs_f32(),
            selected: self.selected.or_else(|| {
                let square = self.opponent.selected()?;
                self.board.piece_at(square).map(|piece| piece.id)
            }),
            hovered: self.hovered,
            prev_move: self.board.previous_move().map(|mv| mv.to),
            opacity: self.opacity,
        }
    }

    pub fn draw(&self) -> SceneDraw<'_> {
        SceneDraw::Game {
            pieces: &self.pieces,
            highlights: &self.highlights,
            fading: self.board.outcome().is_some(),
        }
    }

    fn fade_out(&mut self) {
        if self.opacity == 0.0 {
            match self.board.outcome() {
                Some(Outcome::Winner(winner)) => info!(?winner, "game over"),
                _ => info!("game drawn"),
            }
        }
        self.opacity += FADE_STEP;
        if self.opacity >= 1.0 {
            self.game_over = true;
        }
    }

    fn select_piece(&mut self, entity: Option<EntityId>) {
        self.selected = entity
            .and_then(|id| self.board.piece(id))
            .filter(|piece| piece.player == self.player)
            .map(|piece| piece.id);
    }

    fn choose_promotion(&mut self, entity: Option<EntityId>) {
        self.selected = None;
        let Some(pending) = self.promotion.as_ref() else {
            return;
        };
        let Some(kind) = entity.and_then(|id| pending.choice(id)) else {
            return;
        };
        let (from, to) = (pending.from, pending.to);
        self.promotion = None;
        if let Err(err) = self.board.make_move(from, to, Some(kind)) {
            warn!(%err, "promotion rejected");
        }
    }

    fn request_move(&mut self, to: Square) {
        let Some(piece) = self.selected.and_then(|id| self.board.piece(id)).copied() else {
            return;
        };
        let from = piece.square;
        if !self.board.legal_moves_from(from).iter().any(|mv| mv.to == to) {
            debug!(%from, %to, "not a legal destination");
            return;
        }
        if self.board.is_promotion(from, to) {
            self.promotion = Some(PendingPromotion::new(from, to, piece.player));
            return;
        }
        if let Err(err) = self.board.make_move(from, to, None) {
            warn!(%err, "move rejected");
        }
    }

    /// Rebuilds the piece instances and the highlight list from the board.
    fn rebuild_draws(&mut self) {
        if self.selected.is_some_and(|id| self.board.piece(id).is_none()) {
            self.selected = None;
        }

        self.pieces.clear();
        self.pieces.extend(self.board.pieces().map(|piece| PieceDraw {
            kind: piece.kind,
            player: piece.player,
            entity: piece.id,
            model: piece_transform(
                piece.square.world_center(),
                resting_theta(piece.kind, piece.player),
            ),
        }));
        if let Some(pending) = &self.promotion {
            self.pieces.extend(pending.props.iter().map(|(_, draw)| *draw));
        }

        self.highlights.clear();
        let origin = self
            .selected
            .and_then(|id| self.board.piece(id))
            .map(|piece| piece.square)
            .or_else(|| self.opponent.selected());
        if let Some(origin) = origin {
            self.highlights
                .extend(self.board.legal_moves_from(origin).iter().map(|mv| Highlight {
                    square: mv.to,
                    capture: mv.is_capture(),
                }));
        }
        if let Some(previous) = self.board.previous_move() {
            self.highlights.push(Highlight {
                square: previous.to,
                capture: false,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::scene::opponent::DebugOpponent;

    fn scene() -> GameScene {
        GameScene::new(
            Player::White,
            Box::new(DebugOpponent::new(Player::Black)),
            PieceBounds::default(),
        )
    }

    fn sq(text: &str) -> Square {
        Square::parse(text).unwrap()
    }

    /// Straight down onto the centre of `square`.
    fn ray_at(square: &str) -> Ray {
        let [x, y, _] = sq(square).world_center();
        Ray::new(Vec3::new(x, y, 5.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_select_then_move() {
        let mut scene = scene();
        scene.click(&ray_at("e2"));
        let selected = scene.selected().expect("pawn selected");
        assert_eq!(scene.board().piece(selected).unwrap().square, sq("e2"));
        // two pushes, no previous move yet
        assert_eq!(scene.highlights.len(), 2);

        scene.click(&ray_at("e4"));
        assert_eq!(scene.selected(), None);
        assert!(scene.board().piece_at(sq("e4")).is_some());
        assert_eq!(scene.board().turn(), Player::Black);
        // previous move stays highlighted
        assert_eq!(scene.highlights.len(), 1);
        assert_eq!(scene.frame(1.0).prev_move, Some(sq("e4")));
    }

    #[test]
    fn test_cannot_select_opponent_piece() {
        let mut scene = scene();
        scene.click(&ray_at("e7"));
        assert_eq!(scene.selected(), None);
        assert!(scene.highlights.is_empty());
    }

    #[test]
    fn test_illegal_target_clears_selection() {
        let mut scene = scene();
        scene.click(&ray_at("e2"));
        scene.click(&ray_at("e5"));
        assert_eq!(scene.selected(), None);
        assert_eq!(scene.board().turn(), Player::White);
    }

    #[test]
    fn test_clicks_on_opponent_turn_drive_debug_opponent() {
        let mut scene = scene();
        scene.click(&ray_at("e2"));
        scene.click(&ray_at("e4"));
        scene.click(&ray_at("e7"));
        // opponent's piece is shown selected
        assert!(scene.frame(1.0).selected.is_some());
        scene.click(&ray_at("e5"));
        scene.update(None);
        assert_eq!(scene.board().turn(), Player::White);
    }

    #[test]
    fn test_promotion_waits_for_prop() {
        let board = Board::from_pieces(
            &[
                (PieceKind::King, Player::White, sq("e1")),
                (PieceKind::King, Player::Black, sq("a8")),
                (PieceKind::Pawn, Player::White, sq("g7")),
            ],
            Player::White,
        );
        let mut scene = GameScene::with_board(
            Player::White,
            board,
            Box::new(DebugOpponent::new(Player::Black)),
            PieceBounds::default(),
        );
        scene.click(&ray_at("g7"));
        scene.click(&ray_at("g8"));
        assert!(scene.promotion_pending());
        assert_eq!(scene.pieces.len(), 3 + 4);

        // clicking the board elsewhere keeps the choice open
        scene.click(&ray_at("d4"));
        assert!(scene.promotion_pending());

        // knight prop sits one file left of the target, beyond rank 8
        let [x, _, _] = sq("g8").world_center();
        let ray = Ray::new(
            Vec3::new(x - 1.0, 9.0, 5.0),
            Vec3::new(0.0, 0.0, -1.0),
        );
        scene.click(&ray);
        assert!(!scene.promotion_pending());
        assert_eq!(scene.board().piece_at(sq("g8")).unwrap().kind, PieceKind::Knight);
    }

    #[test]
    fn test_finished_game_fades_out() {
        let board = Board::from_pieces(
            &[
                (PieceKind::King, Player::White, sq("g6")),
                (PieceKind::King, Player::Black, sq("h8")),
                (PieceKind::Queen, Player::White, sq("a1")),
            ],
            Player::White,
        );
        let mut scene = GameScene::with_board(
            Player::White,
            board,
            Box::new(DebugOpponent::new(Player::Black)),
            PieceBounds::default(),
        );
        // back-rank mate, the king covers g7 and h7
        scene.click(&ray_at("a1"));
        scene.click(&ray_at("a8"));
        assert_eq!(scene.board().outcome(), Some(Outcome::Winner(Player::White)));
        assert!(matches!(scene.draw(), SceneDraw::Game { fading: true, .. }));

        let mut frames = 0;
        while !scene.is_over() {
            scene.update(None);
            frames += 1;
            assert!(frames <= 101, "fade never finished");
        }
        assert!(frames >= 99);
    }
}
