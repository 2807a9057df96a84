//! Screens of the application and the state each one keeps between frames.
//!
//! The app runs `Loading`, then alternates between side selection and a
//! game for as long as the window stays open.

pub mod camera;
pub mod game;
pub mod opponent;
pub mod picking;
pub mod side_selection;

use crate::chess::{PieceKind, Player};
use crate::math::{Mat4, deg_to_rad};

pub use game::GameScene;
pub use side_selection::SideSelection;

/// Uniform scale from mesh units to board units.
pub const PIECE_SCALE: f32 = 0.55;
/// Knight meshes face sideways and are turned to face the opponent.
pub const KNIGHT_MODEL_ROTATION: f32 = 90.0;

pub enum Screen {
    Loading,
    SideSelection(SideSelection),
    Game(Box<GameScene>),
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Loading => "loading",
            Screen::SideSelection(_) => "side selection",
            Screen::Game(_) => "game",
        }
    }
}

/// Heading, in degrees about `+z`, a piece of `kind` rests at.
pub fn resting_theta(kind: PieceKind, player: Player) -> f32 {
    match (kind, player) {
        (PieceKind::Knight, Player::White) => KNIGHT_MODEL_ROTATION,
        (PieceKind::Knight, Player::Black) => -KNIGHT_MODEL_ROTATION,
        _ => 0.0,
    }
}

/// Model matrix placing a piece mesh at `position` turned by `theta` degrees.
pub fn piece_transform(position: [f32; 3], theta: f32) -> Mat4 {
    let [x, y, z] = position;
    Mat4::translation(x, y, z)
        .multiply(&Mat4::rotation_z(deg_to_rad(theta)))
        .multiply(&Mat4::scaling(PIECE_SCALE, PIECE_SCALE, PIECE_SCALE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    #[test]
    fn test_piece_transform_places_origin_at_position() {
        let model = piece_transform([3.0, 4.0, 0.0], 135.0);
        let origin = model.transform_point(Vec3::ZERO);
        assert!((origin - Vec3::new(3.0, 4.0, 0.0)).length() < 1e-6);

        let top = model.transform_point(Vec3::new(0.0, 0.0, 1.0));
        assert!((top.z() - PIECE_SCALE).abs() < 1e-6);
    }

    #[test]
    fn test_knights_face_each_other() {
        assert_eq!(
            resting_theta(PieceKind::Knight, Player::White),
            -resting_theta(PieceKind::Knight, Player::Black)
        );
        assert_eq!(resting_theta(PieceKind::Queen, Player::Black), 0.0);
    }
}
