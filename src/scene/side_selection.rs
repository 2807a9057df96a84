//! Picking a colour by clicking one of two kings.

use std::time::Instant;

use tracing::info;

use crate::chess::{EntityId, PieceKind, Player};
use crate::math::Ray;
use crate::renderer::frame::{FrameState, PieceDraw};
use crate::scene::camera::PerspectiveCamera;
use crate::scene::picking::{PieceBounds, nearest_hit};
use crate::scene::piece_transform;

pub struct SideSelection {
    camera: PerspectiveCamera,
    kings: [PieceDraw; 2],
    started: Instant,
}

impl Default for SideSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl SideSelection {
    pub fn new() -> Self {
        let king = |id, player, position, theta| PieceDraw {
            kind: PieceKind::King,
            player,
            entity: EntityId(id),
            model: piece_transform(position, theta),
        };
        Self {
            camera: PerspectiveCamera::new([0.0, 0.0, 2.4], [1.0, 0.0, -0.75], 35.0),
            kings: [
                king(0, Player::White, [1.5, 0.5, -0.4], 135.0),
                king(1, Player::Black, [1.5, -0.5, -0.4], -135.0),
            ],
            started: Instant::now(),
        }
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn pieces(&self) -> &[PieceDraw] {
        &self.kings
    }

    pub fn frame(&self, aspect: f32) -> FrameState {
        FrameState {
            proj: self.camera.proj(aspect),
            view: self.camera.view(),
            time: self.started.elapsed().as_secs_f32(),
            ..FrameState::default()
        }
    }

    /// The side whose king the ray hits first.
    pub fn click(&self, ray: &Ray, bounds: &PieceBounds) -> Option<Player> {
        let king = nearest_hit(ray, &self.kings, bounds)?;
        info!(side = ?king.player, "side selected");
        Some(king.player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn ray_towards(target: [f32; 3]) -> Ray {
        let eye = Vec3::new(0.0, 0.0, 2.4);
        Ray::new(eye, (Vec3::from(target) - eye).normalize())
    }

    #[test]
    fn test_clicking_a_king_picks_its_side() {
        let scene = SideSelection::new();
        let bounds = PieceBounds::default();
        assert_eq!(
            scene.click(&ray_towards([1.5, 0.5, -0.2]), &bounds),
            Some(Player::White)
        );
        assert_eq!(
            scene.click(&ray_towards([1.5, -0.5, -0.2]), &bounds),
            Some(Player::Black)
        );
    }

    #[test]
    fn test_clicking_empty_space_picks_nothing() {
        let scene = SideSelection::new();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 2.4), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(scene.click(&ray, &PieceBounds::default()), None);
    }

    #[test]
    fn test_nothing_is_tinted() {
        let frame = SideSelection::new().frame(16.0 / 9.0);
        assert_eq!(frame.selected, None);
    }
}
