//! Turning a cursor ray into a piece or a board square.

use std::collections::HashMap;

use crate::assets::Assets;
use crate::chess::{EntityId, PieceKind, Square};
use crate::math::{Aabb, Ray};
use crate::renderer::frame::PieceDraw;
use crate::shading::board::square_at;

/// Model-space bounds of each piece mesh.
#[derive(Debug, Clone, Default)]
pub struct PieceBounds(HashMap<PieceKind, Aabb>);

impl PieceBounds {
    pub fn from_assets(assets: &Assets) -> Self {
        Self(
            assets
                .pieces
                .iter()
                .filter_map(|(&kind, mesh)| Some((kind, mesh.bounds()?)))
                .collect(),
        )
    }

    /// Bounds for `kind`, or a unit footprint one square tall if the mesh was empty.
    pub fn get(&self, kind: PieceKind) -> Aabb {
        self.0
            .get(&kind)
            .copied()
            .unwrap_or(Aabb::new([-0.5, -0.5, 0.0], [0.5, 0.5, 1.0]))
    }
}

/// What a click landed on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pick {
    /// Nearest piece hit by the ray.
    pub entity: Option<EntityId>,
    /// Board square under the cursor.
    pub square: Option<Square>,
}

impl Pick {
    pub fn cast(ray: &Ray, pieces: &[PieceDraw], bounds: &PieceBounds) -> Self {
        Self {
            entity: nearest_hit(ray, pieces, bounds).map(|piece| piece.entity),
            square: hovered_square(ray),
        }
    }
}

pub fn nearest_hit<'a>(
    ray: &Ray,
    pieces: &'a [PieceDraw],
    bounds: &PieceBounds,
) -> Option<&'a PieceDraw> {
    pieces
        .iter()
        .filter_map(|piece| {
            let hit = bounds.get(piece.kind).transformed(&piece.model).intersect_ray(ray)?;
            Some((hit, piece))
        })
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, piece)| piece)
}

/// Playable square where the ray meets the board surface.
pub fn hovered_square(ray: &Ray) -> Option<Square> {
    let point = ray.intersect_z_plane(0.0)?;
    square_at(point.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::Player;
    use crate::math::{Mat4, Vec3};

    fn draw(id: u32, x: f32) -> PieceDraw {
        PieceDraw {
            kind: PieceKind::Pawn,
            player: Player::White,
            entity: EntityId(id),
            model: Mat4::translation(x, 1.0, 0.0),
        }
    }

    #[test]
    fn test_nearest_piece_wins() {
        let pieces = [draw(1, 5.0), draw(2, 3.0), draw(3, 9.0)];
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.5), Vec3::new(1.0, 0.0, 0.0));
        let hit = nearest_hit(&ray, &pieces, &PieceBounds::default()).unwrap();
        assert_eq!(hit.entity, EntityId(2));
    }

    #[test]
    fn test_miss_returns_none() {
        let pieces = [draw(1, 5.0)];
        let ray = Ray::new(Vec3::new(0.0, 4.0, 0.5), Vec3::new(1.0, 0.0, 0.0));
        assert!(nearest_hit(&ray, &pieces, &PieceBounds::default()).is_none());
    }

    #[test]
    fn test_hovered_square_from_above() {
        let ray = Ray::new(Vec3::new(4.2, 1.9, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(hovered_square(&ray), Some(Square::new(3, 1)));

        let rim = Ray::new(Vec3::new(0.2, 4.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(hovered_square(&rim), None);
    }

    #[test]
    fn test_pick_combines_piece_and_square() {
        let pieces = [draw(7, 4.0)];
        let ray = Ray::new(Vec3::new(4.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let pick = Pick::cast(&ray, &pieces, &PieceBounds::default());
        assert_eq!(pick.entity, Some(EntityId(7)));
        assert_eq!(pick.square, Some(Square::new(3, 0)));
    }
}
