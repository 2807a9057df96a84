//! Board surface zones.
//!
//! The board is a slab spanning `[0, 9] x [0, 9] x [-0.5, 0]`. The playable
//! squares are the 8x8 grid of unit tiles centred on `(1..=8, 1..=8)`; the
//! remaining rim and the slab sides are wooden edge.

use crate::chess::Square;

/// Marble texture coordinates per world unit.
pub const TILE_UV_SCALE: f32 = 0.35;
pub const BLACK_TINT: [f32; 3] = [0.35, 0.3, 0.3];
pub const WHITE_TINT: [f32; 3] = [0.95, 0.92, 0.88];

/// Which material a point of the board surface is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum BoardZone {
    Edge = 0,
    Dark = 1,
    Light = 2,
}

/// Integer tile under a world-space point, `floor(pos.xy - 0.5)`.
pub fn tile(world: [f32; 3]) -> [i32; 2] {
    [
        (world[0] - 0.5).floor() as i32,
        (world[1] - 0.5).floor() as i32,
    ]
}

impl BoardZone {
    /// Classifies a point with the same ordered guards as the board fragment
    /// stage: below the top surface, then off the grid, then tile parity.
    pub fn classify(world: [f32; 3]) -> BoardZone {
        let [x, y] = tile(world);
        if world[2] < 0.0 {
            return BoardZone::Edge;
        }
        if !(0..8).contains(&x) || !(0..8).contains(&y) {
            return BoardZone::Edge;
        }
        match (x + y) % 2 {
            0 => BoardZone::Dark,
            _ => BoardZone::Light,
        }
    }

    pub fn wgsl_name(self) -> &'static str {
        match self {
            BoardZone::Edge => "ZONE_EDGE",
            BoardZone::Dark => "ZONE_DARK",
            BoardZone::Light => "ZONE_LIGHT",
        }
    }
}

/// The playable square under a world-space point, if any.
pub fn square_at(world: [f32; 3]) -> Option<Square> {
    match BoardZone::classify(world) {
        BoardZone::Edge => None,
        BoardZone::Dark | BoardZone::Light => {
            let [x, y] = tile(world);
            Square::try_new(x, y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_parity_inside_grid() {
        assert_eq!(BoardZone::classify([1.0, 1.0, 0.0]), BoardZone::Dark);
        assert_eq!(BoardZone::classify([2.0, 1.0, 0.0]), BoardZone::Light);
        assert_eq!(BoardZone::classify([8.0, 8.0, 0.0]), BoardZone::Dark);
    }

    #[test]
    fn test_parity_over_every_tile() {
        for x in 0..8 {
            for y in 0..8 {
                // tile (x, y) is centred on (x + 1, y + 1)
                let centre = [x as f32 + 1.0, y as f32 + 1.0, 0.0];
                let expected = if (x + y) % 2 == 0 {
                    BoardZone::Dark
                } else {
                    BoardZone::Light
                };
                assert_eq!(BoardZone::classify(centre), expected, "tile ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_off_grid_tiles_are_edge_for_either_parity() {
        for i in -1..=8 {
            for (x, y) in [(-1, i), (8, i), (i, -1), (i, 8)] {
                let centre = [x as f32 + 1.0, y as f32 + 1.0, 0.0];
                assert_eq!(BoardZone::classify(centre), BoardZone::Edge, "tile ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_grid_boundaries_are_inclusive() {
        // tile 0 and tile 7 on both axes are playable
        assert_ne!(BoardZone::classify([0.5, 0.5, 0.0]), BoardZone::Edge);
        assert_ne!(BoardZone::classify([8.49, 8.49, 0.0]), BoardZone::Edge);
        assert_eq!(BoardZone::classify([0.49, 4.0, 0.0]), BoardZone::Edge);
        assert_eq!(BoardZone::classify([4.0, 8.5, 0.0]), BoardZone::Edge);
    }

    #[test]
    fn test_below_surface_is_edge_even_inside_grid() {
        assert_eq!(BoardZone::classify([4.0, 4.0, -0.01]), BoardZone::Edge);
        assert_eq!(BoardZone::classify([4.0, 4.0, -0.5]), BoardZone::Edge);
    }

    #[test]
    fn test_square_at_matches_world_centres() {
        for file in 0..8 {
            for rank in 0..8 {
                let square = Square::new(file, rank);
                assert_eq!(square_at(square.world_center()), Some(square));
            }
        }
        assert_eq!(square_at([0.2, 0.2, 0.0]), None);
    }
}
