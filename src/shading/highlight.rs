//! Styling of the highlighted destination tiles.
//!
//! Two independent decisions produce the final style. Whether the tile is
//! hovered picks the alpha, lift and colour scale; the capture flag and the
//! previous move pick the colour. `overlay.wgsl` makes the same decisions per
//! instance from `i_board`, `i_capture` and the `hovered` / `prev_move`
//! uniform; [`HighlightStyle::resolve`] is the CPU rendition of that table.

use crate::chess::Square;

/// Lift of a resting highlight above the board surface.
pub const HEIGHT: f32 = 0.03;
pub const CAPTURE_COLOR: [f32; 3] = [0.9, 0.25, 0.2];
pub const LAST_MOVE_COLOR: [f32; 3] = [0.95, 0.8, 0.3];
pub const REGULAR_COLOR: [f32; 3] = [0.3, 0.75, 0.4];

pub const HOVERED_ALPHA: f32 = 0.8;
pub const RESTING_ALPHA: f32 = 0.65;
/// Colour scale of a tile that is not hovered.
pub const RESTING_SCALE: f32 = 0.8;
pub const LAST_MOVE_ALPHA: f32 = 0.65;

/// Tile coordinate the shader never matches, standing in for "no tile".
pub const NO_TILE: [i32; 2] = [-1, -1];

/// `(file, rank)` as sent to the GPU, or [`NO_TILE`].
pub fn tile_coords(square: Option<Square>) -> [i32; 2] {
    square.map_or(NO_TILE, |square| [square.file as i32, square.rank as i32])
}

/// One tile to highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub square: Square,
    pub capture: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightState {
    Hovered,
    Resting,
}

impl HighlightState {
    pub fn of(square: Square, hovered: Option<Square>) -> Self {
        if hovered == Some(square) {
            HighlightState::Hovered
        } else {
            HighlightState::Resting
        }
    }

    /// `(alpha, height, colour scale)`
    fn shape(self) -> (f32, f32, f32) {
        match self {
            HighlightState::Hovered => (HOVERED_ALPHA, HEIGHT / 3.0, 1.0),
            HighlightState::Resting => (RESTING_ALPHA, HEIGHT, RESTING_SCALE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Capture,
    LastMove,
    Regular,
}

impl Tone {
    pub fn of(highlight: &Highlight, prev_move: Option<Square>) -> Self {
        if highlight.capture {
            Tone::Capture
        } else if prev_move == Some(highlight.square) {
            Tone::LastMove
        } else {
            Tone::Regular
        }
    }
}

/// Final appearance of one highlight tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightStyle {
    pub color: [f32; 4],
    pub height: f32,
}

impl HighlightStyle {
    pub fn resolve(
        highlight: &Highlight,
        hovered: Option<Square>,
        prev_move: Option<Square>,
    ) -> Self {
        let (alpha, height, scale) = HighlightState::of(highlight.square, hovered).shape();
        let scaled = |[r, g, b]: [f32; 3]| [r * scale, g * scale, b * scale, alpha];

        let color = match Tone::of(highlight, prev_move) {
            Tone::Capture => scaled(CAPTURE_COLOR),
            Tone::LastMove => {
                let [r, g, b] = LAST_MOVE_COLOR;
                [r, g, b, LAST_MOVE_ALPHA]
            }
            Tone::Regular => scaled(REGULAR_COLOR),
        };

        Self { color, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(file: u8, rank: u8, capture: bool) -> Highlight {
        Highlight {
            square: Square::new(file, rank),
            capture,
        }
    }

    fn scaled(color: [f32; 3], scale: f32, alpha: f32) -> [f32; 4] {
        [color[0] * scale, color[1] * scale, color[2] * scale, alpha]
    }

    fn assert_color(actual: [f32; 4], expected: [f32; 4], case: &str) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6, "{case}: {actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_every_hover_and_tone_combination() {
        let square = Square::new(3, 4);
        let elsewhere = Some(Square::new(0, 0));
        // (case, capture, prev_move, hovered, colour, height)
        let cases = [
            (
                "hovered capture",
                true,
                None,
                Some(square),
                scaled(CAPTURE_COLOR, 1.0, HOVERED_ALPHA),
                HEIGHT / 3.0,
            ),
            (
                "hovered last move",
                false,
                Some(square),
                Some(square),
                scaled(LAST_MOVE_COLOR, 1.0, LAST_MOVE_ALPHA),
                HEIGHT / 3.0,
            ),
            (
                "hovered regular",
                false,
                elsewhere,
                Some(square),
                scaled(REGULAR_COLOR, 1.0, HOVERED_ALPHA),
                HEIGHT / 3.0,
            ),
            (
                "resting capture",
                true,
                None,
                elsewhere,
                scaled(CAPTURE_COLOR, RESTING_SCALE, RESTING_ALPHA),
                HEIGHT,
            ),
            (
                "resting last move",
                false,
                Some(square),
                None,
                scaled(LAST_MOVE_COLOR, 1.0, LAST_MOVE_ALPHA),
                HEIGHT,
            ),
            (
                "resting regular",
                false,
                None,
                None,
                scaled(REGULAR_COLOR, RESTING_SCALE, RESTING_ALPHA),
                HEIGHT,
            ),
        ];

        for (case, capture, prev_move, hovered, color, height) in cases {
            let highlight = Highlight { square, capture };
            let style = HighlightStyle::resolve(&highlight, hovered, prev_move);
            assert_color(style.color, color, case);
            assert_eq!(style.height, height, "{case}");
        }
    }

    #[test]
    fn test_hovered_values() {
        let h = tile(2, 2, true);
        let style = HighlightStyle::resolve(&h, Some(h.square), None);
        assert_eq!(style.color, [0.9, 0.25, 0.2, 0.8]);
        assert_eq!(style.height, HEIGHT / 3.0);

        let style = HighlightStyle::resolve(&tile(2, 2, false), None, None);
        assert_eq!(style.color[3], 0.65);
    }

    #[test]
    fn test_capture_wins_over_last_move() {
        let h = tile(5, 5, true);
        assert_eq!(Tone::of(&h, Some(h.square)), Tone::Capture);
    }

    #[test]
    fn test_hover_elsewhere_does_not_affect_tile() {
        let h = tile(1, 1, false);
        assert_eq!(
            HighlightState::of(h.square, Some(Square::new(1, 2))),
            HighlightState::Resting
        );
    }

    #[test]
    fn test_tile_coords() {
        assert_eq!(tile_coords(None), NO_TILE);
        assert_eq!(tile_coords(Some(Square::new(6, 2))), [6, 2]);
    }
}
