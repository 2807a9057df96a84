use crate::chess::Player;

pub const DARK_PIECE_COLOR: [f32; 3] = [0.12, 0.1, 0.1];
pub const LIGHT_PIECE_COLOR: [f32; 3] = [0.9, 0.87, 0.8];
pub const SELECTION_TINT: [f32; 3] = [0.85, 0.2, 0.15];
pub const SELECTION_ALPHA: f32 = 0.5;

/// Value of the `selected` uniform when no piece is selected.
pub const NO_SELECTION: i32 = -1;

pub fn base_color(player: Player) -> [f32; 3] {
    match player {
        Player::Black => DARK_PIECE_COLOR,
        Player::White => LIGHT_PIECE_COLOR,
    }
}

/// Tint blended over a lit piece: opaque-ish only for the selected entity.
pub fn selection_tint(entity: i32, selected: i32) -> [f32; 4] {
    if entity == selected {
        let [r, g, b] = SELECTION_TINT;
        [r, g, b, SELECTION_ALPHA]
    } else {
        [0.0; 4]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tint_only_on_exact_match() {
        assert_eq!(selection_tint(4, 4)[3], SELECTION_ALPHA);
        assert_eq!(selection_tint(4, 5)[3], 0.0);
        assert_eq!(selection_tint(0, NO_SELECTION), [0.0; 4]);
    }

    #[test]
    fn test_base_color_by_player() {
        assert_eq!(base_color(Player::Black), DARK_PIECE_COLOR);
        assert_eq!(base_color(Player::White), LIGHT_PIECE_COLOR);
    }
}
