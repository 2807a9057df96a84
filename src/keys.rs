//! Keyboard shortcuts.

use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Put down the selected piece.
    CancelSelection,
    Quit,
}

impl GameKey {
    pub fn from_key_code(code: KeyCode) -> Option<GameKey> {
        match code {
            KeyCode::Escape => Some(GameKey::CancelSelection),
            KeyCode::KeyQ => Some(GameKey::Quit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(
            GameKey::from_key_code(KeyCode::Escape),
            Some(GameKey::CancelSelection)
        );
        assert_eq!(GameKey::from_key_code(KeyCode::KeyQ), Some(GameKey::Quit));
        assert_eq!(GameKey::from_key_code(KeyCode::KeyW), None);
    }
}
