//! Keyboard events normalized for the game.

use ratzilla::event::KeyCode;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A printable key press.
    Key(char),
    /// Esc or Backspace: leave the current screen.
    Back,
}

impl InputEvent {
    /// Map a DOM key code. Keys the game does not use map to `None`.
    pub fn from_key_code(code: &KeyCode) -> Option<InputEvent> {
        match code {
            KeyCode::Char(c) => Some(InputEvent::Key(*c)),
            KeyCode::Esc | KeyCode::Backspace => Some(InputEvent::Back),
            _ => None,
        }
    }

    /// `'1'..='9'` as a zero-based index.
    pub fn digit_index(&self) -> Option<usize> {
        match self {
            InputEvent::Key(c @ '1'..='9') => Some(*c as usize - '1' as usize),
            _ => None,
        }
    }
}

/// Narrow layouts (phones in portrait) stack panels vertically.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chars_and_back_keys_map() {
        assert_eq!(
            InputEvent::from_key_code(&KeyCode::Char('s')),
            Some(InputEvent::Key('s'))
        );
        assert_eq!(InputEvent::from_key_code(&KeyCode::Esc), Some(InputEvent::Back));
        assert_eq!(
            InputEvent::from_key_code(&KeyCode::Backspace),
            Some(InputEvent::Back)
        );
        assert_eq!(InputEvent::from_key_code(&KeyCode::Tab), None);
    }

    #[test]
    fn digit_index_is_zero_based() {
        assert_eq!(InputEvent::Key('1').digit_index(), Some(0));
        assert_eq!(InputEvent::Key('9').digit_index(), Some(8));
        assert_eq!(InputEvent::Key('0').digit_index(), None);
        assert_eq!(InputEvent::Back.digit_index(), None);
    }

    #[test]
    fn narrow_below_sixty_columns() {
        assert!(is_narrow_layout(40));
        assert!(!is_narrow_layout(60));
    }
}
