use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

/// Command produced by a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    Restart,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('w' | 'W') => KeyAction::Turn(Direction::Up),
            KeyCode::Down | KeyCode::Char('s' | 'S') => KeyAction::Turn(Direction::Down),
            KeyCode::Left | KeyCode::Char('a' | 'A') => KeyAction::Turn(Direction::Left),
            KeyCode::Right | KeyCode::Char('d' | 'D') => KeyAction::Turn(Direction::Right),

            KeyCode::Char('q' | 'Q') | KeyCode::Esc => KeyAction::Quit,
            // space matches the restart prompt on the game-over panel
            KeyCode::Char('r' | 'R' | ' ') => KeyAction::Restart,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
