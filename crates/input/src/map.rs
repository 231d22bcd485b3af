//! Key mapping from terminal events to board actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Terminal-level action. Cursor moves stay in the front end; `Activate` and
/// `NewGame` become [`PlayerAction`](crate::types::PlayerAction)s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    Activate,
    NewGame,
}

/// Map keyboard input to board actions.
pub fn handle_key_event(key: KeyEvent) -> Option<UiAction> {
    match key.code {
        KeyCode::Left
        | KeyCode::Char('h')
        | KeyCode::Char('H')
        | KeyCode::Char('a')
        | KeyCode::Char('A') => Some(UiAction::CursorLeft),
        KeyCode::Right
        | KeyCode::Char('l')
        | KeyCode::Char('L')
        | KeyCode::Char('d')
        | KeyCode::Char('D') => Some(UiAction::CursorRight),
        KeyCode::Up
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W') => Some(UiAction::CursorUp),
        KeyCode::Down
        | KeyCode::Char('j')
        | KeyCode::Char('J')
        | KeyCode::Char('s')
        | KeyCode::Char('S') => Some(UiAction::CursorDown),

        KeyCode::Enter | KeyCode::Char(' ') => Some(UiAction::Activate),

        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('r') | KeyCode::Char('R') => {
            Some(UiAction::NewGame)
        }

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
