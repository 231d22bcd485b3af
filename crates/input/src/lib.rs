//! Terminal input module (engine-facing).
//!
//! Independent of any UI framework. It maps `crossterm` key events into
//! [`UiAction`]s and keeps the keyboard cursor that turns them into
//! [`crate::types::PlayerAction`]s.

pub mod cursor;
pub mod map;

pub use tui_pairs_types as types;

pub use cursor::BoardCursor;
pub use map::{handle_key_event, should_quit, UiAction};
