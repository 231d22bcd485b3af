//! Keyboard cursor over the tile grid.
//!
//! The cursor moves freely over every tile, including face-up and matched
//! ones; whether a tile can be selected is the game's decision, not the
//! cursor's.

use crate::map::UiAction;
use crate::types::{PlayerAction, TileId, BOARD_COLUMNS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardCursor {
    index: TileId,
    tile_count: u8,
}

impl BoardCursor {
    pub fn new(tile_count: u8) -> Self {
        Self {
            index: 0,
            tile_count,
        }
    }

    pub fn index(&self) -> TileId {
        self.index
    }

    pub fn tile_count(&self) -> u8 {
        self.tile_count
    }

    /// (column, row) of the cursor in the grid.
    pub fn position(&self) -> (u8, u8) {
        (self.index % BOARD_COLUMNS, self.index / BOARD_COLUMNS)
    }

    /// Resize for a new board, keeping the cursor in range.
    pub fn reset(&mut self, tile_count: u8) {
        self.tile_count = tile_count;
        if self.index >= tile_count {
            self.index = tile_count.saturating_sub(1);
        }
    }

    /// Jump to a tile (mouse hover or click). Out-of-range ids are ignored.
    pub fn set(&mut self, id: TileId) -> bool {
        if id < self.tile_count {
            self.index = id;
            true
        } else {
            false
        }
    }

    /// Apply a UI action. Cursor moves are consumed here; anything aimed at
    /// the game comes back as a [`PlayerAction`].
    pub fn handle(&mut self, action: UiAction) -> Option<PlayerAction> {
        match action {
            UiAction::CursorLeft => {
                if self.index % BOARD_COLUMNS > 0 {
                    self.index -= 1;
                }
                None
            }
            UiAction::CursorRight => {
                if self.index % BOARD_COLUMNS + 1 < BOARD_COLUMNS
                    && self.index + 1 < self.tile_count
                {
                    self.index += 1;
                }
                None
            }
            UiAction::CursorUp => {
                if self.index >= BOARD_COLUMNS {
                    self.index -= BOARD_COLUMNS;
                }
                None
            }
            UiAction::CursorDown => {
                let below = self.index.saturating_add(BOARD_COLUMNS);
                if below < self.tile_count {
                    self.index = below;
                }
                None
            }
            UiAction::Activate => {
                if self.tile_count == 0 {
                    None
                } else {
                    Some(PlayerAction::Select(self.index))
                }
            }
            UiAction::NewGame => Some(PlayerAction::NewGame),
        }
    }
}

impl Default for BoardCursor {
    fn default() -> Self {
        Self::new(16)
    }
}
