//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, terminal rendering, remote protocol).
//!
//! # Board Dimensions
//!
//! A board holds `K` pairs, so `2K` tiles:
//!
//! - **Default**: 8 pairs (16 tiles) laid out in 4 columns
//! - **Capacity**: 16 pairs (32 tiles), enough for a bitset of tile ids in a `u32`
//! - **Tile ids**: `0..2K`, assigned in board order after the shuffle
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `RESOLVE_DELAY_MS` | 600 | Time both picks stay visible before the pair is judged |
//! | `STATIC_FRAME_INTERVAL_MS` | 250 | Redraw interval while nothing changes |
//!
//! # Examples
//!
//! ```
//! use tui_pairs_types::{Palette, Phase, PlayerAction, Symbol, DEFAULT_SYMBOLS};
//!
//! // The default symbol set is the 8-color palette.
//! assert_eq!(DEFAULT_SYMBOLS.len(), 8);
//! assert_eq!(Symbol::new(0).color(), Palette::Red);
//! assert_eq!(Symbol::new(1).letter(), 'B');
//!
//! // Parse a phase or an action (case-insensitive).
//! assert_eq!(Phase::from_str("resolving"), Some(Phase::Resolving));
//! assert_eq!(PlayerAction::from_str("newGame"), Some(PlayerAction::NewGame));
//! ```

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Delay between the second pick of a pair and its resolution.
///
/// The presentation layer uses the same value to time its reveal animation.
pub const RESOLVE_DELAY_MS: u32 = 600;

/// Minimum redraw interval for frames whose content did not change.
pub const STATIC_FRAME_INTERVAL_MS: u64 = 250;

/// Number of pairs on a default board.
pub const DEFAULT_PAIRS: usize = 8;

/// Largest symbol set a board accepts.
pub const MAX_SYMBOLS: usize = 16;

/// Largest number of tiles on a board (two per symbol).
pub const MAX_TILES: usize = MAX_SYMBOLS * 2;

/// Tiles per row in the board layout.
pub const BOARD_COLUMNS: u8 = 4;

/// Board position index, also the tile's identity.
pub type TileId = u8;

/// The default symbol set: one symbol per palette color.
pub const DEFAULT_SYMBOLS: [Symbol; DEFAULT_PAIRS] = [
    Symbol(0),
    Symbol(1),
    Symbol(2),
    Symbol(3),
    Symbol(4),
    Symbol(5),
    Symbol(6),
    Symbol(7),
];

/// Hidden face of a tile.
///
/// Symbols are plain ordinals; two tiles match when their symbols are equal.
/// The display class (palette color and letter) is derived from the ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(pub u8);

impl Symbol {
    pub const fn new(ordinal: u8) -> Self {
        Self(ordinal)
    }

    pub fn ordinal(&self) -> u8 {
        self.0
    }

    /// Palette color used to draw this symbol.
    ///
    /// Symbol sets larger than the palette reuse colors; the letter still
    /// tells them apart.
    pub fn color(&self) -> Palette {
        Palette::ALL[self.0 as usize % Palette::ALL.len()]
    }

    /// Letter printed on the revealed tile (`A`, `B`, ...).
    pub fn letter(&self) -> char {
        (b'A' + self.0 % 26) as char
    }
}

/// Tile colors, in the order the default symbol set uses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Palette {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Pink,
    Indigo,
    Orange,
}

impl Palette {
    pub const ALL: [Palette; 8] = [
        Palette::Red,
        Palette::Blue,
        Palette::Green,
        Palette::Yellow,
        Palette::Purple,
        Palette::Pink,
        Palette::Indigo,
        Palette::Orange,
    ];

    /// Parse palette color from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_pairs_types::Palette;
    ///
    /// assert_eq!(Palette::from_str("Indigo"), Some(Palette::Indigo));
    /// assert_eq!(Palette::from_str("teal"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" => Some(Palette::Red),
            "blue" => Some(Palette::Blue),
            "green" => Some(Palette::Green),
            "yellow" => Some(Palette::Yellow),
            "purple" => Some(Palette::Purple),
            "pink" => Some(Palette::Pink),
            "indigo" => Some(Palette::Indigo),
            "orange" => Some(Palette::Orange),
            _ => None,
        }
    }

    /// Lowercase name, used as the display class on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Palette::Red => "red",
            Palette::Blue => "blue",
            Palette::Green => "green",
            Palette::Yellow => "yellow",
            Palette::Purple => "purple",
            Palette::Pink => "pink",
            Palette::Indigo => "indigo",
            Palette::Orange => "orange",
        }
    }
}

/// Session phase.
///
/// The cycle is `Idle → AwaitingSecondPick → Resolving → Idle`, leaving to
/// `Won` when the last pair resolves. `Won` lasts until the next new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    AwaitingSecondPick,
    Resolving,
    Won,
}

impl Phase {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "idle" => Some(Phase::Idle),
            "awaitingsecondpick" | "awaiting_second_pick" => Some(Phase::AwaitingSecondPick),
            "resolving" => Some(Phase::Resolving),
            "won" => Some(Phase::Won),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::AwaitingSecondPick => "awaiting_second_pick",
            Phase::Resolving => "resolving",
            Phase::Won => "won",
        }
    }

    /// True when the phase accepts a tile selection at all.
    pub fn accepts_selection(&self) -> bool {
        matches!(self, Phase::Idle | Phase::AwaitingSecondPick)
    }
}

/// Events the reducer understands.
///
/// `Select` and `NewGame` come from the player; `Resolve` is delivered by the
/// single pending timer and carries the generation it was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    NewGame,
    Select(TileId),
    Resolve { generation: u32 },
}

/// Player input shared by every front end (terminal, remote adapter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// A tile was activated (clicked, pressed or commanded remotely).
    Select(TileId),
    /// Throw the board away and deal a new one.
    NewGame,
}

impl PlayerAction {
    /// Parse an argument-less action from string (for the remote protocol)
    ///
    /// `select` needs a tile id and is therefore never produced here.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "newgame" | "new_game" => Some(PlayerAction::NewGame),
            _ => None,
        }
    }

    /// Convert to camelCase string for the remote protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerAction::Select(_) => "select",
            PlayerAction::NewGame => "newGame",
        }
    }

    pub fn into_event(self) -> GameEvent {
        match self {
            PlayerAction::Select(id) => GameEvent::Select(id),
            PlayerAction::NewGame => GameEvent::NewGame,
        }
    }
}

/// Why a selection was dropped.
///
/// Rejections never reach the player; front ends may use them for feedback
/// such as not moving the cursor highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// A pair is being compared.
    Resolving,
    /// The board is solved.
    Won,
    /// Tile is already revealed.
    FaceUp,
    /// Tile is part of a solved pair.
    Matched,
    /// Two tiles are already selected.
    SelectionFull,
    /// No tile with that id.
    OutOfRange,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Resolving => "resolving",
            RejectReason::Won => "won",
            RejectReason::FaceUp => "face_up",
            RejectReason::Matched => "matched",
            RejectReason::SelectionFull => "selection_full",
            RejectReason::OutOfRange => "out_of_range",
        }
    }
}
