//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the pair-matching rules, state management and board
//! dealing. It has **zero dependencies** on UI, networking, timers or I/O,
//! making it:
//!
//! - **Deterministic**: Same seed deals identical boards
//! - **Testable**: Every transition is a pure function of state and event
//! - **Portable**: Can run in any environment (terminal, remote, headless)
//! - **Allocation-free**: Boards, selections and snapshots live on the stack
//!
//! # Module Structure
//!
//! - [`board`]: dealt tiles, pairing invariant, fixed layouts for tests
//! - [`game_state`]: the reducer (`GameState::apply`) and its outcomes
//! - [`rng`]: seeded uniform shuffle
//! - [`snapshot`]: read-only view for renderers and the adapter
//! - [`symbols`]: validated symbol sets
//! - [`tile_set`]: bitset of tile ids (the matched set)
//!
//! # Game Rules
//!
//! - A board holds two tiles per symbol, uniformly shuffled
//! - Tiles are revealed one at a time; the second reveal completes a move
//! - After [`RESOLVE_DELAY_MS`](types::RESOLVE_DELAY_MS) the pair is judged:
//!   a match stays face up forever, a mismatch turns back
//! - No selection is accepted while a pair is being judged
//! - The game is won when every tile is matched
//!
//! # Example
//!
//! ```
//! use tui_pairs_core::{GameState, Outcome};
//! use tui_pairs_core::types::{GameEvent, Phase, Symbol};
//!
//! let a = Symbol::new(0);
//! let b = Symbol::new(1);
//! let game = GameState::with_layout(&[a, b, a, b]).unwrap();
//!
//! let step = game.apply(GameEvent::Select(0));
//! let step = step.state.apply(GameEvent::Select(2));
//! assert_eq!(step.state.move_count(), 1);
//! assert_eq!(step.state.phase(), Phase::Resolving);
//!
//! // The caller delivers the resolve once the delay has passed.
//! let step = step.state.apply(GameEvent::Resolve { generation: 0 });
//! assert_eq!(step.outcome, Outcome::Matched { pair: [0, 2], finished: false });
//! ```

pub mod board;
pub mod error;
pub mod game_state;
pub mod rng;
pub mod snapshot;
pub mod symbols;
pub mod tile_set;

pub use tui_pairs_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Tile};
pub use error::GameError;
pub use game_state::{Effect, GameState, Outcome, Transition};
pub use rng::BoardRng;
pub use snapshot::{Fnv1aHasher, GameSnapshot, TileSnapshot};
pub use symbols::SymbolSet;
pub use tile_set::TileSet;
