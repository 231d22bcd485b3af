//! Read-only view of a game, handed to renderers and the remote adapter.
//!
//! Snapshots are stack-only and can be refreshed in place with
//! [`GameState::snapshot_into`](crate::GameState::snapshot_into).

use std::hash::{Hash, Hasher};

use arrayvec::ArrayVec;

use crate::tile_set::TileSet;
use crate::types::{Phase, Symbol, TileId, MAX_TILES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileSnapshot {
    pub id: TileId,
    pub symbol: Symbol,
    pub face_up: bool,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GameSnapshot {
    pub tiles: ArrayVec<TileSnapshot, MAX_TILES>,
    pub selection: ArrayVec<TileId, 2>,
    pub matched: TileSet,
    pub move_count: u32,
    pub phase: Phase,
    pub won: bool,
    pub generation: u32,
    pub seed: u64,
    pub pairs_found: u8,
    pub total_pairs: u8,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.selection.clear();
        self.matched.clear();
        self.move_count = 0;
        self.phase = Phase::Idle;
        self.won = false;
        self.generation = 0;
        self.seed = 0;
        self.pairs_found = 0;
        self.total_pairs = 0;
    }

    /// True when the board currently accepts a tile selection.
    pub fn playable(&self) -> bool {
        self.phase.accepts_selection()
    }

    pub fn tile(&self, id: TileId) -> Option<&TileSnapshot> {
        self.tiles.get(id as usize)
    }

    /// Stable 64-bit fingerprint of the whole snapshot.
    ///
    /// Covers hidden symbols and the seed too, so it is only for local change
    /// detection (render throttling, deciding when to broadcast). The remote
    /// `state_hash` is computed separately over visible fields.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Fnv1aHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Stable 64-bit FNV-1a hasher.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions, and
/// fingerprints are sent to remote clients.
#[derive(Debug, Clone)]
pub struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}
