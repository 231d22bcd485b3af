//! Game state module - the pure pair-matching reducer
//!
//! `GameState` is a value: [`GameState::apply`] takes an event and returns the
//! next state together with what happened and whether a resolution timer must
//! be armed. Nothing here reads a clock; the caller owns time.
//!
//! Selection rules (a rejected event leaves the state untouched):
//!
//! - no selection while a pair is `Resolving` or after the board is `Won`
//! - no selecting a tile that is face up or already matched
//! - at most two tiles selected at once
//!
//! The second pick of a pair counts the move immediately and asks for a
//! `Resolve` event after [`RESOLVE_DELAY_MS`]. That event carries the game
//! generation; a resolve from an older generation is ignored.

use arrayvec::ArrayVec;

use crate::board::{Board, Tile};
use crate::error::GameError;
use crate::rng::BoardRng;
use crate::snapshot::{GameSnapshot, TileSnapshot};
use crate::symbols::SymbolSet;
use crate::tile_set::TileSet;
use crate::types::*;

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Deliver `GameEvent::Resolve { generation }` after `delay_ms`.
    ScheduleResolve { generation: u32, delay_ms: u32 },
}

/// What a single event did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A fresh board was dealt.
    NewGame { generation: u32 },
    /// First tile of a pair revealed.
    FirstPick(TileId),
    /// Second tile revealed; the pair now awaits resolution.
    SecondPick(TileId),
    /// The pair matched. `finished` is set when it completed the board.
    Matched { pair: [TileId; 2], finished: bool },
    /// The pair did not match; both tiles were turned back.
    Mismatch { pair: [TileId; 2] },
    /// Selection dropped without any state change.
    Rejected(RejectReason),
    /// A resolve that no longer applies (older generation or nothing pending).
    Stale,
}

impl Outcome {
    /// True when the event changed the state.
    pub fn changed(&self) -> bool {
        !matches!(self, Outcome::Rejected(_) | Outcome::Stale)
    }
}

/// Result of applying one event.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: GameState,
    pub outcome: Outcome,
    pub effect: Option<Effect>,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    symbols: SymbolSet,
    selection: ArrayVec<TileId, 2>,
    matched: TileSet,
    move_count: u32,
    phase: Phase,
    /// Game-generation token, bumped by every new game.
    generation: u32,
    rng: BoardRng,
}

impl GameState {
    /// Create a game over the default palette with the given RNG seed
    pub fn new(seed: u64) -> Self {
        let symbols = SymbolSet::default();
        let mut rng = BoardRng::new(seed);
        let board = Board::deal(&symbols, &mut rng);
        Self::from_parts(board, symbols, rng)
    }

    /// Create a game over a custom symbol set.
    pub fn with_symbols(seed: u64, symbols: &[Symbol]) -> Result<Self, GameError> {
        let symbols = SymbolSet::new(symbols)?;
        let mut rng = BoardRng::new(seed);
        let board = Board::deal(&symbols, &mut rng);
        Ok(Self::from_parts(board, symbols, rng))
    }

    /// Create a game whose first board is laid out exactly as given.
    ///
    /// Later new games reshuffle the same symbols with seed 0.
    pub fn with_layout(layout: &[Symbol]) -> Result<Self, GameError> {
        let board = Board::from_layout(layout)?;
        let mut distinct: ArrayVec<Symbol, MAX_SYMBOLS> = ArrayVec::new();
        for &s in layout {
            if !distinct.contains(&s) {
                distinct.push(s);
            }
        }
        let symbols = SymbolSet::new(&distinct)?;
        Ok(Self::from_parts(board, symbols, BoardRng::new(0)))
    }

    fn from_parts(board: Board, symbols: SymbolSet, rng: BoardRng) -> Self {
        Self {
            board,
            symbols,
            selection: ArrayVec::new(),
            matched: TileSet::new(),
            move_count: 0,
            phase: Phase::Idle,
            generation: 0,
            rng,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tiles(&self) -> &[Tile] {
        self.board.tiles()
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    pub fn selection(&self) -> &[TileId] {
        &self.selection
    }

    pub fn matched(&self) -> TileSet {
        self.matched
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn won(&self) -> bool {
        self.matched.len() == self.board.len()
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn pairs_found(&self) -> usize {
        self.matched.len() / 2
    }

    pub fn total_pairs(&self) -> usize {
        self.board.pair_count()
    }

    /// Would `Select(id)` be accepted right now?
    pub fn is_selectable(&self, id: TileId) -> bool {
        self.check_select(id).is_ok()
    }

    /// Apply one event, returning the next state.
    ///
    /// `self` is left untouched.
    pub fn apply(&self, event: GameEvent) -> Transition {
        let mut state = self.clone();
        let (outcome, effect) = state.step(event);
        Transition {
            state,
            outcome,
            effect,
        }
    }

    /// In-place variant of [`GameState::apply`].
    pub fn apply_mut(&mut self, event: GameEvent) -> (Outcome, Option<Effect>) {
        self.step(event)
    }

    fn step(&mut self, event: GameEvent) -> (Outcome, Option<Effect>) {
        match event {
            GameEvent::NewGame => (self.new_game(), None),
            GameEvent::Select(id) => self.select(id),
            GameEvent::Resolve { generation } => (self.resolve(generation), None),
        }
    }

    fn new_game(&mut self) -> Outcome {
        self.generation = self.generation.wrapping_add(1);
        self.board = Board::deal(&self.symbols, &mut self.rng);
        self.selection.clear();
        self.matched.clear();
        self.move_count = 0;
        self.phase = Phase::Idle;
        Outcome::NewGame {
            generation: self.generation,
        }
    }

    fn check_select(&self, id: TileId) -> Result<(), RejectReason> {
        match self.phase {
            Phase::Resolving => return Err(RejectReason::Resolving),
            Phase::Won => return Err(RejectReason::Won),
            Phase::Idle | Phase::AwaitingSecondPick => {}
        }
        let Some(tile) = self.board.get(id) else {
            return Err(RejectReason::OutOfRange);
        };
        if self.matched.contains(id) {
            return Err(RejectReason::Matched);
        }
        if tile.face_up {
            return Err(RejectReason::FaceUp);
        }
        if self.selection.is_full() {
            return Err(RejectReason::SelectionFull);
        }
        Ok(())
    }

    fn select(&mut self, id: TileId) -> (Outcome, Option<Effect>) {
        if let Err(reason) = self.check_select(id) {
            return (Outcome::Rejected(reason), None);
        }

        self.board.set_face_up(id, true);
        self.selection.push(id);

        if self.selection.len() == 1 {
            self.phase = Phase::AwaitingSecondPick;
            return (Outcome::FirstPick(id), None);
        }

        // Moves are counted at the second pick, not at resolution.
        self.move_count += 1;
        self.phase = Phase::Resolving;
        (
            Outcome::SecondPick(id),
            Some(Effect::ScheduleResolve {
                generation: self.generation,
                delay_ms: RESOLVE_DELAY_MS,
            }),
        )
    }

    fn resolve(&mut self, generation: u32) -> Outcome {
        if generation != self.generation || self.phase != Phase::Resolving {
            return Outcome::Stale;
        }
        let [first, second] = match self.selection.as_slice() {
            &[a, b] => [a, b],
            _ => return Outcome::Stale,
        };
        let (Some(a), Some(b)) = (self.board.get(first), self.board.get(second)) else {
            return Outcome::Stale;
        };

        let is_match = a.symbol == b.symbol;
        self.selection.clear();

        if is_match {
            self.matched.insert(first);
            self.matched.insert(second);
            let finished = self.won();
            self.phase = if finished { Phase::Won } else { Phase::Idle };
            Outcome::Matched {
                pair: [first, second],
                finished,
            }
        } else {
            self.board.set_face_up(first, false);
            self.board.set_face_up(second, false);
            self.phase = Phase::Idle;
            Outcome::Mismatch {
                pair: [first, second],
            }
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.tiles.clear();
        out.tiles.extend(self.board.tiles().iter().map(|t| TileSnapshot {
            id: t.id,
            symbol: t.symbol,
            face_up: t.face_up,
            matched: self.matched.contains(t.id),
        }));
        out.selection.clear();
        out.selection.extend(self.selection.iter().copied());
        out.matched = self.matched;
        out.move_count = self.move_count;
        out.phase = self.phase;
        out.won = self.won();
        out.generation = self.generation;
        out.seed = self.rng.seed();
        out.pairs_found = self.pairs_found() as u8;
        out.total_pairs = self.total_pairs() as u8;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
