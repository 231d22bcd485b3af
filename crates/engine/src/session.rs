//! Session driver - owns the current game and its pending resolution.
//!
//! The game loop calls [`Session::apply_action`] for player input and
//! [`Session::tick`] once per fixed timestep. When a second pick arms the
//! resolution timer, the matching `Resolve` event is fed back into the reducer
//! after the delay. A new game bumps the generation, so a timer armed for the
//! previous board resolves to a no-op.

use log::debug;

use crate::core::{Effect, GameSnapshot, GameState, Outcome};
use crate::timer::{PendingResolve, ResolveTimer};
use crate::types::{GameEvent, PlayerAction, TileId};

#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    timer: ResolveTimer,
}

impl Session {
    /// Start a session on the default palette with the given seed.
    pub fn new(seed: u64) -> Self {
        Self::with_state(GameState::new(seed))
    }

    /// Start a session from an existing game (custom symbols, fixed layouts).
    pub fn with_state(state: GameState) -> Self {
        Self {
            state,
            timer: ResolveTimer::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn pending_resolve(&self) -> Option<PendingResolve> {
        self.timer.pending()
    }

    /// Forward a player action into the reducer.
    pub fn apply_action(&mut self, action: PlayerAction) -> Outcome {
        self.dispatch(action.into_event())
    }

    /// Reveal a tile.
    pub fn select_tile(&mut self, id: TileId) -> Outcome {
        self.dispatch(GameEvent::Select(id))
    }

    /// Deal a fresh board, invalidating any pending resolve.
    pub fn new_game(&mut self) -> Outcome {
        self.dispatch(GameEvent::NewGame)
    }

    /// Advance the resolution timer. Returns the resolve outcome when it fired.
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<Outcome> {
        let generation = self.timer.advance(elapsed_ms)?;
        Some(self.dispatch(GameEvent::Resolve { generation }))
    }

    /// Resolve the pending pair now instead of waiting for the delay.
    pub fn fire_pending(&mut self) -> Option<Outcome> {
        let generation = self.timer.take()?;
        Some(self.dispatch(GameEvent::Resolve { generation }))
    }

    fn dispatch(&mut self, event: GameEvent) -> Outcome {
        let (outcome, effect) = self.state.apply_mut(event);

        match outcome {
            Outcome::Rejected(reason) => {
                debug!(target: "engine", "{:?} rejected: {}", event, reason.as_str());
            }
            Outcome::Stale => {
                debug!(target: "engine", "{:?} ignored: stale generation", event);
            }
            _ => {
                debug!(
                    target: "engine",
                    "{:?} -> {:?} (phase {}, moves {})",
                    event,
                    outcome,
                    self.state.phase().as_str(),
                    self.state.move_count()
                );
            }
        }

        if let Some(Effect::ScheduleResolve {
            generation,
            delay_ms,
        }) = effect
        {
            self.timer.arm(generation, delay_ms);
        }

        outcome
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.state.snapshot_into(out);
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.state.snapshot()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(1)
    }
}
