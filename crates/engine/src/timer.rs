//! Single-slot resolution timer.
//!
//! At most one pair is ever awaiting resolution, so one slot is enough. The
//! timer counts down on the fixed timestep like every other game timer and
//! hands back the generation it was armed for when it expires.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingResolve {
    pub generation: u32,
    pub remaining_ms: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ResolveTimer {
    pending: Option<PendingResolve>,
}

impl ResolveTimer {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Arm the timer, replacing anything still pending.
    pub fn arm(&mut self, generation: u32, delay_ms: u32) {
        self.pending = Some(PendingResolve {
            generation,
            remaining_ms: delay_ms,
        });
    }

    /// Advance by `elapsed_ms`. Returns the armed generation once the delay
    /// has fully elapsed; the slot is then empty again.
    pub fn advance(&mut self, elapsed_ms: u32) -> Option<u32> {
        let pending = self.pending.as_mut()?;
        pending.remaining_ms = pending.remaining_ms.saturating_sub(elapsed_ms);
        if pending.remaining_ms == 0 {
            return self.take();
        }
        None
    }

    /// Empty the slot immediately, returning the armed generation.
    pub fn take(&mut self) -> Option<u32> {
        self.pending.take().map(|p| p.generation)
    }

    pub fn pending(&self) -> Option<PendingResolve> {
        self.pending
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
