//! Game engine: the core reducer plus the clock that drives it.
//!
//! The core crate knows nothing about time. This crate owns the one timer the
//! game needs (the pair-resolution delay) and exposes the two player inputs as
//! plain method calls, so any front end can drive a game from its own loop.

pub mod session;
pub mod timer;

pub use tui_pairs_core as core;
pub use tui_pairs_types as types;

pub use session::Session;
pub use timer::{PendingResolve, ResolveTimer};
