//! Construction errors.
//!
//! Gameplay itself has no error path: rejected selections are no-ops. The only
//! contract violation is building a board from an unusable symbol set.

use std::fmt;

use crate::types::{Symbol, MAX_SYMBOLS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// The symbol set is empty; no board can exist.
    NoSymbols,
    /// More symbols than a board can hold.
    TooManySymbols { count: usize },
    /// The same symbol was listed twice in a symbol set.
    DuplicateSymbol(Symbol),
    /// A fixed layout where a symbol does not appear exactly twice.
    UnpairedSymbol(Symbol),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::NoSymbols => write!(f, "symbol set is empty"),
            GameError::TooManySymbols { count } => write!(
                f,
                "symbol set has {} symbols, at most {} fit on a board",
                count, MAX_SYMBOLS
            ),
            GameError::DuplicateSymbol(s) => {
                write!(f, "symbol {} appears more than once in the set", s.ordinal())
            }
            GameError::UnpairedSymbol(s) => {
                write!(f, "symbol {} does not appear exactly twice", s.ordinal())
            }
        }
    }
}

impl std::error::Error for GameError {}
