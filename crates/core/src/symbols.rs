//! Validated symbol sets.

use arrayvec::ArrayVec;

use crate::error::GameError;
use crate::types::{Symbol, DEFAULT_SYMBOLS, MAX_SYMBOLS};

/// An ordered set of `K` distinct symbols, `1 <= K <= MAX_SYMBOLS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolSet {
    symbols: ArrayVec<Symbol, MAX_SYMBOLS>,
}

impl SymbolSet {
    /// Validate a symbol set.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_pairs_core::{GameError, SymbolSet};
    /// use tui_pairs_core::types::Symbol;
    ///
    /// assert!(SymbolSet::new(&[Symbol::new(0), Symbol::new(1)]).is_ok());
    /// assert_eq!(SymbolSet::new(&[]), Err(GameError::NoSymbols));
    /// ```
    pub fn new(symbols: &[Symbol]) -> Result<Self, GameError> {
        if symbols.is_empty() {
            return Err(GameError::NoSymbols);
        }
        if symbols.len() > MAX_SYMBOLS {
            return Err(GameError::TooManySymbols {
                count: symbols.len(),
            });
        }

        let mut out = ArrayVec::new();
        for &s in symbols {
            if out.contains(&s) {
                return Err(GameError::DuplicateSymbol(s));
            }
            out.push(s);
        }
        Ok(Self { symbols: out })
    }

    pub fn as_slice(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for SymbolSet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_set() {
        assert_eq!(SymbolSet::new(&[]), Err(GameError::NoSymbols));
    }

    #[test]
    fn rejects_oversized_set() {
        let many: Vec<Symbol> = (0..=MAX_SYMBOLS as u8).map(Symbol::new).collect();
        assert_eq!(
            SymbolSet::new(&many),
            Err(GameError::TooManySymbols {
                count: MAX_SYMBOLS + 1
            })
        );
    }

    #[test]
    fn rejects_duplicates() {
        let set = [Symbol::new(3), Symbol::new(4), Symbol::new(3)];
        assert_eq!(
            SymbolSet::new(&set),
            Err(GameError::DuplicateSymbol(Symbol::new(3)))
        );
    }

    #[test]
    fn single_symbol_is_allowed() {
        let set = SymbolSet::new(&[Symbol::new(5)]).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn keeps_input_order() {
        let set = SymbolSet::new(&[Symbol::new(2), Symbol::new(0), Symbol::new(1)]).unwrap();
        assert_eq!(
            set.as_slice(),
            &[Symbol::new(2), Symbol::new(0), Symbol::new(1)]
        );
    }
}
