//! Board module - the dealt tiles
//!
//! A board is an ordered row-major list of `2K` tiles. Tile ids equal their
//! position, so `tiles()[id].id == id` always holds. Uses a fixed-capacity
//! array so dealing and cloning never allocate.

use arrayvec::ArrayVec;

use crate::error::GameError;
use crate::rng::BoardRng;
use crate::symbols::SymbolSet;
use crate::types::{Symbol, TileId, BOARD_COLUMNS, MAX_TILES};

/// One board cell with a hidden symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub symbol: Symbol,
    pub face_up: bool,
}

impl Tile {
    pub const fn new(id: TileId, symbol: Symbol) -> Self {
        Self {
            id,
            symbol,
            face_up: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    tiles: ArrayVec<Tile, MAX_TILES>,
}

impl Board {
    /// Deal a fresh board: two tiles per symbol, uniformly shuffled, all face down.
    pub fn deal(symbols: &SymbolSet, rng: &mut BoardRng) -> Self {
        let mut faces: ArrayVec<Symbol, MAX_TILES> = symbols
            .as_slice()
            .iter()
            .flat_map(|&s| [s, s])
            .collect();
        rng.shuffle(&mut faces);
        Self::from_faces(&faces)
    }

    /// Build a board with a fixed order (no shuffle).
    ///
    /// Every symbol in `layout` must appear exactly twice.
    pub fn from_layout(layout: &[Symbol]) -> Result<Self, GameError> {
        if layout.is_empty() {
            return Err(GameError::NoSymbols);
        }
        if layout.len() > MAX_TILES {
            return Err(GameError::TooManySymbols {
                count: layout.len().div_ceil(2),
            });
        }
        for &s in layout {
            if layout.iter().filter(|&&o| o == s).count() != 2 {
                return Err(GameError::UnpairedSymbol(s));
            }
        }
        Ok(Self::from_faces(layout))
    }

    fn from_faces(faces: &[Symbol]) -> Self {
        let tiles = faces
            .iter()
            .enumerate()
            .map(|(i, &symbol)| Tile::new(i as TileId, symbol))
            .collect();
        Self { tiles }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Number of pairs on the board.
    pub fn pair_count(&self) -> usize {
        self.tiles.len() / 2
    }

    /// Number of rows in the 4-column layout.
    pub fn rows(&self) -> u8 {
        (self.tiles.len() as u8).div_ceil(BOARD_COLUMNS)
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id as usize)
    }

    pub(crate) fn set_face_up(&mut self, id: TileId, face_up: bool) {
        if let Some(tile) = self.tiles.get_mut(id as usize) {
            tile.face_up = face_up;
        }
    }

    /// The other tile carrying the same symbol.
    pub fn partner_of(&self, id: TileId) -> Option<TileId> {
        let symbol = self.get(id)?.symbol;
        self.tiles
            .iter()
            .find(|t| t.id != id && t.symbol == symbol)
            .map(|t| t.id)
    }

    /// Check the pairing invariant: every symbol sits on exactly two tiles.
    pub fn is_well_paired(&self) -> bool {
        self.tiles.len() % 2 == 0
            && self.tiles.iter().all(|t| {
                self.tiles.iter().filter(|o| o.symbol == t.symbol).count() == 2
            })
    }

    /// Count of tiles showing a given symbol (0 or 2 on a valid board).
    pub fn count_symbol(&self, symbol: Symbol) -> usize {
        self.tiles.iter().filter(|t| t.symbol == symbol).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(n: u8) -> Symbol {
        Symbol::new(n)
    }

    #[test]
    fn test_deal_pairs_every_symbol() {
        let symbols = SymbolSet::default();
        let mut rng = BoardRng::new(3);
        let board = Board::deal(&symbols, &mut rng);

        assert_eq!(board.len(), 16);
        assert!(board.is_well_paired());
        for &s in symbols.as_slice() {
            assert_eq!(board.count_symbol(s), 2);
        }
    }

    #[test]
    fn test_deal_assigns_ids_in_position_order() {
        let mut rng = BoardRng::new(3);
        let board = Board::deal(&SymbolSet::default(), &mut rng);
        for (i, t) in board.tiles().iter().enumerate() {
            assert_eq!(t.id as usize, i);
            assert!(!t.face_up);
        }
    }

    #[test]
    fn test_consecutive_deals_differ() {
        let symbols = SymbolSet::default();
        let mut rng = BoardRng::new(3);
        let a = Board::deal(&symbols, &mut rng);
        let b = Board::deal(&symbols, &mut rng);
        assert_ne!(a, b);
    }

    #[test]
    fn test_from_layout_keeps_order() {
        let board = Board::from_layout(&[sym(0), sym(1), sym(0), sym(1)]).unwrap();
        let faces: Vec<Symbol> = board.tiles().iter().map(|t| t.symbol).collect();
        assert_eq!(faces, vec![sym(0), sym(1), sym(0), sym(1)]);
    }

    #[test]
    fn test_from_layout_rejects_unpaired() {
        assert_eq!(
            Board::from_layout(&[sym(0), sym(1), sym(0)]),
            Err(GameError::UnpairedSymbol(sym(1)))
        );
        assert_eq!(
            Board::from_layout(&[sym(0), sym(0), sym(0), sym(0)]),
            Err(GameError::UnpairedSymbol(sym(0)))
        );
        assert_eq!(Board::from_layout(&[]), Err(GameError::NoSymbols));
    }

    #[test]
    fn test_partner_of() {
        let board = Board::from_layout(&[sym(0), sym(1), sym(1), sym(0)]).unwrap();
        assert_eq!(board.partner_of(0), Some(3));
        assert_eq!(board.partner_of(2), Some(1));
        assert_eq!(board.partner_of(9), None);
    }

    #[test]
    fn test_rows_for_four_columns() {
        let mut rng = BoardRng::new(1);
        let board = Board::deal(&SymbolSet::default(), &mut rng);
        assert_eq!(board.rows(), 4);

        let small = Board::from_layout(&[sym(0), sym(1), sym(0), sym(1), sym(2), sym(2)]).unwrap();
        assert_eq!(small.rows(), 2);
    }
}
