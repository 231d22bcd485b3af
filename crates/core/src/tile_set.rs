//! Fixed-capacity set of tile ids.
//!
//! Boards hold at most 32 tiles, so membership fits in one `u32` word.

use crate::types::{TileId, MAX_TILES};

const _: () = assert!(MAX_TILES <= u32::BITS as usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileSet(u32);

impl TileSet {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Insert a tile id. Returns false if it was already present or is out
    /// of capacity.
    pub fn insert(&mut self, id: TileId) -> bool {
        if id as usize >= MAX_TILES {
            return false;
        }
        let bit = 1u32 << id;
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }

    pub fn contains(&self, id: TileId) -> bool {
        (id as usize) < MAX_TILES && self.0 & (1u32 << id) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// True if every id in `other` is also in `self`.
    pub fn is_superset(&self, other: &TileSet) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Iterate ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = TileId> + '_ {
        (0..MAX_TILES as TileId).filter(move |&id| self.contains(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_contains() {
        let mut s = TileSet::new();
        assert!(s.insert(0));
        assert!(s.insert(31));
        assert!(!s.insert(0));
        assert!(s.contains(0));
        assert!(s.contains(31));
        assert!(!s.contains(5));
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn out_of_capacity_ids_are_ignored() {
        let mut s = TileSet::new();
        assert!(!s.insert(32));
        assert!(!s.contains(32));
        assert!(s.is_empty());
    }

    #[test]
    fn iter_is_ascending() {
        let mut s = TileSet::new();
        for id in [9, 2, 17] {
            s.insert(id);
        }
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![2, 9, 17]);
    }

    #[test]
    fn superset() {
        let mut a = TileSet::new();
        let mut b = TileSet::new();
        a.insert(1);
        a.insert(2);
        b.insert(2);
        assert!(a.is_superset(&b));
        assert!(!b.is_superset(&a));
    }
}
