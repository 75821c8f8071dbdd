//! The shared table: an ordered collection of melds.
//!
//! Boards have value semantics. Every consumer that wants to ask "what if"
//! clones the board and works on its own copy; only the turn engine's
//! commit step replaces the canonical board inside the game state. The
//! meld list is an `im::Vector`, so cloning a board is O(1) and snapshots
//! are cheap to hand out every turn.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::tile::Tile;
use crate::meld::Meld;

/// The shared table state.
///
/// Invariant: the board is valid iff every meld on it is individually
/// valid. Tile identities are disjoint across melds; the engine preserves
/// this by only ever moving tiles, never copying them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    melds: Vector<Meld>,
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a meld.
    pub fn add_meld(&mut self, meld: Meld) {
        self.melds.push_back(meld);
    }

    /// The melds on the board, in order.
    pub fn melds(&self) -> impl Iterator<Item = &Meld> {
        self.melds.iter()
    }

    /// Number of melds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.melds.len()
    }

    /// Check if the board has no melds.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.melds.is_empty()
    }

    /// Check that every meld on the board is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.melds.iter().all(Meld::is_valid)
    }

    /// All tiles on the board, flattened in meld order.
    ///
    /// This is the shape the solver takes when re-verifying a proposed
    /// whole-board state.
    #[must_use]
    pub fn all_tiles(&self) -> Vec<Tile> {
        self.melds
            .iter()
            .flat_map(|m| m.tiles().iter().copied())
            .collect()
    }

    /// Total number of tiles on the board.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.melds.iter().map(Meld::len).sum()
    }
}

impl FromIterator<Meld> for Board {
    fn from_iter<I: IntoIterator<Item = Meld>>(iter: I) -> Self {
        Self {
            melds: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tile::{Color, TileId};

    fn tile(id: u32, color: Color, value: u8) -> Tile {
        Tile::numbered(TileId::new(id), color, value).unwrap()
    }

    fn red_run(base_id: u32, start: u8) -> Meld {
        Meld::new((0..3).map(|i| tile(base_id + u32::from(i), Color::Red, start + i)))
    }

    #[test]
    fn test_empty_board_is_valid() {
        let board = Board::new();
        assert!(board.is_valid());
        assert!(board.is_empty());
        assert!(board.all_tiles().is_empty());
    }

    #[test]
    fn test_validity_is_conjunction_of_melds() {
        let mut board = Board::new();
        board.add_meld(red_run(0, 1));
        assert!(board.is_valid());

        // A two-tile "meld" poisons the whole board
        board.add_meld(Meld::new([
            tile(10, Color::Blue, 1),
            tile(11, Color::Blue, 2),
        ]));
        assert!(!board.is_valid());
    }

    #[test]
    fn test_all_tiles_flattens_in_meld_order() {
        let mut board = Board::new();
        board.add_meld(red_run(0, 1));
        board.add_meld(red_run(10, 7));

        let tiles = board.all_tiles();
        assert_eq!(tiles.len(), 6);
        assert_eq!(tiles[0].value(), Some(1));
        assert_eq!(tiles[3].value(), Some(7));
        assert_eq!(board.tile_count(), 6);
    }

    #[test]
    fn test_clone_is_independent_snapshot() {
        let mut board = Board::new();
        board.add_meld(red_run(0, 1));

        let snapshot = board.clone();
        board.add_meld(red_run(10, 5));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut board = Board::new();
        board.add_meld(red_run(0, 3));

        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(board, back);
    }
}
