//! Melds: the valid tile groupings of the game.
//!
//! A meld is an ordered list of at least 3 tiles. Its kind is always
//! *derived*, never stored:
//!
//! - **Group**: 3-4 tiles sharing one value, pairwise-distinct colors,
//!   wildcards filling the remaining color slots.
//! - **Run**: tiles of one color forming a strictly consecutive value
//!   sequence within 1..=13, wildcards filling interior gaps or extending
//!   either end.
//! - **Invalid**: anything else.
//!
//! An all-wildcard set of size 3-4 satisfies both definitions; it is
//! classified as a Group, which is harmless since either reading is a
//! valid meld.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::tile::{Color, Tile, MAX_VALUE, MIN_VALUE};

/// Inline capacity covers groups (max 4) and short runs without heap
/// allocation; full-length runs of 13 spill.
pub type MeldTiles = SmallVec<[Tile; 5]>;

/// Derived classification of a meld.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeldKind {
    /// Same value, distinct colors, size 3-4.
    Group,
    /// Same color, consecutive values.
    Run,
    /// Not a legal meld.
    Invalid,
}

/// An ordered collection of tiles proposed as one meld.
///
/// ## Example
///
/// ```
/// use rummy_core::core::{Color, Tile, TileId};
/// use rummy_core::meld::{Meld, MeldKind};
///
/// let run = Meld::new([
///     Tile::numbered(TileId::new(0), Color::Red, 5).unwrap(),
///     Tile::numbered(TileId::new(1), Color::Red, 6).unwrap(),
///     Tile::numbered(TileId::new(2), Color::Red, 7).unwrap(),
/// ]);
///
/// assert_eq!(run.classify(), MeldKind::Run);
/// assert!(run.is_valid());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meld {
    tiles: MeldTiles,
}

impl Meld {
    /// Create a meld from tiles, preserving order.
    pub fn new(tiles: impl IntoIterator<Item = Tile>) -> Self {
        Self {
            tiles: tiles.into_iter().collect(),
        }
    }

    /// The tiles of this meld, in order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Check if the meld holds no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Sum of face values; wildcards contribute 0.
    #[must_use]
    pub fn face_value_sum(&self) -> u32 {
        self.tiles.iter().map(|t| t.score_value()).sum()
    }

    /// Check if this meld is legal (a Group or a Run).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.classify() != MeldKind::Invalid
    }

    /// Derive the kind of this meld.
    ///
    /// Melds of fewer than 3 tiles are always `Invalid`. Group is checked
    /// before Run, so an all-wildcard set of 3-4 tiles reads as a Group.
    #[must_use]
    pub fn classify(&self) -> MeldKind {
        if self.tiles.len() < 3 {
            return MeldKind::Invalid;
        }
        if self.is_group() {
            MeldKind::Group
        } else if self.is_run() {
            MeldKind::Run
        } else {
            MeldKind::Invalid
        }
    }

    /// Group check: size at most 4, one shared value, pairwise-distinct
    /// colors among the non-wildcards.
    fn is_group(&self) -> bool {
        if self.tiles.len() > 4 {
            return false;
        }

        let mut shared_value: Option<u8> = None;
        let mut seen_colors = [false; Color::ALL.len()];

        for tile in &self.tiles {
            let (color, value) = match (tile.color(), tile.value()) {
                (Some(c), Some(v)) => (c, v),
                _ => continue, // Wildcards fill any remaining color slot
            };
            if *shared_value.get_or_insert(value) != value {
                return false;
            }
            let slot = &mut seen_colors[color.index() as usize];
            if *slot {
                return false;
            }
            *slot = true;
        }

        true
    }

    /// Run check: one shared color; sorted values made strictly consecutive
    /// by spending wildcards on interior gaps; leftover wildcards must fit
    /// the room left at the ends without leaving 1..=13.
    fn is_run(&self) -> bool {
        let mut wildcards: u32 = 0;
        let mut shared_color: Option<Color> = None;
        let mut values: SmallVec<[u8; 8]> = SmallVec::new();

        for tile in &self.tiles {
            match (tile.color(), tile.value()) {
                (Some(color), Some(value)) => {
                    if *shared_color.get_or_insert(color) != color {
                        return false;
                    }
                    values.push(value);
                }
                _ => wildcards += 1,
            }
        }

        // Only wildcards: trivially consecutive
        if values.is_empty() {
            return true;
        }

        values.sort_unstable();

        let mut spent: u32 = 0;
        for pair in values.windows(2) {
            let gap = i32::from(pair[1]) - i32::from(pair[0]) - 1;
            if gap < 0 {
                return false; // Duplicate value in one color
            }
            spent += gap as u32;
            if spent > wildcards {
                return false;
            }
        }

        // Unspent wildcards extend the ends; the run must stay in 1..=13.
        let leftover = wildcards - spent;
        let min = values[0];
        let max = values[values.len() - 1];
        let room = u32::from(min - MIN_VALUE) + u32::from(MAX_VALUE - max);
        leftover <= room
    }
}

impl std::fmt::Display for Meld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, tile) in self.tiles.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{tile}")?;
        }
        write!(f, "]")
    }
}
