//! Tile value types.
//!
//! A tile is either a numbered tile (one of four colors, face value 1-13)
//! or a wildcard. Every physical tile carries a unique `TileId`; tiles move
//! between deck, hands, and board by ownership transfer and are never
//! duplicated during play.
//!
//! Identity vs. interchangeability:
//! - Derived `Eq` compares identity (two tiles are the same physical tile).
//! - [`Tile::same_face`] compares faces (two Red 5s from different deck
//!   copies are interchangeable but not identical).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest legal face value.
pub const MIN_VALUE: u8 = 1;

/// Highest legal face value.
pub const MAX_VALUE: u8 = 13;

/// Unique identifier for a physical tile.
///
/// Allocated once at deck-build time and stable for the life of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl TileId {
    /// Create a new tile ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Tile color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    Red,
    Blue,
    Yellow,
    Black,
}

impl Color {
    /// All colors, in canonical order.
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Yellow, Color::Black];

    /// Canonical index of this color (0-3).
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
            Color::Yellow => 2,
            Color::Black => 3,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::Red => "Red",
            Color::Blue => "Blue",
            Color::Yellow => "Yellow",
            Color::Black => "Black",
        };
        write!(f, "{name}")
    }
}

/// Errors from tile construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TileError {
    /// A numbered tile was requested with a value outside 1..=13.
    #[error("malformed tile: value {0} is outside {MIN_VALUE}..={MAX_VALUE}")]
    MalformedTile(u8),
}

/// The face of a tile: a colored number or the wildcard marker.
///
/// A wildcard carries no value of its own; it takes whatever role the meld
/// containing it requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileFace {
    /// A colored, numbered tile.
    Number { color: Color, value: u8 },
    /// A wildcard (joker).
    Wildcard,
}

/// One physical tile.
///
/// ## Example
///
/// ```
/// use rummy_core::core::{Color, Tile, TileId};
///
/// let red5 = Tile::numbered(TileId::new(0), Color::Red, 5).unwrap();
/// let joker = Tile::wildcard(TileId::new(1));
///
/// assert_eq!(red5.value(), Some(5));
/// assert!(joker.is_wildcard());
/// assert!(Tile::numbered(TileId::new(2), Color::Red, 14).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    id: TileId,
    face: TileFace,
}

impl Tile {
    /// Create a numbered tile.
    ///
    /// Fails with [`TileError::MalformedTile`] if `value` is outside 1..=13;
    /// no tile is produced in that case.
    pub fn numbered(id: TileId, color: Color, value: u8) -> Result<Self, TileError> {
        if !(MIN_VALUE..=MAX_VALUE).contains(&value) {
            return Err(TileError::MalformedTile(value));
        }
        Ok(Self {
            id,
            face: TileFace::Number { color, value },
        })
    }

    /// Create a wildcard tile.
    #[must_use]
    pub const fn wildcard(id: TileId) -> Self {
        Self {
            id,
            face: TileFace::Wildcard,
        }
    }

    /// This tile's identity.
    #[must_use]
    pub const fn id(self) -> TileId {
        self.id
    }

    /// This tile's face.
    #[must_use]
    pub const fn face(self) -> TileFace {
        self.face
    }

    /// The color, or `None` for a wildcard.
    #[must_use]
    pub fn color(self) -> Option<Color> {
        match self.face {
            TileFace::Number { color, .. } => Some(color),
            TileFace::Wildcard => None,
        }
    }

    /// The face value, or `None` for a wildcard.
    #[must_use]
    pub fn value(self) -> Option<u8> {
        match self.face {
            TileFace::Number { value, .. } => Some(value),
            TileFace::Wildcard => None,
        }
    }

    /// Check if this is a wildcard.
    #[must_use]
    pub const fn is_wildcard(self) -> bool {
        matches!(self.face, TileFace::Wildcard)
    }

    /// Face value for scoring purposes. Wildcards contribute 0.
    #[must_use]
    pub fn score_value(self) -> u32 {
        self.value().map_or(0, u32::from)
    }

    /// Check if two tiles are interchangeable: both wildcards, or the same
    /// color and value. Ignores identity.
    #[must_use]
    pub fn same_face(self, other: Tile) -> bool {
        self.face == other.face
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.face {
            TileFace::Number { color, value } => write!(f, "{color} {value}"),
            TileFace::Wildcard => write!(f, "Wildcard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_tile_basics() {
        let tile = Tile::numbered(TileId::new(7), Color::Blue, 11).unwrap();

        assert_eq!(tile.id(), TileId::new(7));
        assert_eq!(tile.color(), Some(Color::Blue));
        assert_eq!(tile.value(), Some(11));
        assert!(!tile.is_wildcard());
        assert_eq!(tile.score_value(), 11);
    }

    #[test]
    fn test_wildcard_basics() {
        let tile = Tile::wildcard(TileId::new(0));

        assert_eq!(tile.color(), None);
        assert_eq!(tile.value(), None);
        assert!(tile.is_wildcard());
        assert_eq!(tile.score_value(), 0);
    }

    #[test]
    fn test_malformed_values_rejected() {
        assert_eq!(
            Tile::numbered(TileId::new(0), Color::Red, 0),
            Err(TileError::MalformedTile(0))
        );
        assert_eq!(
            Tile::numbered(TileId::new(0), Color::Red, 14),
            Err(TileError::MalformedTile(14))
        );
        assert!(Tile::numbered(TileId::new(0), Color::Red, 1).is_ok());
        assert!(Tile::numbered(TileId::new(0), Color::Red, 13).is_ok());
    }

    #[test]
    fn test_same_face_ignores_identity() {
        let a = Tile::numbered(TileId::new(1), Color::Red, 5).unwrap();
        let b = Tile::numbered(TileId::new(2), Color::Red, 5).unwrap();
        let c = Tile::numbered(TileId::new(3), Color::Blue, 5).unwrap();

        assert!(a.same_face(b));
        assert_ne!(a, b); // Different physical tiles
        assert!(!a.same_face(c));

        let w1 = Tile::wildcard(TileId::new(4));
        let w2 = Tile::wildcard(TileId::new(5));
        assert!(w1.same_face(w2));
        assert!(!w1.same_face(a));
    }

    #[test]
    fn test_display() {
        let tile = Tile::numbered(TileId::new(0), Color::Yellow, 3).unwrap();
        assert_eq!(format!("{tile}"), "Yellow 3");
        assert_eq!(format!("{}", Tile::wildcard(TileId::new(1))), "Wildcard");
    }

    #[test]
    fn test_serde_round_trip() {
        let tile = Tile::numbered(TileId::new(42), Color::Black, 13).unwrap();
        let json = serde_json::to_string(&tile).unwrap();
        let back: Tile = serde_json::from_str(&json).unwrap();
        assert_eq!(tile, back);
    }
}
