//! Core value types and infrastructure: tiles, players, RNG, game state.

pub mod player;
pub mod rng;
pub mod state;
pub mod tile;

pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{GameSnapshot, GameState};
pub use tile::{Color, Tile, TileError, TileFace, TileId, MAX_VALUE, MIN_VALUE};
