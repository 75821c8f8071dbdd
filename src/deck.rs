//! Deck construction and game setup.
//!
//! A standard set is two copies of every color/value tile plus two
//! wildcards: 106 tiles. [`GameBuilder`] produces a shuffled, dealt
//! [`GameState`] ready for the turn engine.

use crate::core::player::PlayerId;
use crate::core::rng::GameRng;
use crate::core::state::GameState;
use crate::core::tile::{Color, Tile, TileId, MAX_VALUE, MIN_VALUE};

/// Default number of copies of each color/value tile.
pub const STANDARD_COPIES: u8 = 2;

/// Default number of wildcards in the set.
pub const STANDARD_JOKERS: u8 = 2;

/// Default starting hand size.
pub const STANDARD_HAND_SIZE: usize = 14;

/// Build a full tile set with fresh sequential identities.
///
/// `copies` copies of every (color, value) pair, then `jokers` wildcards.
#[must_use]
pub fn standard_tiles(copies: u8, jokers: u8) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(
        usize::from(copies) * Color::ALL.len() * usize::from(MAX_VALUE) + usize::from(jokers),
    );
    let mut next_id = 0u32;

    for _ in 0..copies {
        for color in Color::ALL {
            for value in MIN_VALUE..=MAX_VALUE {
                let tile = Tile::numbered(TileId::new(next_id), color, value)
                    .expect("standard values are in range");
                tiles.push(tile);
                next_id += 1;
            }
        }
    }
    for _ in 0..jokers {
        tiles.push(Tile::wildcard(TileId::new(next_id)));
        next_id += 1;
    }

    tiles
}

/// Builder for a dealt, ready-to-play game.
///
/// ## Example
///
/// ```
/// use rummy_core::deck::GameBuilder;
///
/// let state = GameBuilder::new().player_count(3).build(42);
///
/// assert_eq!(state.player_count(), 3);
/// assert_eq!(state.draw_pile_len(), 106 - 3 * 14);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct GameBuilder {
    player_count: usize,
    hand_size: usize,
    copies: u8,
    jokers: u8,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self {
            player_count: 2,
            hand_size: STANDARD_HAND_SIZE,
            copies: STANDARD_COPIES,
            jokers: STANDARD_JOKERS,
        }
    }
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_count(mut self, count: usize) -> Self {
        assert!((2..=4).contains(&count), "Player count must be 2-4");
        self.player_count = count;
        self
    }

    pub fn hand_size(mut self, size: usize) -> Self {
        self.hand_size = size;
        self
    }

    pub fn copies(mut self, copies: u8) -> Self {
        assert!(copies >= 1, "Need at least one copy of each tile");
        self.copies = copies;
        self
    }

    pub fn jokers(mut self, jokers: u8) -> Self {
        self.jokers = jokers;
        self
    }

    /// Build the initial game state: shuffle, deal, player 0 to move.
    #[must_use]
    pub fn build(self, seed: u64) -> GameState {
        let mut tiles = standard_tiles(self.copies, self.jokers);
        assert!(
            tiles.len() >= self.player_count * self.hand_size,
            "Not enough tiles to deal {} hands of {}",
            self.player_count,
            self.hand_size
        );

        let mut state = GameState::new(self.player_count, seed);
        state.reserve_tile_ids(tiles.len() as u32);

        // Shuffle with the state's own RNG so the whole game replays
        // from one seed.
        let mut rng = GameRng::new(seed);
        rng.shuffle(&mut tiles);

        for player in PlayerId::all(self.player_count) {
            for _ in 0..self.hand_size {
                let tile = tiles.pop().expect("deal size checked above");
                state.add_to_hand(player, tile);
            }
        }
        state.set_draw_pile(tiles);
        state.rng = rng;

        state
    }
}
