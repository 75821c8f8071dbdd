//! Game state: the single source of truth for one running game.
//!
//! Holds the canonical board, the draw pile, every player's hand, the
//! turn pointer, per-player opening-meld flags, and the terminal
//! flag/winner. Mutated only through the turn engine's commit step (and
//! the setup code in `deck`); everything else works on snapshots.
//!
//! ## Snapshots
//!
//! [`GameState::snapshot`] captures the full state in a serializable
//! [`GameSnapshot`]; the encoding (JSON, binary, ...) is the host's
//! choice. [`GameState::fork`] clones the state with an independent RNG
//! branch for what-if simulation.

use serde::{Deserialize, Serialize};

use super::player::{PlayerId, PlayerMap};
use super::rng::{GameRng, GameRngState};
use super::tile::{Tile, TileId};
use crate::board::Board;

/// Complete in-memory state of one game.
#[derive(Debug)]
pub struct GameState {
    board: Board,
    /// Face-down tiles; the top of the pile is the end of the vec.
    draw_pile: Vec<Tile>,
    hands: PlayerMap<Vec<Tile>>,
    current_player: PlayerId,
    /// Set permanently once a player's opening play commits.
    opened: PlayerMap<bool>,
    terminal: bool,
    winner: Option<PlayerId>,
    /// Deterministic RNG (deck shuffle, simulation forks).
    pub rng: GameRng,
    next_tile_id: u32,
}

impl GameState {
    /// Create an empty game state: no tiles anywhere, player 0 to move.
    ///
    /// Use `deck::GameBuilder` for a dealt, ready-to-play state.
    #[must_use]
    pub fn new(player_count: usize, seed: u64) -> Self {
        Self {
            board: Board::new(),
            draw_pile: Vec::new(),
            hands: PlayerMap::with_default(player_count),
            current_player: PlayerId::new(0),
            opened: PlayerMap::with_value(player_count, false),
            terminal: false,
            winner: None,
            rng: GameRng::new(seed),
            next_tile_id: 0,
        }
    }

    /// Get player count.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.hands.player_count()
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    /// Advance the turn pointer to the next player.
    pub fn advance_turn(&mut self) {
        self.current_player = self.current_player.next(self.player_count());
    }

    // === Board ===

    /// The canonical board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Replace the canonical board. Called only by the turn engine's
    /// commit step.
    pub fn replace_board(&mut self, board: Board) {
        self.board = board;
    }

    // === Hands ===

    /// A player's hand.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[Tile] {
        &self.hands[player]
    }

    /// Add a tile to a player's hand.
    pub fn add_to_hand(&mut self, player: PlayerId, tile: Tile) {
        self.hands[player].push(tile);
    }

    /// Remove a tile from a player's hand by identity.
    ///
    /// Returns the tile if it was present.
    pub fn remove_from_hand(&mut self, player: PlayerId, id: TileId) -> Option<Tile> {
        let hand = &mut self.hands[player];
        let pos = hand.iter().position(|t| t.id() == id)?;
        Some(hand.remove(pos))
    }

    // === Draw pile ===

    /// Set the draw pile (setup only). The end of the vec is the top.
    pub fn set_draw_pile(&mut self, pile: Vec<Tile>) {
        self.draw_pile = pile;
    }

    /// Tiles left in the draw pile.
    #[must_use]
    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    /// Pop the top tile of the pile into a player's hand.
    ///
    /// Returns the drawn tile, or `None` if the pile is empty (a no-op).
    pub fn draw_tile(&mut self, player: PlayerId) -> Option<Tile> {
        let tile = self.draw_pile.pop()?;
        self.hands[player].push(tile);
        Some(tile)
    }

    // === Opening meld ===

    /// Check if a player has completed their opening meld.
    #[must_use]
    pub fn has_opened(&self, player: PlayerId) -> bool {
        self.opened[player]
    }

    /// Mark a player's opening meld as completed. Permanent.
    pub fn set_opened(&mut self, player: PlayerId) {
        self.opened[player] = true;
    }

    // === Terminal state ===

    /// Check if the game is over.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// The winner, if the game is over.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// End the game with a winner.
    pub fn declare_winner(&mut self, player: PlayerId) {
        self.terminal = true;
        self.winner = Some(player);
    }

    // === Tile identity ===

    /// Reserve a fresh tile identity.
    ///
    /// Used at deck-build time, and by hosts that mint simulation-only
    /// tiles; gameplay itself never creates tiles.
    pub fn alloc_tile_id(&mut self) -> TileId {
        let id = TileId::new(self.next_tile_id);
        self.next_tile_id += 1;
        id
    }

    /// Bump the allocator past externally assigned IDs (setup only).
    pub fn reserve_tile_ids(&mut self, count: u32) {
        self.next_tile_id = self.next_tile_id.max(count);
    }

    // === Cloning and snapshots ===

    /// Clone the state for what-if simulation.
    ///
    /// Tiles keep their identities; the RNG is forked so the simulation
    /// branch draws an independent stream. Takes `&mut self` because
    /// forking advances the fork counter.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        Self {
            board: self.board.clone(),
            draw_pile: self.draw_pile.clone(),
            hands: self.hands.clone(),
            current_player: self.current_player,
            opened: self.opened.clone(),
            terminal: self.terminal,
            winner: self.winner,
            rng: self.rng.fork(),
            next_tile_id: self.next_tile_id,
        }
    }

    /// Capture the full state as a serializable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.clone(),
            draw_pile: self.draw_pile.clone(),
            hands: self.hands.clone(),
            current_player: self.current_player,
            opened: self.opened.clone(),
            terminal: self.terminal,
            winner: self.winner,
            rng: self.rng.state(),
            next_tile_id: self.next_tile_id,
        }
    }

    /// Rebuild a state from a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: GameSnapshot) -> Self {
        Self {
            board: snapshot.board,
            draw_pile: snapshot.draw_pile,
            hands: snapshot.hands,
            current_player: snapshot.current_player,
            opened: snapshot.opened,
            terminal: snapshot.terminal,
            winner: snapshot.winner,
            rng: GameRng::from_state(&snapshot.rng),
            next_tile_id: snapshot.next_tile_id,
        }
    }
}

/// Serializable capture of a full game state.
///
/// The shape hosts persist or ship over the wire; the encoding is a
/// deployment choice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub board: Board,
    pub draw_pile: Vec<Tile>,
    pub hands: PlayerMap<Vec<Tile>>,
    pub current_player: PlayerId,
    pub opened: PlayerMap<bool>,
    pub terminal: bool,
    pub winner: Option<PlayerId>,
    pub rng: GameRngState,
    pub next_tile_id: u32,
}
