//! Turn engine: the per-turn state machine.
//!
//! One turn runs: obtain a proposal from the player's strategy, validate
//! it, commit or penalize, detect victory, advance the turn pointer. The
//! engine holds `&mut GameState` for the whole turn, so at most one turn
//! is ever in flight and the strategy call is the single designated
//! suspension point (a strategy bridging to human input may block there;
//! timeouts are the caller's obligation).
//!
//! Every validation failure is a data result ([`TurnOutcome::Rejected`]
//! plus the draw-3 penalty), never a fault: the game always continues
//! until a hand empties.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Board;
use crate::core::player::PlayerId;
use crate::core::state::GameState;
use crate::core::tile::{Tile, TileId};

/// Minimum face-value sum of the tiles claimed from hand in a player's
/// first committed play.
pub const OPENING_THRESHOLD: u32 = 30;

/// Tiles drawn as the penalty for an illegal proposal.
pub const PENALTY_DRAWS: usize = 3;

/// A player's proposed outcome for their turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Proposal {
    /// Take one tile from the draw pile.
    Draw,
    /// Replace the board and move the named tiles out of the hand.
    Play {
        /// The full replacement board (existing melds rearranged freely).
        board: Board,
        /// Tiles leaving the hand, identified exactly.
        tiles_from_hand: Vec<Tile>,
    },
}

/// Strategy capability: given a board snapshot and a view of the hand,
/// produce a turn proposal.
///
/// Implementations live with callers (greedy heuristics, lookahead,
/// human-input bridges); the core only consumes the trait. A `Play`
/// proposal must claim tiles genuinely present in the hand it was shown.
pub trait PlayerStrategy {
    /// Propose this turn's outcome. The board is an owned snapshot; the
    /// canonical board changes only if the engine commits the proposal.
    fn propose_turn(&mut self, board: Board, hand: &[Tile]) -> Proposal;
}

/// Reasons a `Play` proposal is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum IllegalProposal {
    /// The proposed board contains an invalid meld.
    #[error("proposed board contains an invalid meld")]
    InvalidBoard,
    /// A claimed tile is not in the player's hand.
    #[error("claimed tile {0:?} is not in the player's hand")]
    TileNotInHand(TileId),
    /// A play must move at least one tile out of the hand.
    #[error("a play must move at least one tile out of the hand")]
    EmptyPlay,
    /// The opening play did not reach the point threshold.
    #[error("opening play sums to {sum} points, below the threshold of {threshold}")]
    OpeningBelowThreshold { sum: u32, threshold: u32 },
}

/// Resolution of one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The player drew (or tried to; the pile may have been empty).
    Drew { from_pile: bool },
    /// The play committed; `winner` is set if it emptied the hand.
    Committed { winner: Option<PlayerId> },
    /// The play was rejected and the penalty applied.
    Rejected { reason: IllegalProposal },
    /// The game was already over; no proposal was requested.
    GameOver { winner: Option<PlayerId> },
}

/// The turn state machine.
///
/// Stateless apart from its configuration; all game state lives in
/// [`GameState`], of which the engine is the single writer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TurnEngine {
    /// Opening-meld point threshold.
    pub opening_threshold: u32,
    /// Penalty draw count for rejected proposals.
    pub penalty_draws: usize,
}

impl Default for TurnEngine {
    fn default() -> Self {
        Self {
            opening_threshold: OPENING_THRESHOLD,
            penalty_draws: PENALTY_DRAWS,
        }
    }
}

impl TurnEngine {
    /// Create an engine with the standard rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the opening threshold (house rules).
    #[must_use]
    pub fn with_opening_threshold(mut self, threshold: u32) -> Self {
        self.opening_threshold = threshold;
        self
    }

    /// Override the penalty draw count (house rules).
    #[must_use]
    pub fn with_penalty_draws(mut self, draws: usize) -> Self {
        self.penalty_draws = draws;
        self
    }

    /// Run one full turn for the current player.
    ///
    /// Obtains a proposal from `strategy` (handing it an owned board
    /// snapshot), resolves it, and advances the turn pointer unless the
    /// game ended.
    pub fn play_turn(
        &self,
        state: &mut GameState,
        strategy: &mut dyn PlayerStrategy,
    ) -> TurnOutcome {
        if state.is_terminal() {
            return TurnOutcome::GameOver {
                winner: state.winner(),
            };
        }

        let player = state.current_player();
        let snapshot = state.board().clone();
        let proposal = strategy.propose_turn(snapshot, state.hand(player));
        self.resolve(state, player, proposal)
    }

    /// Resolve an already-obtained proposal for `player`.
    ///
    /// Exposed for hosts that gather proposals out of band (e.g. over a
    /// network) and for tests.
    pub fn resolve(
        &self,
        state: &mut GameState,
        player: PlayerId,
        proposal: Proposal,
    ) -> TurnOutcome {
        if state.is_terminal() {
            return TurnOutcome::GameOver {
                winner: state.winner(),
            };
        }

        let outcome = match proposal {
            Proposal::Draw => {
                let from_pile = state.draw_tile(player).is_some();
                log::debug!("{player} drew (pile hit: {from_pile})");
                TurnOutcome::Drew { from_pile }
            }
            Proposal::Play {
                board,
                tiles_from_hand,
            } => match self.validate_play(state, player, &board, &tiles_from_hand) {
                Ok(()) => self.commit(state, player, board, &tiles_from_hand),
                Err(reason) => {
                    self.penalize(state, player);
                    log::debug!("{player} rejected: {reason}");
                    TurnOutcome::Rejected { reason }
                }
            },
        };

        if !state.is_terminal() {
            state.advance_turn();
        }
        outcome
    }

    /// Validate a play, failing closed on the first violation.
    ///
    /// Order matters and is part of the contract: board validity, then
    /// ownership, then non-empty play, then the opening threshold.
    fn validate_play(
        &self,
        state: &GameState,
        player: PlayerId,
        board: &Board,
        claimed: &[Tile],
    ) -> Result<(), IllegalProposal> {
        if !board.is_valid() {
            return Err(IllegalProposal::InvalidBoard);
        }

        // Ownership by identity. IDs are unique, so a set suffices, and
        // removing as we match also catches a tile claimed twice.
        let mut available: FxHashSet<TileId> =
            state.hand(player).iter().map(|t| t.id()).collect();
        for tile in claimed {
            if !available.remove(&tile.id()) {
                return Err(IllegalProposal::TileNotInHand(tile.id()));
            }
        }

        if claimed.is_empty() {
            return Err(IllegalProposal::EmptyPlay);
        }

        if !state.has_opened(player) {
            // Wildcards score 0 toward the opening threshold.
            let sum: u32 = claimed.iter().map(|t| t.score_value()).sum();
            if sum < self.opening_threshold {
                return Err(IllegalProposal::OpeningBelowThreshold {
                    sum,
                    threshold: self.opening_threshold,
                });
            }
        }

        Ok(())
    }

    fn commit(
        &self,
        state: &mut GameState,
        player: PlayerId,
        board: Board,
        claimed: &[Tile],
    ) -> TurnOutcome {
        if !state.has_opened(player) {
            state.set_opened(player);
        }

        state.replace_board(board);
        for tile in claimed {
            let removed = state.remove_from_hand(player, tile.id());
            debug_assert!(removed.is_some(), "validated tile vanished from hand");
        }

        if state.hand(player).is_empty() {
            state.declare_winner(player);
            log::info!("{player} wins");
            return TurnOutcome::Committed {
                winner: Some(player),
            };
        }

        log::debug!("{player} committed {} tiles", claimed.len());
        TurnOutcome::Committed { winner: None }
    }

    /// Draw-3 penalty; capped by whatever the pile still holds.
    fn penalize(&self, state: &mut GameState, player: PlayerId) {
        for _ in 0..self.penalty_draws {
            if state.draw_tile(player).is_none() {
                break;
            }
        }
    }
}
