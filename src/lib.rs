//! # rummy-core
//!
//! A rule engine for a Rummikub-style tile game: players hold colored,
//! numbered tiles (plus wildcards) and each turn either draw or rearrange
//! the shared board into valid melds, moving tiles out of their hand.
//!
//! ## Design Principles
//!
//! 1. **Derived validity**: a meld's kind (Group/Run/Invalid) is computed
//!    from its tiles, never stored, so board state can't go stale.
//!
//! 2. **Value-semantics boards**: everyone who asks "what if" gets an
//!    owned snapshot (`im`-backed, O(1) clone); only the turn engine's
//!    commit step writes the canonical board.
//!
//! 3. **Bounded search**: the exact-cover solver always carries a node
//!    budget and reports "budget exceeded" separately from "proven
//!    impossible".
//!
//! 4. **Failures are data**: illegal proposals never raise; they resolve
//!    to a rejection plus the draw-3 penalty and the game continues.
//!
//! ## Modules
//!
//! - `core`: tiles, player IDs, deterministic RNG, game state, snapshots
//! - `meld`: meld classification (the Group/Run validity algorithms)
//! - `board`: the shared table
//! - `solver`: exact-cover partition search with a mandatory budget
//! - `engine`: the turn state machine and the strategy trait
//! - `deck`: standard tile set construction and game setup

pub mod board;
pub mod core;
pub mod deck;
pub mod engine;
pub mod meld;
pub mod solver;

// Re-export commonly used types
pub use crate::core::{
    Color, GameRng, GameRngState, GameSnapshot, GameState, PlayerId, PlayerMap, Tile, TileError,
    TileFace, TileId, MAX_VALUE, MIN_VALUE,
};

pub use crate::board::Board;

pub use crate::meld::{Meld, MeldKind};

pub use crate::solver::{solve, solve_with_report, SearchBudget, SolveOutcome, SolveReport};

pub use crate::engine::{
    IllegalProposal, PlayerStrategy, Proposal, TurnEngine, TurnOutcome, OPENING_THRESHOLD,
    PENALTY_DRAWS,
};

pub use crate::deck::{standard_tiles, GameBuilder};
