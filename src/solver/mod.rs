//! Exact-cover partition search.
//!
//! Given a flat multiset of tiles, find *some* partition of all of them
//! into valid melds, or report that none exists. This is the engine's
//! hardest problem: move validation re-checks proposed boards with it, and
//! strategies call it to discover whether a candidate tile set is fully
//! playable.
//!
//! ## Algorithm
//!
//! Deterministic backtracking over a canonically sorted pool:
//!
//! 1. Sort tiles (value ascending, then color, wildcards last). The first
//!    remaining tile is the *anchor*; since melds are disjoint, the anchor
//!    must appear in exactly one meld of any solution, so enumerating the
//!    melds that contain it covers the whole search space.
//! 2. Enumerate group candidates (anchor + every 2- or 3-combination of
//!    same-value-or-wildcard tiles), then run candidates (forward
//!    extension from the anchor's value, one representative per
//!    interchangeable tile type at each step).
//! 3. Remove a candidate's tiles, recurse on the remainder; first success
//!    wins.
//!
//! Branching is bounded by the number of *distinct tile types* in the
//! pool, not the raw tile count, but the worst case is still exponential.
//! Every search therefore carries a mandatory node budget; exhausting it
//! yields [`SolveOutcome::BudgetExceeded`], which callers must never
//! conflate with a proven [`SolveOutcome::NoPartition`].
//!
//! The solver is a pure function of its input: no I/O, no shared state,
//! safe to run concurrently on independent snapshots.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::tile::{Tile, MAX_VALUE};
use crate::meld::{Meld, MeldKind};

/// Node budget for one search.
///
/// A node is one partition step or one run-extension step. The default is
/// generous for realistic pools (a full two-deck game is 106 tiles) while
/// still bounding adversarial inputs.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SearchBudget {
    /// Maximum search nodes before the search aborts.
    pub max_nodes: u64,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_nodes: 2_000_000,
        }
    }
}

impl SearchBudget {
    /// Create a budget with a custom node limit.
    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: u64) -> Self {
        self.max_nodes = max_nodes;
        self
    }
}

/// Result of a partition search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveOutcome {
    /// A full partition was found; the melds' tiles are exactly the input.
    Solved(Vec<Meld>),
    /// Proven: no partition of these tiles into valid melds exists.
    NoPartition,
    /// The search ran out of budget. Unknown, not a proven negative.
    BudgetExceeded,
}

impl SolveOutcome {
    /// Check if a partition was found.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved(_))
    }

    /// The melds of a successful search.
    #[must_use]
    pub fn melds(&self) -> Option<&[Meld]> {
        match self {
            SolveOutcome::Solved(melds) => Some(melds),
            _ => None,
        }
    }
}

/// Search outcome plus metering for budget-sensitive callers.
#[derive(Clone, Debug)]
pub struct SolveReport {
    /// The search outcome.
    pub outcome: SolveOutcome,
    /// Nodes visited before returning.
    pub nodes_visited: u64,
}

/// Find a partition of `tiles` into valid melds.
///
/// Every tile is used exactly once. `solve(&[], ..)` succeeds with an
/// empty partition; any nonzero pool smaller than 3 can never be covered.
///
/// ## Example
///
/// ```
/// use rummy_core::core::{Color, Tile, TileId};
/// use rummy_core::solver::{solve, SearchBudget};
///
/// let tiles = vec![
///     Tile::numbered(TileId::new(0), Color::Red, 5).unwrap(),
///     Tile::numbered(TileId::new(1), Color::Red, 6).unwrap(),
///     Tile::numbered(TileId::new(2), Color::Red, 7).unwrap(),
/// ];
///
/// let outcome = solve(&tiles, &SearchBudget::default());
/// assert_eq!(outcome.melds().unwrap().len(), 1);
/// ```
#[must_use]
pub fn solve(tiles: &[Tile], budget: &SearchBudget) -> SolveOutcome {
    solve_with_report(tiles, budget).outcome
}

/// Like [`solve`], also reporting how many nodes the search visited.
#[must_use]
pub fn solve_with_report(tiles: &[Tile], budget: &SearchBudget) -> SolveReport {
    if tiles.is_empty() {
        return SolveReport {
            outcome: SolveOutcome::Solved(Vec::new()),
            nodes_visited: 0,
        };
    }
    if tiles.len() < 3 {
        return SolveReport {
            outcome: SolveOutcome::NoPartition,
            nodes_visited: 0,
        };
    }

    let mut pool = tiles.to_vec();
    pool.sort_unstable_by_key(canonical_key);

    let mut meter = NodeMeter {
        limit: budget.max_nodes,
        used: 0,
    };

    let outcome = match partition(&pool, &mut meter) {
        Search::Found(melds) => SolveOutcome::Solved(melds),
        Search::Exhausted => SolveOutcome::NoPartition,
        Search::OutOfBudget => SolveOutcome::BudgetExceeded,
    };

    SolveReport {
        outcome,
        nodes_visited: meter.used,
    }
}

/// Canonical pool order: wildcards last, then value, color, identity.
///
/// Fixes branch order and guarantees the anchor is the smallest remaining
/// tile, which makes the wildcard-anchor terminal case sound (a wildcard
/// anchor means only wildcards remain).
fn canonical_key(tile: &Tile) -> (bool, u8, u8, u32) {
    (
        tile.is_wildcard(),
        tile.value().unwrap_or(0),
        tile.color().map_or(0, |c| c.index()),
        tile.id().0,
    )
}

struct NodeMeter {
    limit: u64,
    used: u64,
}

impl NodeMeter {
    /// Account for one node. False means the budget is spent.
    fn tick(&mut self) -> bool {
        self.used += 1;
        self.used <= self.limit
    }
}

enum Search {
    Found(Vec<Meld>),
    Exhausted,
    OutOfBudget,
}

/// Candidate meld as indices into the current pool (anchor included).
type Candidate = SmallVec<[usize; 5]>;

fn partition(pool: &[Tile], meter: &mut NodeMeter) -> Search {
    if !meter.tick() {
        return Search::OutOfBudget;
    }
    if pool.is_empty() {
        return Search::Found(Vec::new());
    }
    if pool.len() < 3 {
        return Search::Exhausted;
    }

    let anchor = pool[0];

    // Canonical order puts wildcards last, so a wildcard anchor means the
    // whole remainder is wildcards: fold them into one terminal meld
    // instead of branching over fully interchangeable tiles.
    if anchor.is_wildcard() {
        return Search::Found(vec![Meld::new(pool.iter().copied())]);
    }

    let mut candidates: Vec<Candidate> = Vec::new();
    group_candidates(pool, &mut candidates);
    if !run_candidates(pool, &mut candidates, meter) {
        return Search::OutOfBudget;
    }

    for candidate in &candidates {
        let meld = Meld::new(candidate.iter().map(|&i| pool[i]));
        debug_assert!(meld.is_valid());

        let mut taken = vec![false; pool.len()];
        for &i in candidate {
            taken[i] = true;
        }
        let rest: Vec<Tile> = pool
            .iter()
            .enumerate()
            .filter(|(i, _)| !taken[*i])
            .map(|(_, t)| *t)
            .collect();

        match partition(&rest, meter) {
            Search::Found(mut melds) => {
                melds.insert(0, meld);
                return Search::Found(melds);
            }
            Search::OutOfBudget => return Search::OutOfBudget,
            Search::Exhausted => {}
        }
    }

    // The anchor belongs to no viable meld in this branch.
    Search::Exhausted
}

/// Enumerate group candidates containing the anchor: every 2- or
/// 3-combination of same-value-or-wildcard pool tiles that passes group
/// validity together with the anchor.
fn group_candidates(pool: &[Tile], out: &mut Vec<Candidate>) {
    let anchor = pool[0];
    let anchor_value = anchor.value();

    let mates: Vec<usize> = (1..pool.len())
        .filter(|&i| pool[i].is_wildcard() || pool[i].value() == anchor_value)
        .collect();

    let mut push_if_group = |indices: Candidate, out: &mut Vec<Candidate>| {
        let meld = Meld::new(indices.iter().map(|&i| pool[i]));
        if meld.classify() == MeldKind::Group {
            out.push(indices);
        }
    };

    for (a, &i) in mates.iter().enumerate() {
        for (b, &j) in mates.iter().enumerate().skip(a + 1) {
            push_if_group(SmallVec::from_slice(&[0, i, j]), out);
            for &k in mates.iter().skip(b + 1) {
                push_if_group(SmallVec::from_slice(&[0, i, j, k]), out);
            }
        }
    }
}

/// Enumerate run candidates starting at the anchor, extending forward one
/// value at a time. At each step only one representative per
/// interchangeable tile type (concrete next-value tile, or wildcard) is
/// tried, pruning branches that differ only by tile identity. Every prefix
/// of length >= 3 is recorded.
///
/// Returns false if the node budget ran out mid-enumeration.
fn run_candidates(pool: &[Tile], out: &mut Vec<Candidate>, meter: &mut NodeMeter) -> bool {
    let anchor = pool[0];
    let color = match anchor.color() {
        Some(c) => c,
        None => return true, // Wildcard anchors are handled terminally
    };
    let anchor_value = anchor.value().expect("numbered anchor");

    let mates: Vec<usize> = (1..pool.len())
        .filter(|&i| pool[i].is_wildcard() || pool[i].color() == Some(color))
        .collect();

    let mut used = vec![false; mates.len()];
    let mut seq: Candidate = SmallVec::from_slice(&[0]);

    extend_run(
        pool,
        &mates,
        &mut used,
        &mut seq,
        anchor_value.saturating_add(1),
        out,
        meter,
    )
}

#[allow(clippy::too_many_arguments)]
fn extend_run(
    pool: &[Tile],
    mates: &[usize],
    used: &mut [bool],
    seq: &mut Candidate,
    next_value: u8,
    out: &mut Vec<Candidate>,
    meter: &mut NodeMeter,
) -> bool {
    if !meter.tick() {
        return false;
    }

    if seq.len() >= 3 {
        out.push(seq.clone());
    }

    // A run never leaves 1..=13
    if next_value > MAX_VALUE || seq.len() >= usize::from(MAX_VALUE) {
        return true;
    }

    let mut tried_concrete = false;
    let mut tried_wild = false;

    for (slot, &idx) in mates.iter().enumerate() {
        if used[slot] {
            continue;
        }
        let tile = pool[idx];

        let pick = if tile.is_wildcard() {
            !std::mem::replace(&mut tried_wild, true)
        } else if tile.value() == Some(next_value) {
            !std::mem::replace(&mut tried_concrete, true)
        } else {
            false
        };

        if pick {
            used[slot] = true;
            seq.push(idx);
            let within_budget =
                extend_run(pool, mates, used, seq, next_value + 1, out, meter);
            seq.pop();
            used[slot] = false;
            if !within_budget {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tile::{Color, TileId};

    fn tile(id: u32, color: Color, value: u8) -> Tile {
        Tile::numbered(TileId::new(id), color, value).unwrap()
    }

    fn wild(id: u32) -> Tile {
        Tile::wildcard(TileId::new(id))
    }

    fn budget() -> SearchBudget {
        SearchBudget::default()
    }

    #[test]
    fn test_empty_pool_is_empty_partition() {
        assert_eq!(solve(&[], &budget()), SolveOutcome::Solved(Vec::new()));
    }

    #[test]
    fn test_pool_smaller_than_meld_fails() {
        let tiles = vec![tile(0, Color::Red, 5), tile(1, Color::Red, 6)];
        assert_eq!(solve(&tiles, &budget()), SolveOutcome::NoPartition);
        assert_eq!(
            solve(&[tile(0, Color::Red, 5)], &budget()),
            SolveOutcome::NoPartition
        );
    }

    #[test]
    fn test_single_run() {
        let tiles = vec![
            tile(0, Color::Red, 5),
            tile(1, Color::Red, 6),
            tile(2, Color::Red, 7),
        ];
        let melds = match solve(&tiles, &budget()) {
            SolveOutcome::Solved(melds) => melds,
            other => panic!("expected solution, got {other:?}"),
        };
        assert_eq!(melds.len(), 1);
        assert_eq!(melds[0].classify(), MeldKind::Run);
        assert_eq!(melds[0].len(), 3);
    }

    #[test]
    fn test_single_group() {
        let tiles = vec![
            tile(0, Color::Red, 5),
            tile(1, Color::Blue, 5),
            tile(2, Color::Black, 5),
        ];
        let melds = solve(&tiles, &budget());
        let melds = melds.melds().expect("solvable");
        assert_eq!(melds.len(), 1);
        assert_eq!(melds[0].classify(), MeldKind::Group);
    }

    #[test]
    fn test_wildcard_fills_run_gap() {
        let tiles = vec![tile(0, Color::Red, 5), tile(1, Color::Red, 7), wild(2)];
        let outcome = solve(&tiles, &budget());
        let melds = outcome.melds().expect("solvable");
        assert_eq!(melds.len(), 1);
        assert!(melds[0].is_valid());
        assert_eq!(melds[0].len(), 3);
    }

    #[test]
    fn test_unsolvable_mixed_pool() {
        let tiles = vec![
            tile(0, Color::Red, 1),
            tile(1, Color::Blue, 5),
            tile(2, Color::Yellow, 9),
        ];
        assert_eq!(solve(&tiles, &budget()), SolveOutcome::NoPartition);
    }

    #[test]
    fn test_two_meld_partition() {
        let tiles = vec![
            tile(0, Color::Red, 5),
            tile(1, Color::Blue, 5),
            tile(2, Color::Black, 5),
            tile(3, Color::Yellow, 1),
            tile(4, Color::Yellow, 2),
            tile(5, Color::Yellow, 3),
        ];
        let outcome = solve(&tiles, &budget());
        let melds = outcome.melds().expect("solvable");
        assert_eq!(melds.len(), 2);
        assert!(melds.iter().all(Meld::is_valid));
    }

    #[test]
    fn test_anchor_must_choose_the_right_meld() {
        // Red 5 could start a run 5-6-7, but the 6 and 7 are needed
        // nowhere else; the group reading strands them. The search must
        // backtrack through candidate orderings to cover everything.
        let tiles = vec![
            tile(0, Color::Red, 5),
            tile(1, Color::Blue, 5),
            tile(2, Color::Black, 5),
            tile(3, Color::Red, 6),
            tile(4, Color::Red, 7),
            tile(5, Color::Blue, 6),
            tile(6, Color::Black, 6),
            tile(7, Color::Blue, 7),
            tile(8, Color::Black, 7),
        ];
        let outcome = solve(&tiles, &budget());
        let melds = outcome.melds().expect("solvable");
        let total: usize = melds.iter().map(Meld::len).sum();
        assert_eq!(total, 9);
        assert!(melds.iter().all(Meld::is_valid));
    }

    #[test]
    fn test_all_wildcards_fold_into_one_meld() {
        let tiles = vec![wild(0), wild(1), wild(2)];
        let outcome = solve(&tiles, &budget());
        let melds = outcome.melds().expect("solvable");
        assert_eq!(melds.len(), 1);
        assert_eq!(melds[0].len(), 3);
    }

    #[test]
    fn test_two_wildcards_alone_fail() {
        let tiles = vec![
            tile(0, Color::Red, 1),
            tile(1, Color::Red, 2),
            tile(2, Color::Red, 3),
            wild(3),
            wild(4),
        ];
        // The run absorbs the wildcards or they strand; either way a full
        // cover exists (run of 5). Shrink to force stranding:
        let outcome = solve(&tiles, &budget());
        assert!(outcome.is_solved());

        let stranded = vec![tile(0, Color::Red, 1), wild(1), wild(2), wild(3), wild(4)];
        // 1 + four wildcards is a 5-tile run (1-2-3-4-5 with 4 wildcards)
        assert!(solve(&stranded, &budget()).is_solved());
    }

    #[test]
    fn test_budget_exceeded_is_distinct() {
        let tiles = vec![
            tile(0, Color::Red, 5),
            tile(1, Color::Red, 6),
            tile(2, Color::Red, 7),
        ];
        let starved = SearchBudget::default().with_max_nodes(1);
        assert_eq!(solve(&tiles, &starved), SolveOutcome::BudgetExceeded);
    }

    #[test]
    fn test_report_counts_nodes() {
        let tiles = vec![
            tile(0, Color::Red, 5),
            tile(1, Color::Red, 6),
            tile(2, Color::Red, 7),
        ];
        let report = solve_with_report(&tiles, &budget());
        assert!(report.outcome.is_solved());
        assert!(report.nodes_visited > 0);
    }

    #[test]
    fn test_solution_preserves_multiset() {
        let tiles = vec![
            tile(0, Color::Red, 3),
            tile(1, Color::Red, 4),
            tile(2, Color::Red, 5),
            tile(3, Color::Red, 3), // Second deck copy, same face
            tile(4, Color::Blue, 3),
            tile(5, Color::Yellow, 3),
        ];
        let outcome = solve(&tiles, &budget());
        let melds = outcome.melds().expect("solvable");

        let mut covered: Vec<TileId> = melds
            .iter()
            .flat_map(|m| m.tiles().iter().map(|t| t.id()))
            .collect();
        covered.sort_unstable();
        let mut input: Vec<TileId> = tiles.iter().map(|t| t.id()).collect();
        input.sort_unstable();
        assert_eq!(covered, input);
    }

    #[test]
    fn test_solve_is_idempotent_on_its_output() {
        let tiles = vec![
            tile(0, Color::Red, 5),
            tile(1, Color::Blue, 5),
            tile(2, Color::Black, 5),
            tile(3, Color::Yellow, 11),
            tile(4, Color::Yellow, 12),
            tile(5, Color::Yellow, 13),
        ];
        let first = solve(&tiles, &budget());
        let flattened: Vec<Tile> = first
            .melds()
            .expect("solvable")
            .iter()
            .flat_map(|m| m.tiles().iter().copied())
            .collect();
        assert!(solve(&flattened, &budget()).is_solved());
    }
}
