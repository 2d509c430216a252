//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening with aspiration windows
//! - Principal variation search with null move pruning, LMR and singular extensions
//! - Quiescence search with stand-pat and SEE filtering
//! - Move ordering (TT move, SEE-split captures, killers, counter move, histories)
//! - Shared lock-free transposition table
//! - Lazy SMP parallel search

mod constants;
mod history;
mod log;
mod move_order;
mod params;
pub mod smp;
mod stack;
mod worker;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Move;

pub use constants::{
    is_mate_score, mate_in, mated_in, DRAW, INFINITE, MATE, MAX_EVAL, MAX_PLY, MIN_MATE,
};
pub use log::{ScoreReport, SearchInfo, SearchInfoCallback};
pub use params::SearchParams;
pub use smp::{smp_search, SmpConfig};

/// Outcome of a finished search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchResult {
    /// `None` only when the side to move has no legal move
    pub best_move: Option<Move>,
    /// Expected reply to `best_move`
    pub ponder_move: Option<Move>,
    /// Score of the deepest completed iteration, side to move's view
    pub score: i32,
    /// Deepest completed iteration, 0 if none completed
    pub depth: u32,
    /// Nodes searched over all threads
    pub nodes: u64,
    pub pv: Vec<Move>,
}
