//! Score bounds and fixed search constants.

// ============================================================================
// SCORES
// ============================================================================

/// Deepest ply any search line may reach
pub const MAX_PLY: usize = 256;

/// Score of delivering mate at the root
pub const MATE: i32 = 32000;

/// Bound wider than any real score
pub const INFINITE: i32 = MATE + 1;

/// Sentinel returned up the tree once the stop flag is raised
pub const STOP_SCORE: i32 = MATE + 2;

/// Scores with absolute value >= this are mate scores
pub const MIN_MATE: i32 = MATE - MAX_PLY as i32;

pub const DRAW: i32 = 0;

/// Static evaluations are clamped into `[-MAX_EVAL, MAX_EVAL]`
pub const MAX_EVAL: i32 = 30000;

// ============================================================================
// SEARCH CONTROL
// ============================================================================

/// Nodes between two clock and node-limit polls
pub const NODE_CHECK_INTERVAL: u64 = 1024;

/// TT cutoffs are skipped from this fifty-move count on
pub const TT_FIFTY_MOVE_GUARD: u32 = 90;

/// Quiescence keeps captures whose exchange loses at most a knight for a bishop
pub const QSEARCH_SEE_THRESHOLD: i32 = -25;

/// LMR / LMP tables cover depths and move counts below this
pub const REDUCTION_TABLE_SIZE: usize = 64;

#[inline]
#[must_use]
pub const fn mate_in(ply: usize) -> i32 {
    MATE - ply as i32
}

#[inline]
#[must_use]
pub const fn mated_in(ply: usize) -> i32 {
    -MATE + ply as i32
}

#[inline]
#[must_use]
pub const fn is_mate_score(score: i32) -> bool {
    score.abs() >= MIN_MATE && score.abs() <= MATE
}
