#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunable pruning and reduction parameters.
///
/// Depth limits are inclusive; margins are in centipawns per ply unless
/// noted otherwise.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchParams {
    /// Half-width of the first aspiration window
    pub aspiration_delta: i32,
    /// Windows wider than this fall back to a full-width search
    pub aspiration_max: i32,
    pub rfp_max_depth: i32,
    pub rfp_margin: i32,
    pub null_min_depth: i32,
    pub null_base_reduction: i32,
    /// Eval surplus over beta worth one extra ply of null-move reduction
    pub null_eval_divisor: i32,
    pub futility_max_depth: i32,
    pub futility_base: i32,
    pub futility_margin: i32,
    pub lmp_max_depth: i32,
    /// Captures below this SEE (times depth) are skipped at shallow depth
    pub see_capture_margin: i32,
    pub see_max_depth: i32,
    pub lmr_min_depth: i32,
    /// Quiet history points that cancel one ply of reduction
    pub lmr_history_divisor: i32,
    pub singular_min_depth: i32,
    /// The TT entry may be this many plies shallower than the node
    pub singular_tt_depth_margin: i32,
    pub singular_margin: i32,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            aspiration_delta: 30,
            aspiration_max: 1000,
            rfp_max_depth: 6,
            rfp_margin: 90,
            null_min_depth: 2,
            null_base_reduction: 3,
            null_eval_divisor: 200,
            futility_max_depth: 6,
            futility_base: 100,
            futility_margin: 110,
            lmp_max_depth: 6,
            see_capture_margin: 90,
            see_max_depth: 6,
            lmr_min_depth: 3,
            lmr_history_divisor: 5000,
            singular_min_depth: 8,
            singular_tt_depth_margin: 3,
            singular_margin: 2,
        }
    }
}
