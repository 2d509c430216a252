//! Static evaluation.
//!
//! The search only sees the [`Evaluator`] trait; which implementation backs
//! it is chosen once when the engine is built and shared by every thread.

mod classical;

pub use classical::ClassicalEvaluator;

use crate::board::Position;

pub use crate::board::search::MAX_EVAL;

/// Material values in centipawns, indexed by `Piece::index()` (king 0)
pub const PIECE_VALUES: [i32; 6] = [100, 325, 350, 550, 1000, 0];

/// Position scoring used at static-eval points of the search.
///
/// Implementations must be pure: the same position always yields the same
/// score. Scores are centipawns from the side to move's point of view and
/// lie within `[-MAX_EVAL, MAX_EVAL]`.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, pos: &Position) -> i32;

    /// Short identifier for logs.
    fn name(&self) -> &str;
}
