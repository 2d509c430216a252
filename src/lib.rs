//! Chess engine decision core: bitboard position, legal move generation,
//! static evaluation and a Lazy SMP alpha-beta search.
//!
//! ```
//! use ferrum_chess::engine::{Engine, SearchLimits};
//!
//! let mut engine = Engine::new();
//! engine.set_position("startpos", ["e2e4", "e7e5"]).unwrap();
//! let result = engine.search(SearchLimits::depth(3)).unwrap();
//! assert!(result.best_move.is_some());
//! ```

pub mod board;
pub mod engine;
pub mod eval;
pub mod sync;
pub mod tt;
pub mod zobrist;

pub use board::{Color, Move, Piece, Position, Square};
pub use engine::{Engine, EngineConfig, EngineError, SearchLimits};
pub use eval::{ClassicalEvaluator, Evaluator};
pub use tt::TranspositionTable;
