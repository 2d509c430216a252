//! Chess board representation and game logic.
//!
//! Uses bitboards with kindergarten fill lookups for sliding pieces and a
//! stack of `BoardState` frames for make/unmake. Supports the full rules
//! including castling, en passant, promotions and draw detection.
//!
//! # Example
//! ```
//! use ferrum_chess::board::Position;
//!
//! let mut pos = Position::startpos();
//! let moves = pos.generate_legal();
//! println!("Starting position has {} legal moves", moves.len());
//! ```

mod attack_tables;
mod context;
mod error;
mod fen;
mod legality;
mod make_unmake;
mod movegen;
mod perft;
pub mod search;
mod see;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use attack_tables::AttackTables;
pub use context::BoardContext;
pub use error::{FenError, MoveParseError, SquareError};
pub use fen::START_FEN;
pub use movegen::GenType;
pub use see::SEE_VALUES;
pub use state::{BoardState, KingAttackInfo, Position};
pub use types::{
    Bitboard, BitboardIter, CastlingRights, Color, ColoredPiece, Move, MoveKind, MoveList, Piece,
    Square,
};

pub(crate) use types::ScoredMoveList;
