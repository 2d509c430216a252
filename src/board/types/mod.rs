//! Core chess types.
//!
//! - `Piece`, `Color` and `ColoredPiece` - piece kinds, sides and square-array codes
//! - `Square` - board square (0-63, a1 = 0)
//! - `Bitboard` - 64-bit square set
//! - `Move` and `MoveList` - 16-bit move encoding and fixed-capacity lists
//! - `CastlingRights` - castling state

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::CastlingRights;
pub use moves::{Move, MoveKind, MoveList};
pub use piece::{Color, ColoredPiece, Piece};
pub use square::Square;

pub(crate) use castling::{castling_path, castling_rook_squares, king_home};
pub(crate) use moves::ScoredMoveList;
pub(crate) use piece::PROMOTION_PIECES;
