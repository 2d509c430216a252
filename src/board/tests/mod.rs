//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Move generator node counts on standard positions
//! - `draw.rs` - Fifty-move rule and repetition detection
//! - `make_unmake.rs` - Apply/undo exactness and incremental hashing
//! - `edge_cases.rs` - Pins, checks, promotions and other special positions
//! - `proptest.rs` - Property-based tests over random games

mod make_unmake;
mod perft;
mod proptest;

use crate::board::{Move, Piece, Position, Square};

/// The legal move `from`-`to` (with optional promotion); panics when absent.
pub(super) fn find_move(pos: &mut Position, from: &str, to: &str, promotion: Option<Piece>) -> Move {
    let from: Square = from.parse().expect("valid square");
    let to: Square = to.parse().expect("valid square");
    pos.generate_legal()
        .iter()
        .copied()
        .find(|m| m.from() == from && m.to() == to && m.promotion_piece() == promotion)
        .expect("Expected move not found")
}
