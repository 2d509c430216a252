//! Loop-based ray walking, used to build the lookup tables and to cross-check them.

use crate::board::types::{Bitboard, Square};

pub(crate) const DIAGONAL: [(i32, i32); 2] = [(1, 1), (-1, -1)];
pub(crate) const ANTI_DIAGONAL: [(i32, i32); 2] = [(1, -1), (-1, 1)];
pub(crate) const RANK: [(i32, i32); 2] = [(0, 1), (0, -1)];

pub(crate) const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub(crate) const ROOK_DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub(crate) const QUEEN_DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Walk each `(rank, file)` direction from `sq`, stopping on the first occupied square.
pub(crate) fn sliding_attacks_slow(sq: Square, occ: Bitboard, directions: &[(i32, i32)]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &(dr, df) in directions {
        let mut rank = sq.rank() as i32 + dr;
        let mut file = sq.file() as i32 + df;
        while (0..8).contains(&rank) && (0..8).contains(&file) {
            let target = Square::from_index((rank * 8 + file) as usize);
            attacks |= Bitboard::from_square(target);
            if occ.contains(target) {
                break;
            }
            rank += dr;
            file += df;
        }
    }
    attacks
}
