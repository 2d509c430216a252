//! Table construction for leapers, line masks and the kindergarten fill lookups.

#![allow(clippy::needless_range_loop)] // Index loops are clearer for board coordinates

use super::attacks::{sliding_attacks_slow, BISHOP_DIRECTIONS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS};
use crate::board::types::{Bitboard, Color, Square};

const KNIGHT_OFFSETS: [i32; 8] = [-17, -15, -10, -6, 6, 10, 15, 17];
const KING_OFFSETS: [i32; 8] = [-9, -8, -7, -1, 1, 7, 8, 9];

/// Attack set for offset-enumerated leapers; `max_distance` rejects edge wraps.
fn leaper_table(offsets: &[i32], max_distance: usize) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    for sq in 0..64 {
        let from = Square::from_index(sq);
        for &offset in offsets {
            let target = sq as i32 + offset;
            if !(0..64).contains(&target) {
                continue;
            }
            let to = Square::from_index(target as usize);
            if from.distance(to) <= max_distance {
                table[sq] |= Bitboard::from_square(to);
            }
        }
    }
    table
}

pub(super) fn knight_table() -> [Bitboard; 64] {
    leaper_table(&KNIGHT_OFFSETS, 2)
}

pub(super) fn king_table() -> [Bitboard; 64] {
    leaper_table(&KING_OFFSETS, 1)
}

pub(super) fn pawn_table() -> [[Bitboard; 64]; 2] {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    for sq in 0..64 {
        let bb = Bitboard::from_square(Square::from_index(sq));
        table[Color::White.index()][sq] = bb.shift_north().shift_east() | bb.shift_north().shift_west();
        table[Color::Black.index()][sq] = bb.shift_south().shift_east() | bb.shift_south().shift_west();
    }
    table
}

/// Line through each square along one direction pair, the square itself excluded.
pub(super) fn line_masks(directions: [(i32, i32); 2]) -> [Bitboard; 64] {
    let mut masks = [Bitboard::EMPTY; 64];
    for sq in 0..64 {
        masks[sq] = sliding_attacks_slow(Square::from_index(sq), Bitboard::EMPTY, &directions);
    }
    masks
}

pub(super) fn empty_board_attacks(bishop: bool) -> [Bitboard; 64] {
    let directions: &[(i32, i32)] = if bishop {
        &BISHOP_DIRECTIONS
    } else {
        &ROOK_DIRECTIONS
    };
    let mut table = [Bitboard::EMPTY; 64];
    for sq in 0..64 {
        table[sq] = sliding_attacks_slow(Square::from_index(sq), Bitboard::EMPTY, directions);
    }
    table
}

/// Squares strictly between two aligned squares, empty when not aligned.
pub(super) fn between_table() -> Box<[[Bitboard; 64]]> {
    let mut table = vec![[Bitboard::EMPTY; 64]; 64].into_boxed_slice();
    for from in 0..64 {
        let start = Square::from_index(from);
        for (dr, df) in QUEEN_DIRECTIONS {
            let mut path = Bitboard::EMPTY;
            let mut rank = start.rank() as i32 + dr;
            let mut file = start.file() as i32 + df;
            while (0..8).contains(&rank) && (0..8).contains(&file) {
                let idx = (rank * 8 + file) as usize;
                table[from][idx] = path;
                path |= Bitboard::from_square(Square::from_index(idx));
                rank += dr;
                file += df;
            }
        }
    }
    table
}

/// Attacks along the first rank for a slider on `file`, given the six inner
/// occupancy bits (files b-g) in `inner`.
fn first_rank_attacks(file: usize, inner: usize) -> u8 {
    let occ = ((inner << 1) as u8) & !(1u8 << file);
    let mut attacks = 0u8;
    for f in (0..file).rev() {
        attacks |= 1 << f;
        if occ & (1 << f) != 0 {
            break;
        }
    }
    for f in file + 1..8 {
        attacks |= 1 << f;
        if occ & (1 << f) != 0 {
            break;
        }
    }
    attacks
}

/// First-rank attacks replicated onto every rank, indexed `[file][inner]`.
pub(super) fn fill_up_table() -> [[u64; 64]; 8] {
    let mut table = [[0u64; 64]; 8];
    for file in 0..8 {
        for inner in 0..64 {
            table[file][inner] = Bitboard::FILE_A.0.wrapping_mul(u64::from(first_rank_attacks(file, inner)));
        }
    }
    table
}

/// File-a attacks indexed `[rank][inner]`. The c2-h7 multiplier reverses rank
/// order in the index, so rank `r` is looked up as first-rank file `7 - r`.
pub(super) fn a_file_table() -> [[u64; 64]; 8] {
    let mut table = [[0u64; 64]; 8];
    for rank in 0..8 {
        for inner in 0..64 {
            let rank_attacks = first_rank_attacks(rank ^ 7, inner);
            let mut attacks = 0u64;
            for k in 0..8 {
                if rank_attacks & (1 << k) != 0 {
                    attacks |= 1u64 << (8 * (k ^ 7));
                }
            }
            table[rank][inner] = attacks;
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_rank_attacks_stop_at_blockers() {
        // Rook on d1 with blockers on b1 and f1
        let inner = (1 << 0) | (1 << 4);
        assert_eq!(first_rank_attacks(3, inner), 0b0011_0110);
        // Corner rook on an empty rank sees the whole rank
        assert_eq!(first_rank_attacks(0, 0), 0b1111_1110);
    }

    #[test]
    fn test_leaper_tables_have_no_wraparound() {
        let knight = knight_table();
        assert_eq!(knight[0].popcount(), 2);
        assert_eq!(knight[7].popcount(), 2);
        assert_eq!(knight[27].popcount(), 8);
        let king = king_table();
        assert_eq!(king[0].popcount(), 3);
        assert_eq!(king[8].popcount(), 5);
        assert_eq!(king[63].popcount(), 3);
    }

    #[test]
    fn test_between_table() {
        let between = between_table();
        let a1 = Square::A1.index();
        let h8 = Square::H8.index();
        assert_eq!(between[a1][h8].popcount(), 6);
        assert_eq!(between[a1][Square::B1.index()], Bitboard::EMPTY);
        // Not aligned
        let b3: Square = "b3".parse().unwrap();
        assert_eq!(between[a1][b3.index()], Bitboard::EMPTY);
        assert_eq!(between[Square::E1.index()][Square::H1.index()].popcount(), 2);
    }
}
