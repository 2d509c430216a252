//! Attack tables for move generation.
//!
//! Leapers (knight, king, pawn) are plain per-square lookups. Sliding pieces use
//! kindergarten bitboards: the occupancy on a line is masked, multiplied by a
//! constant that gathers the six inner line bits into the top of the word, and
//! the resulting 6-bit index selects a precomputed attack set. No loops at
//! query time and far smaller tables than magic bitboards.
//!
//! The tables are built once by [`AttackTables::new`] and never change.

#![allow(clippy::inline_always)] // Performance-critical hot path functions

mod attacks;
mod tables;

use attacks::{ANTI_DIAGONAL, DIAGONAL, RANK};

use super::types::{Bitboard, Color, Piece, Square};

/// Multiplier gathering a masked diagonal, anti-diagonal or rank into bits 58-63.
const B_FILE: u64 = Bitboard::FILE_B.0;
/// Multiplier gathering file-a occupancy (ranks 2-7) into bits 58-63, reversed.
const C2_H7_DIAGONAL: u64 = 0x0080_4020_1008_0400;

/// Precomputed attack lookups shared by every position of an engine instance.
pub struct AttackTables {
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    pawn: [[Bitboard; 64]; 2],
    diagonal: [Bitboard; 64],
    anti_diagonal: [Bitboard; 64],
    rank: [Bitboard; 64],
    bishop_empty: [Bitboard; 64],
    rook_empty: [Bitboard; 64],
    fill_up: [[u64; 64]; 8],
    a_file: [[u64; 64]; 8],
    between: Box<[[Bitboard; 64]]>,
}

impl AttackTables {
    #[must_use]
    pub fn new() -> Self {
        AttackTables {
            knight: tables::knight_table(),
            king: tables::king_table(),
            pawn: tables::pawn_table(),
            diagonal: tables::line_masks(DIAGONAL),
            anti_diagonal: tables::line_masks(ANTI_DIAGONAL),
            rank: tables::line_masks(RANK),
            bishop_empty: tables::empty_board_attacks(true),
            rook_empty: tables::empty_board_attacks(false),
            fill_up: tables::fill_up_table(),
            a_file: tables::a_file_table(),
            between: tables::between_table(),
        }
    }

    #[inline(always)]
    #[must_use]
    pub fn knight(&self, sq: Square) -> Bitboard {
        self.knight[sq.index()]
    }

    #[inline(always)]
    #[must_use]
    pub fn king(&self, sq: Square) -> Bitboard {
        self.king[sq.index()]
    }

    /// Squares attacked by a pawn of `color` standing on `sq`.
    #[inline(always)]
    #[must_use]
    pub fn pawn(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn[color.index()][sq.index()]
    }

    /// Attacks along a diagonal, anti-diagonal or rank through `sq`.
    #[inline(always)]
    fn line_attacks(&self, sq: Square, occ: Bitboard, mask: Bitboard) -> Bitboard {
        let idx = ((mask.0 & occ.0).wrapping_mul(B_FILE) >> 58) as usize;
        Bitboard(self.fill_up[sq.file()][idx] & mask.0)
    }

    #[inline(always)]
    fn file_attacks(&self, sq: Square, occ: Bitboard) -> Bitboard {
        let file = sq.file();
        let on_a_file = Bitboard::FILE_A.0 & (occ.0 >> file);
        let idx = (on_a_file.wrapping_mul(C2_H7_DIAGONAL) >> 58) as usize;
        Bitboard(self.a_file[sq.rank()][idx] << file)
    }

    #[inline]
    #[must_use]
    pub fn bishop(&self, sq: Square, occ: Bitboard) -> Bitboard {
        self.line_attacks(sq, occ, self.diagonal[sq.index()])
            | self.line_attacks(sq, occ, self.anti_diagonal[sq.index()])
    }

    #[inline]
    #[must_use]
    pub fn rook(&self, sq: Square, occ: Bitboard) -> Bitboard {
        self.file_attacks(sq, occ) | self.line_attacks(sq, occ, self.rank[sq.index()])
    }

    #[inline]
    #[must_use]
    pub fn queen(&self, sq: Square, occ: Bitboard) -> Bitboard {
        self.bishop(sq, occ) | self.rook(sq, occ)
    }

    /// Bishop attacks on an empty board
    #[inline]
    #[must_use]
    pub fn bishop_pseudo(&self, sq: Square) -> Bitboard {
        self.bishop_empty[sq.index()]
    }

    /// Rook attacks on an empty board
    #[inline]
    #[must_use]
    pub fn rook_pseudo(&self, sq: Square) -> Bitboard {
        self.rook_empty[sq.index()]
    }

    /// Squares strictly between `a` and `b` when they share a line, otherwise empty.
    #[inline]
    #[must_use]
    pub fn between(&self, a: Square, b: Square) -> Bitboard {
        self.between[a.index()][b.index()]
    }

    /// Attack set of a non-pawn piece; pawns need a color, see [`Self::pawn`].
    #[inline]
    #[must_use]
    pub fn piece(&self, piece: Piece, sq: Square, occ: Bitboard) -> Bitboard {
        match piece {
            Piece::Pawn => Bitboard::EMPTY,
            Piece::Knight => self.knight(sq),
            Piece::Bishop => self.bishop(sq, occ),
            Piece::Rook => self.rook(sq, occ),
            Piece::Queen => self.queen(sq, occ),
            Piece::King => self.king(sq),
        }
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::attacks::{sliding_attacks_slow, BISHOP_DIRECTIONS, ROOK_DIRECTIONS};
    use super::*;
    use rand::prelude::*;

    /// Every subset of `mask`, via the carry-rippler trick.
    fn subsets(mask: Bitboard) -> Vec<Bitboard> {
        let mut out = Vec::new();
        let mut subset = 0u64;
        loop {
            out.push(Bitboard(subset));
            subset = subset.wrapping_sub(mask.0) & mask.0;
            if subset == 0 {
                break;
            }
        }
        out
    }

    fn inner(mask: Bitboard, sq: Square) -> Bitboard {
        let mut edges = Bitboard::EMPTY;
        if sq.rank() != 0 {
            edges |= Bitboard::RANK_1;
        }
        if sq.rank() != 7 {
            edges |= Bitboard::RANK_8;
        }
        if sq.file() != 0 {
            edges |= Bitboard::FILE_A;
        }
        if sq.file() != 7 {
            edges |= Bitboard::FILE_H;
        }
        mask & !edges
    }

    #[test]
    fn test_rook_attacks_match_ray_walk_for_every_relevant_occupancy() {
        let tables = AttackTables::new();
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            for occ in subsets(inner(tables.rook_pseudo(sq), sq)) {
                assert_eq!(
                    tables.rook(sq, occ),
                    sliding_attacks_slow(sq, occ, &ROOK_DIRECTIONS),
                    "rook on {sq} with {occ:?}"
                );
            }
        }
    }

    #[test]
    fn test_bishop_attacks_match_ray_walk_for_every_relevant_occupancy() {
        let tables = AttackTables::new();
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            for occ in subsets(inner(tables.bishop_pseudo(sq), sq)) {
                assert_eq!(
                    tables.bishop(sq, occ),
                    sliding_attacks_slow(sq, occ, &BISHOP_DIRECTIONS),
                    "bishop on {sq} with {occ:?}"
                );
            }
        }
    }

    #[test]
    fn test_sliders_ignore_irrelevant_bits() {
        let tables = AttackTables::new();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let occ = Bitboard(rng.gen::<u64>() & rng.gen::<u64>());
            let sq = Square::from_index(rng.gen_range(0..64));
            assert_eq!(
                tables.queen(sq, occ),
                sliding_attacks_slow(sq, occ, &BISHOP_DIRECTIONS)
                    | sliding_attacks_slow(sq, occ, &ROOK_DIRECTIONS)
            );
        }
    }

    #[test]
    fn test_rook_attacks_empty_board() {
        let tables = AttackTables::new();
        let e4: Square = "e4".parse().unwrap();
        let expected = (Bitboard::rank_mask(3) | Bitboard::file_mask(4)) & !Bitboard::from_square(e4);
        assert_eq!(tables.rook(e4, Bitboard::EMPTY), expected);
    }

    #[test]
    fn test_pawn_attacks() {
        let tables = AttackTables::new();
        let e4: Square = "e4".parse().unwrap();
        let d5: Square = "d5".parse().unwrap();
        let f3: Square = "f3".parse().unwrap();
        assert!(tables.pawn(Color::White, e4).contains(d5));
        assert!(tables.pawn(Color::Black, e4).contains(f3));
        assert_eq!(tables.pawn(Color::White, Square::A8), Bitboard::EMPTY);
        assert_eq!(tables.pawn(Color::White, Square::H1).popcount(), 1);
    }
}
