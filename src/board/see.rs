//! Static Exchange Evaluation (SEE).
//!
//! Plays out the capture sequence on one square, always recapturing with the
//! least valuable piece, and folds the gains back with minimax. The position
//! itself is never modified.

use super::state::Position;
use super::types::{Bitboard, Color, Move, MoveKind, Piece};

/// Piece values for SEE, indexed by `Piece::index()`
pub const SEE_VALUES: [i32; 6] = [
    100,   // Pawn
    325,   // Knight
    350,   // Bishop
    550,   // Rook
    1000,  // Queen
    10000, // King
];

#[inline]
fn see_value(piece: Option<Piece>) -> i32 {
    piece.map_or(0, |p| SEE_VALUES[p.index()])
}

impl Position {
    /// Net material won by `mv` from the mover's point of view.
    ///
    /// Only normal moves are evaluated; castling, en passant and promotions
    /// score 0. A quiet move onto an attacked square scores negative.
    #[must_use]
    pub fn see(&self, mv: Move) -> i32 {
        if mv.kind() != MoveKind::Normal {
            return 0;
        }
        const MAX_DEPTH: usize = 32;

        let from = mv.from();
        let to = mv.to();
        let Some(mut current) = self.piece_type_on(from) else {
            return 0;
        };
        let mut side = self.piece_on(from).color();
        let diagonal = self.pieces_of_type(Piece::Bishop) | self.pieces_of_type(Piece::Queen);
        let straight = self.pieces_of_type(Piece::Rook) | self.pieces_of_type(Piece::Queen);
        let attacks = self.attacks();

        let mut gain = [0i32; MAX_DEPTH];
        let mut depth = 0;
        let mut from_bb = Bitboard::from_square(from);
        let mut occ = self.occupied;
        let mut attackers = self.attackers_to(to, occ);
        gain[0] = see_value(self.piece_type_on(to));

        loop {
            depth += 1;
            side = !side;
            // Speculative: what the next side wins if it recaptures.
            gain[depth] = SEE_VALUES[current.index()] - gain[depth - 1];
            if (-gain[depth - 1]).max(gain[depth]) < 0 || depth + 1 >= MAX_DEPTH {
                break;
            }

            attackers ^= from_bb;
            occ ^= from_bb;
            // Sliders hidden behind the piece that just captured.
            attackers |= occ
                & ((attacks.bishop(to, occ) & diagonal) | (attacks.rook(to, occ) & straight));

            let Some((piece, bb)) = self.least_valuable_attacker(attackers, side) else {
                break;
            };
            if piece == Piece::King && (attackers & !bb & self.color(!side)).any() {
                break;
            }
            current = piece;
            from_bb = bb;
        }

        while depth > 1 {
            depth -= 1;
            gain[depth - 1] = -(-gain[depth - 1]).max(gain[depth]);
        }
        gain[0]
    }

    /// Whether `mv` wins at least `threshold` by static exchange.
    #[inline]
    #[must_use]
    pub fn see_ge(&self, mv: Move, threshold: i32) -> bool {
        self.see(mv) >= threshold
    }

    /// Cheapest piece of `color` among `attackers`, as a single-square set.
    fn least_valuable_attacker(&self, attackers: Bitboard, color: Color) -> Option<(Piece, Bitboard)> {
        let ours = attackers & self.color(color);
        Piece::ALL.into_iter().find_map(|piece| {
            let subset = ours & self.pieces_of_type(piece);
            subset.any().then(|| (piece, subset.lsb_bb()))
        })
    }
}
