use super::super::state::Position;
use super::super::types::{Bitboard, Color, Move, MoveList, Piece, Square, PROMOTION_PIECES};
use super::GenType;

impl Position {
    pub(crate) fn pawn_moves(&self, gen: GenType, list: &mut MoveList) {
        let us = self.side_to_move;
        let them = !us;
        let push = us.pawn_push();
        let pawns = self.pieces(us, Piece::Pawn);
        let empty = !self.occupied;
        let enemies = self.color(them);
        let (last_rank, third_rank) = match us {
            Color::White => (Bitboard::RANK_8, Bitboard::RANK_3),
            Color::Black => (Bitboard::RANK_1, Bitboard::RANK_6),
        };
        let forward = |bb: Bitboard| match us {
            Color::White => bb.shift_north(),
            Color::Black => bb.shift_south(),
        };

        let single = forward(pawns) & empty;
        for to in single & last_rank {
            push_promotions(list, to.offset(-push), to);
        }
        if gen == GenType::All {
            for to in single & !last_rank {
                list.push(Move::new(to.offset(-push), to));
            }
            for to in forward(single & third_rank) & empty {
                list.push(Move::new(to.offset(-2 * push), to));
            }
        }

        let attacks = self.attacks();
        for from in pawns {
            let targets = attacks.pawn(us, from) & enemies;
            for to in targets {
                if last_rank.contains(to) {
                    push_promotions(list, from, to);
                } else {
                    list.push(Move::new(from, to));
                }
            }
        }

        if let Some(ep) = self.en_passant() {
            // Our pawns standing where an enemy pawn on `ep` would attack.
            for from in attacks.pawn(them, ep) & pawns {
                list.push(Move::en_passant(from, ep));
            }
        }
    }
}

fn push_promotions(list: &mut MoveList, from: Square, to: Square) {
    for piece in PROMOTION_PIECES {
        list.push(Move::promotion(from, to, piece));
    }
}
