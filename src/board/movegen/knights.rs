use super::super::state::Position;
use super::super::types::{Bitboard, Move, MoveList, Piece};

impl Position {
    pub(crate) fn knight_moves(&self, targets: Bitboard, list: &mut MoveList) {
        let attacks = self.attacks();
        for from in self.pieces(self.side_to_move, Piece::Knight) {
            for to in attacks.knight(from) & targets {
                list.push(Move::new(from, to));
            }
        }
    }
}
