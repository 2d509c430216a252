use super::super::state::Position;
use super::super::types::{Bitboard, Move, MoveList, Piece};

impl Position {
    /// Bishop, rook or queen moves onto `targets`.
    pub(crate) fn slider_moves(&self, piece: Piece, targets: Bitboard, list: &mut MoveList) {
        let attacks = self.attacks();
        let occ = self.occupied;
        for from in self.pieces(self.side_to_move, piece) {
            for to in attacks.piece(piece, from, occ) & targets {
                list.push(Move::new(from, to));
            }
        }
    }
}
