use super::super::state::Position;
use super::super::types::{castling_path, king_home, Bitboard, Move, MoveList};

impl Position {
    /// King steps onto `targets`, plus castling when `castles` is set.
    ///
    /// Castling only checks rights and the empty path here; attacked transit
    /// squares are rejected by the legality filter.
    pub(crate) fn king_moves(&self, targets: Bitboard, castles: bool, list: &mut MoveList) {
        let us = self.side_to_move;
        let from = self.king_square(us);
        for to in self.attacks().king(from) & targets {
            list.push(Move::new(from, to));
        }

        if !castles || from != king_home(us) {
            return;
        }
        let rights = self.castling_rights();
        for kingside in [true, false] {
            if rights.has(us, kingside) && (castling_path(us, kingside) & self.occupied).is_empty() {
                let to = if kingside { from.offset(2) } else { from.offset(-2) };
                list.push(Move::castling(from, to));
            }
        }
    }
}
