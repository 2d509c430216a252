//! Move generation.
//!
//! Pseudo-legal moves are produced per piece type from the attack tables and
//! then filtered in place with [`Position::is_legal`].

mod kings;
mod knights;
mod pawns;
mod sliders;

use super::state::Position;
use super::types::{Bitboard, MoveList, Piece};

/// Which moves to generate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenType {
    /// Every move
    All,
    /// Captures (en passant included) and promotions
    Noisy,
}

impl Position {
    /// Append pseudo-legal moves for the side to move.
    ///
    /// In double check only king moves are produced; everything else is
    /// illegal anyway.
    pub fn generate_pseudo_legal(&mut self, gen: GenType, list: &mut MoveList) {
        let us = self.side_to_move;
        let targets = match gen {
            GenType::All => !self.color(us),
            GenType::Noisy => self.color(!us),
        };

        if !self.king_attack_info().double_check {
            self.pawn_moves(gen, list);
            self.knight_moves(targets, list);
            for piece in [Piece::Bishop, Piece::Rook, Piece::Queen] {
                self.slider_moves(piece, targets, list);
            }
        }
        self.king_moves(targets, gen == GenType::All, list);
    }

    /// All legal moves for the side to move.
    pub fn generate_legal(&mut self) -> MoveList {
        self.generate_legal_of(GenType::All)
    }

    /// Legal captures and promotions.
    pub fn generate_legal_noisy(&mut self) -> MoveList {
        self.generate_legal_of(GenType::Noisy)
    }

    fn generate_legal_of(&mut self, gen: GenType) -> MoveList {
        let mut list = MoveList::new();
        self.generate_pseudo_legal(gen, &mut list);
        list.retain(|mv| self.is_legal(mv));
        list
    }

    /// Whether the side to move has any legal move.
    pub fn has_legal_move(&mut self) -> bool {
        !self.generate_legal().is_empty()
    }

    pub fn is_checkmate(&mut self) -> bool {
        self.in_check() && !self.has_legal_move()
    }

    pub fn is_stalemate(&mut self) -> bool {
        !self.in_check() && !self.has_legal_move()
    }

    /// Squares attacked by `piece`s of the side not to move.
    pub(crate) fn enemy_attacks(&self, piece: Piece) -> Bitboard {
        let them = !self.side_to_move;
        let attacks = self.attacks();
        let mut out = Bitboard::EMPTY;
        for sq in self.pieces(them, piece) {
            out |= match piece {
                Piece::Pawn => attacks.pawn(them, sq),
                other => attacks.piece(other, sq, self.occupied),
            };
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_has_twenty_moves() {
        let mut pos = Position::startpos();
        assert_eq!(pos.generate_legal().len(), 20);
        assert!(pos.generate_legal_noisy().is_empty());
    }

    #[test]
    fn test_double_check_only_king_moves() {
        let mut pos = Position::from_fen("4r1k1/8/8/8/8/5n2/3Q4/4K3 w - - 0 1").unwrap();
        let moves = pos.generate_legal();
        assert!(!moves.is_empty());
        assert!(moves
            .iter()
            .all(|mv| pos.piece_type_on(mv.from()) == Some(Piece::King)));
    }

    #[test]
    fn test_checkmate_and_stalemate() {
        let mut mated =
            Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        assert!(mated.is_checkmate());
        let mut stale = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(stale.is_stalemate());
    }

    #[test]
    fn test_noisy_moves_include_promotions_and_en_passant() {
        let mut pos = Position::from_fen("4k3/P7/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let noisy = pos.generate_legal_noisy();
        assert_eq!(noisy.len(), 5);
        assert!(noisy.iter().any(|mv| mv.is_en_passant()));
    }
}
