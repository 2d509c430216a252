//! Check and pin detection, legality filtering and check prediction.

use super::state::{KingAttackInfo, Position};
use super::types::{
    castling_path, castling_rook_squares, king_home, Bitboard, Color, ColoredPiece, Move,
    MoveKind, Piece, Square,
};

impl Position {
    /// Checkers, check-blocking squares and pinned pieces for the side to move.
    ///
    /// Cached in the current history frame; applying a move starts a fresh,
    /// uncomputed frame.
    pub fn king_attack_info(&mut self) -> KingAttackInfo {
        let cached = self.state().king_attack;
        if cached.computed {
            return cached;
        }
        let info = self.compute_king_attack_info();
        self.state_mut().king_attack = info;
        info
    }

    fn compute_king_attack_info(&self) -> KingAttackInfo {
        let us = self.side_to_move;
        let them = !us;
        let ksq = self.king_square(us);
        let ours = self.color(us);
        let theirs = self.color(them);
        let attacks = self.attacks();

        let mut info = KingAttackInfo {
            computed: true,
            ..KingAttackInfo::default()
        };
        info.attacks = theirs
            & ((attacks.pawn(us, ksq) & self.pieces_of_type(Piece::Pawn))
                | (attacks.knight(ksq) & self.pieces_of_type(Piece::Knight)));
        let mut checkers = info.attacks.popcount();

        // Only enemy pieces block here, so our own pieces are seen through.
        let diagonal = self.pieces_of_type(Piece::Bishop) | self.pieces_of_type(Piece::Queen);
        let straight = self.pieces_of_type(Piece::Rook) | self.pieces_of_type(Piece::Queen);
        let snipers = theirs
            & ((attacks.bishop(ksq, theirs) & diagonal) | (attacks.rook(ksq, theirs) & straight));

        for sniper in snipers {
            let between = attacks.between(ksq, sniper);
            let blockers = between & ours;
            match blockers.popcount() {
                0 => {
                    checkers += 1;
                    info.attacks |= between | Bitboard::from_square(sniper);
                }
                1 => info.pinned |= blockers,
                _ => {}
            }
        }

        info.double_check = checkers >= 2;
        info
    }

    /// Whether `mv` could be played here, ignoring checks and pins.
    ///
    /// Moves taken from the transposition table or an old principal variation
    /// may belong to another position and are screened with this first.
    #[must_use]
    pub fn is_pseudo_legal(&self, mv: Move) -> bool {
        if mv.is_null() {
            return false;
        }
        let us = self.side_to_move;
        let them = !us;
        let from = mv.from();
        let to = mv.to();
        let kind = mv.kind();
        let pc = self.piece_on(from);
        let Some(piece) = pc.piece() else {
            return false;
        };
        if pc.color() != us {
            return false;
        }
        match (piece, kind) {
            (Piece::Pawn, MoveKind::Castling) => return false,
            (Piece::King, MoveKind::Normal | MoveKind::Castling) => {}
            (Piece::Pawn, _) => {}
            (_, MoveKind::Normal) => {}
            _ => return false,
        }

        let ours = self.color(us);
        let occ = self.occupied;
        let attacks = self.attacks();

        match piece {
            Piece::Knight => !ours.contains(to) && attacks.knight(from).contains(to),
            Piece::Bishop | Piece::Rook | Piece::Queen => {
                let lines = match piece {
                    Piece::Bishop => attacks.bishop_pseudo(from),
                    Piece::Rook => attacks.rook_pseudo(from),
                    _ => attacks.bishop_pseudo(from) | attacks.rook_pseudo(from),
                };
                !ours.contains(to)
                    && lines.contains(to)
                    && (attacks.between(from, to) & occ).is_empty()
            }
            Piece::Pawn => {
                let push = us.pawn_push();
                let delta = to.index() as i32 - from.index() as i32;
                let promotion_rank = if us == Color::White { 6 } else { 1 };
                let start_rank = if us == Color::White { 1 } else { 6 };
                if (from.rank() == promotion_rank) != (kind == MoveKind::Promotion) {
                    return false;
                }
                if kind == MoveKind::EnPassant {
                    return self.en_passant() == Some(to)
                        && !occ.contains(to)
                        && self.piece_on(to.offset(-push))
                            == ColoredPiece::new(them, Piece::Pawn)
                        && attacks.pawn(us, from).contains(to);
                }
                if delta == push {
                    !occ.contains(to)
                } else if delta == 2 * push {
                    from.rank() == start_rank
                        && !occ.contains(from.offset(push))
                        && !occ.contains(to)
                } else {
                    attacks.pawn(us, from).contains(to) && self.color(them).contains(to)
                }
            }
            Piece::King => {
                if kind == MoveKind::Castling {
                    let home = king_home(us);
                    let kingside = to.file() > from.file();
                    from == home
                        && to.rank() == home.rank()
                        && from.index().abs_diff(to.index()) == 2
                        && self.castling_rights().has(us, kingside)
                        && (castling_path(us, kingside) & occ).is_empty()
                } else {
                    !ours.contains(to) && from.distance(to) == 1
                }
            }
        }
    }

    /// Whether a pseudo-legal move leaves the own king safe.
    pub fn is_legal(&mut self, mv: Move) -> bool {
        let info = self.king_attack_info();
        let us = self.side_to_move;
        let them = !us;
        let from = mv.from();
        let to = mv.to();
        let kind = mv.kind();

        if self.piece_type_on(from) == Some(Piece::King) {
            if kind == MoveKind::Castling {
                if info.in_check() {
                    return false;
                }
                // The king may not pass through an attacked square.
                let (_, passed) = castling_rook_squares(us, to.file() > from.file());
                return !self.is_under_attack(passed, them, self.occupied)
                    && !self.is_under_attack(to, them, self.occupied);
            }
            let occ = (self.occupied ^ Bitboard::from_square(from)) | Bitboard::from_square(to);
            let attackers = self.attackers_to(to, occ) & self.color(them);
            return (attackers & !Bitboard::from_square(to)).is_empty();
        }

        if info.double_check {
            return false;
        }

        let ksq = self.king_square(us);
        if info.in_check() {
            let target = if kind == MoveKind::EnPassant {
                // Capturing the pawn that just gave check.
                info.attacks.contains(to) || info.attacks.contains(to.offset(-us.pawn_push()))
            } else {
                info.attacks.contains(to)
            };
            if !target || info.pinned.contains(from) {
                return false;
            }
        } else if info.pinned.contains(from) && !aligned(ksq, from, to) {
            return false;
        }

        if kind == MoveKind::EnPassant {
            // Two pawns leave the rank at once; look for a revealed slider.
            let captured = to.offset(-us.pawn_push());
            let occ = (self.occupied ^ Bitboard::from_square(from) ^ Bitboard::from_square(captured))
                | Bitboard::from_square(to);
            let attackers = self.attackers_to(ksq, occ) & self.color(them);
            return (attackers & !Bitboard::from_square(captured)).is_empty();
        }
        true
    }

    /// Pseudo-legal and legal, for moves of unknown origin.
    pub fn is_valid_move(&mut self, mv: Move) -> bool {
        self.is_pseudo_legal(mv) && self.is_legal(mv)
    }

    /// Whether a legal move checks the opponent, without applying it.
    #[must_use]
    pub fn gives_check(&self, mv: Move) -> bool {
        let us = self.side_to_move;
        let them = !us;
        let their_king = self.pieces(them, Piece::King);
        if their_king.is_empty() {
            return false;
        }
        let ksq = their_king.lsb();
        let from = mv.from();
        let to = mv.to();
        let kind = mv.kind();
        let attacks = self.attacks();

        let Some(moved) = mv.promotion_piece().or_else(|| self.piece_type_on(from)) else {
            return false;
        };

        let mut occ = (self.occupied ^ Bitboard::from_square(from)) | Bitboard::from_square(to);
        let direct = match moved {
            Piece::Pawn => attacks.pawn(us, to),
            Piece::King => Bitboard::EMPTY,
            other => attacks.piece(other, to, occ),
        };
        if (direct & their_king).any() {
            return true;
        }

        let mut vacated = Bitboard::from_square(from);
        match kind {
            MoveKind::Castling => {
                let (rook_from, rook_to) = castling_rook_squares(us, to.file() > from.file());
                occ = (occ ^ Bitboard::from_square(rook_from)) | Bitboard::from_square(rook_to);
                return attacks.rook(rook_to, occ).contains(ksq);
            }
            MoveKind::EnPassant => {
                let captured = to.offset(-us.pawn_push());
                occ ^= Bitboard::from_square(captured);
                vacated |= Bitboard::from_square(captured);
            }
            _ => {}
        }

        // Discovered check by a slider behind the moved piece.
        let ours = self.color(us) & !vacated;
        let diagonal = ours & (self.pieces_of_type(Piece::Bishop) | self.pieces_of_type(Piece::Queen));
        let straight = ours & (self.pieces_of_type(Piece::Rook) | self.pieces_of_type(Piece::Queen));
        (attacks.bishop(ksq, occ) & diagonal).any() || (attacks.rook(ksq, occ) & straight).any()
    }
}

/// Whether `from` and `to` lie on one line through `king`.
///
/// Cross-multiplies the relative coordinates, so no division is needed.
fn aligned(king: Square, from: Square, to: Square) -> bool {
    let dx_from = from.file() as i32 - king.file() as i32;
    let dy_from = from.rank() as i32 - king.rank() as i32;
    let dx_to = to.file() as i32 - king.file() as i32;
    let dy_to = to.rank() as i32 - king.rank() as i32;
    if dx_from == 0 || dx_to == 0 {
        dx_from == dx_to
    } else if dy_from == 0 || dy_to == 0 {
        dy_from == dy_to
    } else {
        dx_from * dy_to == dy_from * dx_to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_aligned() {
        assert!(aligned(sq("e1"), sq("e2"), sq("e7")));
        assert!(!aligned(sq("e1"), sq("e2"), sq("d2")));
        assert!(aligned(sq("e1"), sq("f2"), sq("h4")));
        assert!(!aligned(sq("e1"), sq("f2"), sq("g2")));
    }

    #[test]
    fn test_pin_detected() {
        let mut pos = Position::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let info = pos.king_attack_info();
        assert!(info.pinned.contains(sq("e2")));
        assert!(!info.in_check());
    }

    #[test]
    fn test_double_check_detected() {
        let mut pos = Position::from_fen("4r1k1/8/8/8/8/5n2/8/4K3 w - - 0 1").unwrap();
        let info = pos.king_attack_info();
        assert!(info.double_check);
    }

    #[test]
    fn test_stale_move_rejected_as_pseudo_legal() {
        let pos = Position::startpos();
        assert!(!pos.is_pseudo_legal(Move::new(sq("e4"), sq("e5"))));
        assert!(!pos.is_pseudo_legal(Move::new(sq("e2"), sq("e5"))));
        assert!(!pos.is_pseudo_legal(Move::new(sq("f1"), sq("c4"))));
        assert!(!pos.is_pseudo_legal(Move::castling(Square::E1, Square::G1)));
        assert!(pos.is_pseudo_legal(Move::new(sq("g1"), sq("f3"))));
        assert!(pos.is_pseudo_legal(Move::new(sq("e2"), sq("e4"))));
    }

    #[test]
    fn test_castling_through_attack_is_illegal() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/5r2/4K2R w K - 0 1").unwrap();
        let castle = Move::castling(Square::E1, Square::G1);
        assert!(pos.is_pseudo_legal(castle));
        assert!(!pos.is_legal(castle));
    }

    #[test]
    fn test_gives_check_direct_and_discovered() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/4B3/4R1K1 w - - 0 1").unwrap();
        // Bishop leaves the e-file and uncovers the rook.
        assert!(pos.gives_check(Move::new(sq("e2"), sq("d3"))));
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        assert!(pos.gives_check(Move::new(sq("d1"), sq("d8"))));
        assert!(!pos.gives_check(Move::new(sq("d1"), sq("c2"))));
    }

    #[test]
    fn test_gives_check_by_castling_rook() {
        let pos = Position::from_fen("5k2/8/8/8/8/8/8/4K2R w K - 0 1").unwrap();
        assert!(pos.gives_check(Move::castling(Square::E1, Square::G1)));
    }

    #[test]
    fn test_en_passant_exposing_king_is_illegal() {
        let mut pos = Position::from_fen("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1").unwrap();
        let ep = Move::en_passant(sq("e5"), sq("d6"));
        assert!(pos.is_pseudo_legal(ep));
        assert!(!pos.is_legal(ep));
    }
}
