//! Applying and undoing moves.
//!
//! The Zobrist key is updated incrementally; only FEN parsing computes it from
//! scratch. Every apply pushes one `BoardState` frame and every undo pops it, so
//! an apply/undo pair restores the position exactly.

use super::state::{BoardState, KingAttackInfo, Position};
use super::types::{castling_rook_squares, Color, ColoredPiece, Move, MoveKind, Piece, Square};

/// Corner rook squares and the castling right each one guards.
const ROOK_CORNERS: [(Square, Color, bool); 4] = [
    (Square::A1, Color::White, false),
    (Square::H1, Color::White, true),
    (Square::A8, Color::Black, false),
    (Square::H8, Color::Black, true),
];

impl Position {
    /// Apply a legal (or at least pseudo-legal) move.
    pub fn apply_move(&mut self, mv: Move) {
        let from = mv.from();
        let to = mv.to();
        let kind = mv.kind();
        let us = self.side_to_move;
        let them = !us;
        let moving = self.piece_on(from);
        let prev = *self.state();

        let mut key = prev.key;
        let mut castling = prev.castling;
        let mut fifty = prev.fifty_move_count + 1;
        let mut en_passant = None;

        if let Some(ep) = prev.en_passant {
            key ^= self.ctx.zobrist().en_passant(ep);
        }

        let captured = if kind == MoveKind::EnPassant {
            ColoredPiece::new(them, Piece::Pawn)
        } else {
            self.piece_on(to)
        };

        if captured.is_some() {
            fifty = 0;
            let cap_sq = if kind == MoveKind::EnPassant {
                to.offset(-us.pawn_push())
            } else {
                to
            };
            key ^= self.ctx.zobrist().piece(captured, cap_sq);
            self.remove_piece(cap_sq);
        }

        match moving.piece() {
            Some(Piece::Pawn) => {
                fifty = 0;
                if to.index().abs_diff(from.index()) == 16 {
                    let ep = from.offset(us.pawn_push());
                    en_passant = Some(ep);
                    key ^= self.ctx.zobrist().en_passant(ep);
                }
            }
            Some(Piece::King) => {
                castling.remove_color(us);
                if kind == MoveKind::Castling {
                    let (rook_from, rook_to) = castling_rook_squares(us, to.file() > from.file());
                    let rook = self.piece_on(rook_from);
                    key ^= self.ctx.zobrist().piece(rook, rook_from)
                        ^ self.ctx.zobrist().piece(rook, rook_to);
                    self.move_piece(rook_from, rook_to);
                }
            }
            _ => {}
        }

        // A rook leaving or being captured on its corner ends that right.
        for (corner, color, kingside) in ROOK_CORNERS {
            if corner == from || corner == to {
                castling.remove(color, kingside);
            }
        }
        if castling != prev.castling {
            key ^= self.ctx.zobrist().castling(prev.castling)
                ^ self.ctx.zobrist().castling(castling);
        }

        if let Some(promo) = mv.promotion_piece() {
            let promoted = ColoredPiece::new(us, promo);
            key ^= self.ctx.zobrist().piece(moving, from) ^ self.ctx.zobrist().piece(promoted, to);
            self.remove_piece(from);
            self.put_piece(to, promoted);
        } else {
            key ^= self.ctx.zobrist().piece(moving, from) ^ self.ctx.zobrist().piece(moving, to);
            self.move_piece(from, to);
        }

        key ^= self.ctx.zobrist().side();
        self.side_to_move = them;

        let repetitions = self.count_repetitions(key, fifty);
        self.history.push(BoardState {
            castling,
            en_passant,
            fifty_move_count: fifty,
            ply: prev.ply + 1,
            repetitions,
            captured,
            last_move: mv,
            key,
            king_attack: KingAttackInfo::default(),
        });
    }

    /// Walk back over positions with the same side to move inside the
    /// fifty-move window, starting four plies ago.
    fn count_repetitions(&self, key: u64, fifty: u32) -> u32 {
        // Index the new frame will occupy once pushed.
        let current = self.history.len() as i64;
        let floor = (current - i64::from(fifty)).max(0);
        let mut i = current - 4;
        while i >= floor {
            let state = &self.history[i as usize];
            if state.key == key {
                return state.repetitions + 1;
            }
            i -= 2;
        }
        0
    }

    /// Undo the last move applied with [`Position::apply_move`].
    pub fn undo_move(&mut self) {
        if self.history.len() <= 1 {
            return;
        }
        let Some(state) = self.history.pop() else {
            return;
        };
        self.side_to_move = !self.side_to_move;
        let us = self.side_to_move;
        let mv = state.last_move;
        let from = mv.from();
        let mut to = mv.to();

        match mv.kind() {
            MoveKind::EnPassant => {
                self.move_piece(to, from);
                to = to.offset(-us.pawn_push());
            }
            MoveKind::Promotion => {
                self.remove_piece(to);
                self.put_piece(from, ColoredPiece::new(us, Piece::Pawn));
            }
            MoveKind::Castling => {
                let (rook_from, rook_to) = castling_rook_squares(us, to.file() > from.file());
                self.move_piece(rook_to, rook_from);
                self.move_piece(to, from);
            }
            MoveKind::Normal => self.move_piece(to, from),
        }

        if state.captured.is_some() {
            self.put_piece(to, state.captured);
        }
    }

    /// Pass the turn. Not legal while in check.
    pub fn apply_null_move(&mut self) {
        let prev = *self.state();
        let mut key = prev.key ^ self.ctx.zobrist().side();
        if let Some(ep) = prev.en_passant {
            key ^= self.ctx.zobrist().en_passant(ep);
        }
        self.history.push(BoardState {
            castling: prev.castling,
            en_passant: None,
            fifty_move_count: prev.fifty_move_count,
            ply: prev.ply,
            repetitions: 0,
            captured: ColoredPiece::NONE,
            last_move: Move::null(),
            key,
            king_attack: KingAttackInfo::default(),
        });
        self.side_to_move = !self.side_to_move;
    }

    pub fn undo_null_move(&mut self) {
        if self.history.len() <= 1 {
            return;
        }
        self.history.pop();
        self.side_to_move = !self.side_to_move;
    }

    /// Apply a sequence of moves given in coordinate notation.
    pub fn apply_moves<'a>(
        &mut self,
        moves: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), super::error::MoveParseError> {
        for text in moves {
            let mv = self.parse_move(text)?;
            self.apply_move(mv);
        }
        Ok(())
    }
}
