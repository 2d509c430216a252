use super::super::constants::{
    mated_in, DRAW, INFINITE, MAX_PLY, QSEARCH_SEE_THRESHOLD, STOP_SCORE, TT_FIFTY_MOVE_GUARD,
};
use super::super::move_order::order_noisy;
use super::{bound_allows_cutoff, Worker};
use crate::board::{Move, Piece};
use crate::tt::{score_from_tt, score_to_tt, NodeType};

impl Worker {
    /// Quiescence search: captures and queen promotions until the position is
    /// quiet, every evasion while in check.
    pub(super) fn quiescence(&mut self, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        if self.count_node() {
            return STOP_SCORE;
        }
        self.seldepth = self.seldepth.max(ply + 1);

        if self.pos.is_draw() {
            return DRAW;
        }
        let in_check = self.pos.in_check();
        if ply >= MAX_PLY - 1 {
            return if in_check { DRAW } else { self.evaluate() };
        }

        let key = self.pos.key();
        let tt_entry = self.shared.tt.probe(key);
        if let Some(entry) = tt_entry {
            let score = score_from_tt(entry.score, ply);
            if self.pos.fifty_move_count() < TT_FIFTY_MOVE_GUARD
                && bound_allows_cutoff(entry.node_type, score, alpha, beta)
            {
                return score;
            }
        }

        let static_eval;
        let mut best_score;
        if in_check {
            static_eval = -INFINITE;
            best_score = -INFINITE;
        } else {
            static_eval = tt_entry.map_or_else(|| self.evaluate(), |e| e.eval);
            if static_eval >= beta {
                return static_eval;
            }
            alpha = alpha.max(static_eval);
            best_score = static_eval;
        }

        let moves = if in_check {
            self.pos.generate_legal()
        } else {
            self.pos.generate_legal_noisy()
        };
        if in_check && moves.is_empty() {
            return mated_in(ply);
        }
        let ordered = order_noisy(&self.pos, &self.histories, moves.as_slice());

        let mut best_move = Move::null();
        for scored in ordered.as_slice() {
            let mv = scored.mv;
            if !in_check {
                let keep = if self.pos.is_capture(mv) {
                    self.pos.see_ge(mv, QSEARCH_SEE_THRESHOLD)
                } else {
                    mv.promotion_piece() == Some(Piece::Queen)
                };
                if !keep {
                    continue;
                }
            }

            self.pos.apply_move(mv);
            let score = -self.quiescence(-beta, -alpha, ply + 1);
            self.pos.undo_move();
            if self.stopped() {
                return STOP_SCORE;
            }

            if score > best_score {
                best_score = score;
                if score > alpha {
                    best_move = mv;
                    if score >= beta {
                        break;
                    }
                    alpha = score;
                }
            }
        }

        let node_type = if best_score >= beta {
            NodeType::Cut
        } else {
            NodeType::All
        };
        self.shared.tt.save(
            key,
            score_to_tt(best_score, ply),
            static_eval,
            best_move,
            0,
            node_type,
        );
        best_score
    }
}
