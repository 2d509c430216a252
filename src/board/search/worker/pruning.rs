use once_cell::sync::Lazy;

use super::super::constants::{MIN_MATE, REDUCTION_TABLE_SIZE, STOP_SCORE};
use super::{NodeContext, NodeKind, Worker};
use crate::board::{ColoredPiece, Move};

/// Quiet moves searched before late move pruning kicks in, `[improving][depth]`.
static LMP_LIMITS: Lazy<[[usize; REDUCTION_TABLE_SIZE]; 2]> = Lazy::new(|| {
    let mut table = [[0; REDUCTION_TABLE_SIZE]; 2];
    for (improving, row) in table.iter_mut().enumerate() {
        for (depth, cell) in row.iter_mut().enumerate() {
            *cell = (3 + depth * depth) / (2 - improving);
        }
    }
    table
});

impl Worker {
    /// Static eval so far above beta that a shallow search would fail high.
    pub(super) fn reverse_futility(&self, depth: i32, beta: i32, eval: i32) -> Option<i32> {
        let p = &self.params;
        (depth <= p.rfp_max_depth && eval - p.rfp_margin * depth >= beta && eval < MIN_MATE)
            .then_some(eval)
    }

    /// Give the opponent a free move; if a reduced search still fails high the
    /// node is cut.
    pub(super) fn null_move(&mut self, depth: i32, beta: i32, eval: i32, ply: usize) -> Option<i32> {
        let us = self.pos.side_to_move();
        if depth < self.params.null_min_depth
            || eval < beta
            || !self.pos.has_non_pawn_material(us)
            || self.stack.previous(ply).is_none()
        {
            return None;
        }

        let r = self.params.null_base_reduction
            + depth / 3
            + ((eval - beta) / self.params.null_eval_divisor).min(3);

        self.stack.set_move(ply, Move::null(), ColoredPiece::NONE);
        self.pos.apply_null_move();
        let score = -self.search(NodeKind::NonPv, -beta, -beta + 1, depth - r, ply + 1);
        self.pos.undo_null_move();

        if self.stopped() {
            return Some(STOP_SCORE);
        }
        // Mates found after passing are not proven.
        (score >= beta).then_some(if score >= MIN_MATE { beta } else { score })
    }

    /// Forward pruning of a single move at shallow depth.
    ///
    /// `tactical` covers quiet moves that give check or promote to a queen.
    pub(super) fn skip_move(
        &self,
        node: &NodeContext,
        mv: Move,
        capture: bool,
        tactical: bool,
        move_count: usize,
        alpha: i32,
    ) -> bool {
        let p = &self.params;
        let depth = node.depth;

        if capture {
            return depth <= p.see_max_depth && !self.pos.see_ge(mv, -p.see_capture_margin * depth);
        }
        if tactical || node.in_check {
            return false;
        }

        if depth <= p.lmp_max_depth {
            let d = (depth.max(0) as usize).min(REDUCTION_TABLE_SIZE - 1);
            if move_count > LMP_LIMITS[usize::from(node.improving)][d] {
                return true;
            }
        }

        depth <= p.futility_max_depth
            && node.static_eval + p.futility_base + p.futility_margin * depth <= alpha
    }
}
