//! Per-thread alpha-beta search.
//!
//! This module implements:
//! - Principal variation search with root, PV and non-PV nodes
//! - Mate distance pruning
//! - Transposition table cutoffs
//! - Reverse futility and null move pruning
//! - Singular extension of the hash move
//! - Late move pruning, futility and SEE pruning of single moves
//! - Late move reductions with re-search
//! - Quiescence search with SEE filtering

mod iterative;
mod pruning;
mod quiescence;

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::constants::{
    is_mate_score, mate_in, mated_in, DRAW, INFINITE, MAX_PLY, MIN_MATE, NODE_CHECK_INTERVAL,
    REDUCTION_TABLE_SIZE, STOP_SCORE, TT_FIFTY_MOVE_GUARD,
};
use super::history::Histories;
use super::log::SearchInfoCallback;
use super::move_order::{MoveSorter, REFUTATION_SCORE};
use super::params::SearchParams;
use super::stack::SearchStack;
use crate::board::{Move, MoveList, Piece, Position};
use crate::engine::TimeManager;
use crate::eval::Evaluator;
use crate::sync::{NodeCounter, StopFlag};
use crate::tt::{score_from_tt, score_to_tt, NodeType, TranspositionTable};

/// Late move reductions indexed by `[depth][move number]`.
static REDUCTIONS: Lazy<[[i32; REDUCTION_TABLE_SIZE]; REDUCTION_TABLE_SIZE]> = Lazy::new(|| {
    let mut table = [[0; REDUCTION_TABLE_SIZE]; REDUCTION_TABLE_SIZE];
    for (depth, row) in table.iter_mut().enumerate().skip(1) {
        for (count, cell) in row.iter_mut().enumerate().skip(1) {
            let r = 0.53 + (depth as f64).ln() * (count as f64).ln() / 2.44;
            *cell = r.max(0.0) as i32;
        }
    }
    table
});

#[inline]
fn reduction(depth: i32, count: usize) -> i32 {
    let d = (depth.max(0) as usize).min(REDUCTION_TABLE_SIZE - 1);
    REDUCTIONS[d][count.min(REDUCTION_TABLE_SIZE - 1)]
}

/// State every search thread reads.
pub(crate) struct SharedState {
    pub tt: Arc<TranspositionTable>,
    pub evaluator: Arc<dyn Evaluator>,
    pub stop: StopFlag,
    pub nodes: NodeCounter,
    pub params: SearchParams,
    pub time: TimeManager,
    pub info_callback: Option<SearchInfoCallback>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Root,
    Pv,
    NonPv,
}

impl NodeKind {
    #[inline]
    fn is_pv(self) -> bool {
        self != NodeKind::NonPv
    }
}

/// Outcome of the deepest fully searched iteration.
#[derive(Clone, Debug, Default)]
pub(crate) struct Completed {
    pub depth: i32,
    pub score: i32,
    pub pv: Vec<Move>,
}

/// Facts about the node being searched that move pruning looks at.
#[derive(Clone, Copy, Debug)]
struct NodeContext {
    depth: i32,
    in_check: bool,
    improving: bool,
    static_eval: i32,
}

/// Whether a stored bound settles the node for the window `[alpha, beta]`.
#[inline]
fn bound_allows_cutoff(node_type: NodeType, score: i32, alpha: i32, beta: i32) -> bool {
    match node_type {
        NodeType::Pv => true,
        NodeType::Cut => score >= beta,
        NodeType::All => score <= alpha,
        NodeType::None => false,
    }
}

/// One Lazy SMP search thread with its own position copy and move-ordering
/// tables.
pub(crate) struct Worker {
    id: usize,
    pos: Position,
    shared: Arc<SharedState>,
    params: SearchParams,
    histories: Histories,
    stack: SearchStack,
    /// Nodes not yet added to the shared counter
    pending_nodes: u64,
    seldepth: usize,
    completed: Option<Completed>,
}

impl Worker {
    pub fn new(id: usize, pos: Position, shared: Arc<SharedState>) -> Self {
        Worker {
            id,
            pos,
            params: shared.params.clone(),
            shared,
            histories: Histories::new(),
            stack: SearchStack::new(),
            pending_nodes: 0,
            seldepth: 0,
            completed: None,
        }
    }

    #[inline]
    fn is_main(&self) -> bool {
        self.id == 0
    }

    #[inline]
    fn stopped(&self) -> bool {
        self.shared.stop.is_stopped()
    }

    fn flush_nodes(&mut self) -> u64 {
        let total = self.shared.nodes.add(self.pending_nodes);
        self.pending_nodes = 0;
        total
    }

    /// Count a node and poll the limits. Returns whether the search must stop.
    #[inline]
    fn count_node(&mut self) -> bool {
        self.pending_nodes += 1;
        if self.pending_nodes >= NODE_CHECK_INTERVAL {
            let total = self.flush_nodes();
            if self.shared.time.should_stop(total) {
                self.shared.stop.stop();
            }
        }
        self.stopped()
    }

    #[inline]
    fn evaluate(&self) -> i32 {
        self.shared.evaluator.evaluate(&self.pos)
    }

    pub(super) fn search(
        &mut self,
        kind: NodeKind,
        mut alpha: i32,
        mut beta: i32,
        depth: i32,
        ply: usize,
    ) -> i32 {
        self.stack.clear_pv(ply);
        if depth <= 0 {
            return self.quiescence(alpha, beta, ply);
        }
        if self.count_node() {
            return STOP_SCORE;
        }

        let pv_node = kind.is_pv();
        let root = kind == NodeKind::Root;
        self.seldepth = self.seldepth.max(ply + 1);

        if !root {
            if self.pos.is_draw() {
                return DRAW;
            }
            if ply >= MAX_PLY - 1 {
                return if self.pos.in_check() { DRAW } else { self.evaluate() };
            }
            alpha = alpha.max(mated_in(ply));
            beta = beta.min(mate_in(ply + 1));
            if alpha >= beta {
                return alpha;
            }
        }

        let in_check = self.pos.in_check();
        let excluded = self.stack.at(ply).excluded;
        let key = self.pos.key();

        // The verification search of a singular extension shares the key with
        // its parent node and must not see or overwrite the parent's entry.
        let tt_entry = if excluded.is_null() {
            self.shared.tt.probe(key)
        } else {
            None
        };
        let tt_move = tt_entry.map_or(Move::null(), |e| e.best_move);
        let tt_score = tt_entry.map(|e| score_from_tt(e.score, ply));

        if let (Some(entry), Some(score)) = (tt_entry, tt_score) {
            if !pv_node
                && entry.depth >= depth
                && self.pos.fifty_move_count() < TT_FIFTY_MOVE_GUARD
                && bound_allows_cutoff(entry.node_type, score, alpha, beta)
            {
                return score;
            }
        }

        let static_eval = if in_check {
            -INFINITE
        } else if !excluded.is_null() {
            self.stack.at(ply).static_eval
        } else if let Some(entry) = tt_entry {
            entry.eval
        } else {
            self.evaluate()
        };
        self.stack.at_mut(ply).static_eval = static_eval;
        let node = NodeContext {
            depth,
            in_check,
            improving: !in_check && ply >= 2 && static_eval > self.stack.at(ply - 2).static_eval,
            static_eval,
        };

        if !pv_node && !in_check && excluded.is_null() {
            if let Some(score) = self.reverse_futility(depth, beta, static_eval) {
                return score;
            }
            if let Some(score) = self.null_move(depth, beta, static_eval, ply) {
                return score;
            }
        }

        let mut singular_extension = 0;
        if !root && excluded.is_null() && depth >= self.params.singular_min_depth {
            if let (Some(entry), Some(score)) = (tt_entry, tt_score) {
                if entry.depth >= depth - self.params.singular_tt_depth_margin
                    && matches!(entry.node_type, NodeType::Cut | NodeType::Pv)
                    && !is_mate_score(score)
                    && !tt_move.is_null()
                    && self.pos.is_pseudo_legal(tt_move)
                    && self.pos.is_legal(tt_move)
                {
                    let singular_beta = score - self.params.singular_margin * depth;
                    self.stack.at_mut(ply).excluded = tt_move;
                    let s = self.search(
                        NodeKind::NonPv,
                        singular_beta - 1,
                        singular_beta,
                        (depth - 1) / 2,
                        ply,
                    );
                    self.stack.at_mut(ply).excluded = Move::null();
                    if self.stopped() {
                        return STOP_SCORE;
                    }
                    if s < singular_beta {
                        singular_extension = 1;
                    } else if !pv_node && singular_beta >= beta {
                        // Multi-cut: more than one move beats beta.
                        return singular_beta;
                    }
                }
            }
        }

        let us = self.pos.side_to_move();
        let context = self.stack.continuation_keys(ply);
        let mut sorter = MoveSorter::new(tt_move);
        let mut best_score = -INFINITE;
        let mut best_move = Move::null();
        let mut legal_moves = 0usize;
        let mut searched = 0usize;
        let mut quiets_tried = MoveList::new();
        let mut captures_tried = MoveList::new();

        while let Some(mv) = sorter.next(&mut self.pos, &self.histories, &self.stack, ply) {
            if mv == excluded {
                continue;
            }
            legal_moves += 1;

            let order_score = sorter.last_score();
            let capture = self.pos.is_capture(mv);
            let noisy = capture || mv.promotion_piece() == Some(Piece::Queen);
            let gives_check = self.pos.gives_check(mv);
            let moved = self.pos.piece_on(mv.from());

            if !root
                && best_score > -MIN_MATE
                && self.pos.has_non_pawn_material(us)
                && self.skip_move(&node, mv, capture, noisy || gives_check, legal_moves, alpha)
            {
                continue;
            }

            searched += 1;
            let extension = if mv == tt_move { singular_extension } else { 0 };
            let new_depth = depth - 1 + extension;

            self.stack.set_move(ply, mv, moved);
            self.pos.apply_move(mv);

            let mut score;
            if searched == 1 {
                let child = if pv_node { NodeKind::Pv } else { NodeKind::NonPv };
                score = -self.search(child, -beta, -alpha, new_depth, ply + 1);
            } else {
                let mut r = 0;
                if depth >= self.params.lmr_min_depth && !(pv_node && capture) {
                    r = reduction(depth, searched);
                    if !noisy {
                        let history = self.histories.butterfly(us, mv)
                            + self.histories.continuation(context[0], moved, mv.to());
                        r -= history / self.params.lmr_history_divisor;
                        if order_score >= REFUTATION_SCORE {
                            r -= 1;
                        }
                    }
                    if pv_node {
                        r -= 1;
                    }
                    if in_check || gives_check {
                        r -= 1;
                    }
                    r = r.min(new_depth - 1).max(0);
                }

                score = -self.search(NodeKind::NonPv, -alpha - 1, -alpha, new_depth - r, ply + 1);
                if score > alpha && r > 0 {
                    score = -self.search(NodeKind::NonPv, -alpha - 1, -alpha, new_depth, ply + 1);
                }
                if pv_node && score > alpha && score < beta {
                    score = -self.search(NodeKind::Pv, -beta, -alpha, new_depth, ply + 1);
                }
            }

            self.pos.undo_move();
            if self.stopped() {
                return STOP_SCORE;
            }

            if score > best_score {
                best_score = score;
                if score > alpha {
                    best_move = mv;
                    if pv_node {
                        self.stack.update_pv(ply, mv);
                    }
                    if score >= beta {
                        self.histories.update(
                            &self.pos,
                            ply,
                            &context,
                            mv,
                            depth,
                            quiets_tried.as_slice(),
                            captures_tried.as_slice(),
                        );
                        break;
                    }
                    alpha = score;
                }
            }

            if capture {
                captures_tried.push(mv);
            } else {
                quiets_tried.push(mv);
            }
        }

        if legal_moves == 0 {
            return if !excluded.is_null() {
                alpha
            } else if in_check {
                mated_in(ply)
            } else {
                DRAW
            };
        }

        if excluded.is_null() {
            let node_type = if best_score >= beta {
                NodeType::Cut
            } else if pv_node && !best_move.is_null() {
                NodeType::Pv
            } else {
                NodeType::All
            };
            self.shared.tt.save(
                key,
                score_to_tt(best_score, ply),
                static_eval,
                best_move,
                depth,
                node_type,
            );
        }

        best_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SearchLimits;
    use crate::eval::ClassicalEvaluator;

    const FOOLS_MATE: &str = "rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 0 1";

    fn worker_for(fen: &str) -> Worker {
        let pos = Position::from_fen(fen).expect("valid fen");
        let shared = Arc::new(SharedState {
            tt: Arc::new(TranspositionTable::new(1)),
            evaluator: Arc::new(ClassicalEvaluator::new()),
            stop: StopFlag::new(),
            nodes: NodeCounter::new(),
            params: SearchParams::default(),
            time: TimeManager::new(&SearchLimits::depth(1), pos.side_to_move()),
            info_callback: None,
        });
        Worker::new(0, pos, shared)
    }

    #[test]
    fn test_quiescence_scores_mated_node() {
        let mut worker = worker_for(FOOLS_MATE);
        assert_eq!(worker.quiescence(-INFINITE, INFINITE, 3), mated_in(3));
    }

    #[test]
    fn test_search_scores_mated_node() {
        let mut worker = worker_for(FOOLS_MATE);
        assert_eq!(
            worker.search(NodeKind::NonPv, -INFINITE, INFINITE, 1, 3),
            mated_in(3)
        );
        let mut worker = worker_for(FOOLS_MATE);
        assert_eq!(worker.search(NodeKind::Pv, -INFINITE, INFINITE, 2, 3), mated_in(3));
    }

    #[test]
    fn test_search_scores_stalemate_as_draw() {
        let mut worker = worker_for("k7/8/1QK5/8/8/8/8/8 b - - 0 1");
        assert_eq!(worker.search(NodeKind::NonPv, -INFINITE, INFINITE, 1, 3), DRAW);
    }

    #[test]
    fn test_reduction_table_shape() {
        assert_eq!(reduction(1, 1), 0);
        assert_eq!(reduction(0, 40), 0);
        assert!(reduction(10, 20) > reduction(3, 3));
        assert!(reduction(63, 63) >= reduction(10, 20));
        // Out-of-table arguments saturate
        assert_eq!(reduction(500, 500), reduction(63, 63));
    }

    #[test]
    fn test_bound_cutoffs() {
        assert!(bound_allows_cutoff(NodeType::Pv, 10, 20, 30));
        assert!(bound_allows_cutoff(NodeType::Cut, 30, 20, 30));
        assert!(!bound_allows_cutoff(NodeType::Cut, 29, 20, 30));
        assert!(bound_allows_cutoff(NodeType::All, 20, 20, 30));
        assert!(!bound_allows_cutoff(NodeType::All, 21, 20, 30));
        assert!(!bound_allows_cutoff(NodeType::None, 0, 20, 30));
    }
}
