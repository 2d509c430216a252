//! Staged move ordering.
//!
//! The hash move is tried before any generation happens. Only if it fails
//! to cut are the remaining legal moves generated, scored once and handed
//! out best first.

use super::history::Histories;
use super::stack::SearchStack;
use crate::board::{Bitboard, Move, Piece, Position, ScoredMoveList, SEE_VALUES};

// ============================================================================
// MOVE ORDERING PRIORITIES
// ============================================================================
// Winning captures > killers > counter > quiets by history > losing captures

const GOOD_CAPTURE: i32 = 1_000_000;
const BAD_CAPTURE: i32 = -1_000_000;
const VICTIM_WEIGHT: i32 = 89;
const KILLER1: i32 = 500_004;
const KILLER2: i32 = 500_003;
const KILLER_PLY2: i32 = 500_002;
const COUNTER: i32 = 500_001;
/// Moving a piece attacked by a cheaper enemy piece to a square that cheaper
/// piece does not attack
const THREAT_ESCAPE: i32 = 561;

/// Quiet scores at or above this come from killers or the counter move
pub(crate) const REFUTATION_SCORE: i32 = COUNTER;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    HashMove,
    Init,
    Normal,
}

/// Squares attacked by cheaper enemy pieces, per attacked piece type.
struct Threats {
    by_pawn: Bitboard,
    by_minor: Bitboard,
    by_rook: Bitboard,
    threatened: Bitboard,
}

impl Threats {
    fn new(pos: &Position) -> Self {
        let us = pos.side_to_move();
        let by_pawn = pos.enemy_attacks(Piece::Pawn);
        let by_minor =
            by_pawn | pos.enemy_attacks(Piece::Knight) | pos.enemy_attacks(Piece::Bishop);
        let by_rook = by_minor | pos.enemy_attacks(Piece::Rook);
        let minors = pos.pieces_of_type(Piece::Knight) | pos.pieces_of_type(Piece::Bishop);
        let threatened = pos.color(us)
            & ((by_pawn & minors)
                | (by_minor & pos.pieces_of_type(Piece::Rook))
                | (by_rook & pos.pieces_of_type(Piece::Queen)));
        Threats {
            by_pawn,
            by_minor,
            by_rook,
            threatened,
        }
    }

    fn escapes(&self, piece: Piece, mv: Move) -> bool {
        if !self.threatened.contains(mv.from()) {
            return false;
        }
        let danger = match piece {
            Piece::Knight | Piece::Bishop => self.by_pawn,
            Piece::Rook => self.by_minor,
            Piece::Queen => self.by_rook,
            _ => return false,
        };
        !danger.contains(mv.to())
    }
}

pub(crate) struct MoveSorter {
    hash_move: Move,
    moves: ScoredMoveList,
    idx: usize,
    stage: Stage,
    last_score: i32,
}

impl MoveSorter {
    pub fn new(hash_move: Move) -> Self {
        MoveSorter {
            hash_move,
            moves: ScoredMoveList::new(),
            idx: 0,
            stage: Stage::HashMove,
            last_score: 0,
        }
    }

    /// Ordering score of the move most recently returned by `next`.
    ///
    /// The hash move reports `i32::MAX`.
    #[inline]
    pub fn last_score(&self) -> i32 {
        self.last_score
    }

    /// Next legal move, or `None` once every move has been returned.
    pub fn next(
        &mut self,
        pos: &mut Position,
        histories: &Histories,
        stack: &SearchStack,
        ply: usize,
    ) -> Option<Move> {
        if self.stage == Stage::HashMove {
            self.stage = Stage::Init;
            let hash = self.hash_move;
            // Stale or colliding TT moves are filtered here.
            if !hash.is_null() && pos.is_pseudo_legal(hash) && pos.is_legal(hash) {
                self.last_score = i32::MAX;
                return Some(hash);
            }
        }

        if self.stage == Stage::Init {
            self.stage = Stage::Normal;
            self.score_moves(pos, histories, stack, ply);
        }

        let scored = self.moves.get(self.idx)?;
        self.idx += 1;
        self.last_score = scored.score;
        Some(scored.mv)
    }

    fn score_moves(&mut self, pos: &mut Position, histories: &Histories, stack: &SearchStack, ply: usize) {
        let legal = pos.generate_legal();
        let threats = Threats::new(pos);
        let killers = histories.killers(ply);
        let grand_killer = if ply >= 2 {
            histories.killers(ply - 2)[0]
        } else {
            Move::null()
        };
        let context = stack.continuation_keys(ply);
        let counter = histories.counter(context[0]);
        let us = pos.side_to_move();

        for &mv in &legal {
            if mv == self.hash_move {
                continue;
            }
            let score = if let Some(victim) = pos.captured_piece(mv) {
                let base = if pos.see_ge(mv, 0) { GOOD_CAPTURE } else { BAD_CAPTURE };
                base + VICTIM_WEIGHT * SEE_VALUES[victim.index()] + histories.capture(pos, mv)
            } else if mv == killers[0] {
                KILLER1
            } else if mv == killers[1] {
                KILLER2
            } else if mv == grand_killer {
                KILLER_PLY2
            } else if mv == counter {
                COUNTER
            } else {
                let moved = pos.piece_on(mv.from());
                let to = mv.to();
                let mut s = histories.butterfly(us, mv) / 155
                    + histories.continuation(context[0], moved, to) / 52
                    + histories.continuation(context[1], moved, to) / 61
                    + histories.continuation(context[2], moved, to) / 64;
                if moved.piece().is_some_and(|piece| threats.escapes(piece, mv)) {
                    s += THREAT_ESCAPE;
                }
                s
            };
            self.moves.push(mv, score);
        }
        self.moves.sort_by_score_desc();
    }
}

/// Ordering for quiescence: most valuable victim first, then capture history.
pub(crate) fn order_noisy(pos: &Position, histories: &Histories, moves: &[Move]) -> ScoredMoveList {
    let mut scored = ScoredMoveList::new();
    for &mv in moves {
        let victim = pos.captured_piece(mv).map_or(0, |p| SEE_VALUES[p.index()]);
        let promo = mv.promotion_piece().map_or(0, |p| SEE_VALUES[p.index()]);
        scored.push(mv, VICTIM_WEIGHT * (victim + promo) + histories.capture(pos, mv));
    }
    scored.sort_by_score_desc();
    scored
}
