//! Move-ordering statistics learned during search.
//!
//! One `Histories` value belongs to each search thread. All tables use the
//! same gravity update: a bonus moves an entry toward `HISTORY_MAX` and a
//! malus toward `-HISTORY_MAX`, each step proportional to the remaining
//! distance, so entries stay strictly inside the bounds.

use super::constants::MAX_PLY;
use super::stack::ContinuationKeys;
use crate::board::{Color, ColoredPiece, Move, Piece, Position, Square};

pub const HISTORY_MAX: i32 = 30000;

const BUTTERFLY_FILL: i16 = -425;
const CAPTURE_FILL: i16 = -415;
const CONTINUATION_FILL: i16 = -470;

/// Bonus and malus multipliers per table
const BUTTERFLY_BONUS: i32 = 6;
const BUTTERFLY_MALUS: i32 = 3;
const CAPTURE_BONUS: i32 = 4;
const CAPTURE_MALUS: i32 = 5;
const CONTINUATION_BONUS: i32 = 2;
const CONTINUATION_MALUS: i32 = 2;

/// Depth-scaled update size.
#[inline]
fn stat_bonus(depth: i32) -> i32 {
    (153 * depth - 133).clamp(0, 1525)
}

/// Flat table of bounded `i16` statistics.
struct HistoryTable {
    entries: Box<[i16]>,
}

impl HistoryTable {
    fn new(len: usize, fill: i16) -> Self {
        HistoryTable {
            entries: vec![fill; len].into_boxed_slice(),
        }
    }

    #[inline]
    fn get(&self, idx: usize) -> i32 {
        i32::from(self.entries[idx])
    }

    fn increase(&mut self, idx: usize, scale: i32, depth: i32) {
        let e = &mut self.entries[idx];
        let v = i32::from(*e);
        *e = (v + scale * stat_bonus(depth) * (HISTORY_MAX - v) / HISTORY_MAX) as i16;
    }

    fn decrease(&mut self, idx: usize, scale: i32, depth: i32) {
        let e = &mut self.entries[idx];
        let v = i32::from(*e);
        *e = (v - scale * stat_bonus(depth) * (HISTORY_MAX + v) / HISTORY_MAX) as i16;
    }

    fn fill(&mut self, value: i16) {
        self.entries.fill(value);
    }
}

#[inline]
fn butterfly_index(color: Color, mv: Move) -> usize {
    (color.index() * 64 + mv.from().index()) * 64 + mv.to().index()
}

#[inline]
fn continuation_index(prev: (ColoredPiece, Square), piece: ColoredPiece, to: Square) -> usize {
    ((prev.0.code() * 64 + prev.1.index()) * ColoredPiece::COUNT + piece.code()) * 64 + to.index()
}

/// Killers, counter moves and the butterfly, capture and continuation
/// histories of one search thread.
pub(crate) struct Histories {
    killers: Box<[[Move; 2]]>,
    /// `[moved piece][to]` of the previous move
    counter: Box<[Move]>,
    /// `[color][from][to]`
    butterfly: HistoryTable,
    /// `[moved piece][capture square][captured type]`
    capture: HistoryTable,
    /// `[previous piece][previous to][moved piece][to]`
    continuation: HistoryTable,
}

impl Histories {
    pub fn new() -> Self {
        Histories {
            killers: vec![[Move::null(); 2]; MAX_PLY + 1].into_boxed_slice(),
            counter: vec![Move::null(); ColoredPiece::COUNT * 64].into_boxed_slice(),
            butterfly: HistoryTable::new(2 * 64 * 64, BUTTERFLY_FILL),
            capture: HistoryTable::new(ColoredPiece::COUNT * 64 * 6, CAPTURE_FILL),
            continuation: HistoryTable::new(
                ColoredPiece::COUNT * 64 * ColoredPiece::COUNT * 64,
                CONTINUATION_FILL,
            ),
        }
    }

    pub fn clear(&mut self) {
        self.killers.fill([Move::null(); 2]);
        self.counter.fill(Move::null());
        self.butterfly.fill(BUTTERFLY_FILL);
        self.capture.fill(CAPTURE_FILL);
        self.continuation.fill(CONTINUATION_FILL);
    }

    #[inline]
    pub fn killers(&self, ply: usize) -> [Move; 2] {
        self.killers
            .get(ply)
            .copied()
            .unwrap_or([Move::null(); 2])
    }

    /// Reply that last refuted the previous move.
    #[inline]
    pub fn counter(&self, prev: Option<(ColoredPiece, Square)>) -> Move {
        prev.map_or(Move::null(), |(piece, to)| {
            self.counter[piece.code() * 64 + to.index()]
        })
    }

    #[inline]
    pub fn butterfly(&self, color: Color, mv: Move) -> i32 {
        self.butterfly.get(butterfly_index(color, mv))
    }

    /// Capture history of `mv`; 0 for non-captures.
    pub fn capture(&self, pos: &Position, mv: Move) -> i32 {
        capture_index(pos, mv).map_or(0, |idx| self.capture.get(idx))
    }

    /// Continuation history of moving `piece` to `to` after the context move.
    #[inline]
    pub fn continuation(
        &self,
        prev: Option<(ColoredPiece, Square)>,
        piece: ColoredPiece,
        to: Square,
    ) -> i32 {
        prev.map_or(0, |prev| self.continuation.get(continuation_index(prev, piece, to)))
    }

    /// Reward `best` after a beta cutoff and penalize the moves tried before it.
    ///
    /// `quiets` and `captures` hold the moves searched before `best`.
    pub fn update(
        &mut self,
        pos: &Position,
        ply: usize,
        context: &ContinuationKeys,
        best: Move,
        depth: i32,
        quiets: &[Move],
        captures: &[Move],
    ) {
        if let Some(idx) = capture_index(pos, best) {
            self.capture.increase(idx, CAPTURE_BONUS, depth);
        } else {
            if let Some(slot) = self.killers.get_mut(ply) {
                if slot[0] != best {
                    slot[1] = slot[0];
                    slot[0] = best;
                }
            }
            if let Some((piece, to)) = context[0] {
                self.counter[piece.code() * 64 + to.index()] = best;
            }

            let us = pos.side_to_move();
            self.butterfly
                .increase(butterfly_index(us, best), BUTTERFLY_BONUS, depth);
            self.update_continuation(pos, context, best, depth, true);

            for &mv in quiets {
                self.butterfly
                    .decrease(butterfly_index(us, mv), BUTTERFLY_MALUS, depth);
                self.update_continuation(pos, context, mv, depth, false);
            }
        }

        for &mv in captures {
            if let Some(idx) = capture_index(pos, mv) {
                self.capture.decrease(idx, CAPTURE_MALUS, depth);
            }
        }
    }

    fn update_continuation(
        &mut self,
        pos: &Position,
        context: &ContinuationKeys,
        mv: Move,
        depth: i32,
        bonus: bool,
    ) {
        let piece = pos.piece_on(mv.from());
        // Deeper contexts only count while the shallower ones exist.
        for prev in context.iter().map_while(|prev| *prev) {
            let idx = continuation_index(prev, piece, mv.to());
            if bonus {
                self.continuation.increase(idx, CONTINUATION_BONUS, depth);
            } else {
                self.continuation.decrease(idx, CONTINUATION_MALUS, depth);
            }
        }
    }
}

/// Capture-history slot of `mv`, keyed on the square the victim stands on.
fn capture_index(pos: &Position, mv: Move) -> Option<usize> {
    let captured = pos.captured_piece(mv)?;
    let square = if mv.is_en_passant() {
        mv.to().offset(-pos.side_to_move().pawn_push())
    } else {
        mv.to()
    };
    let moved = pos.piece_on(mv.from());
    Some((moved.code() * 64 + square.index()) * Piece::ALL.len() + captured.index())
}
