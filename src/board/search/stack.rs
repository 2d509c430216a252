//! Per-ply search stack.

use super::constants::MAX_PLY;
use crate::board::{ColoredPiece, Move, Square};

/// Entries below ply 0, so continuation lookups at `ply - 4` never underflow
const OFFSET: usize = 4;

/// Continuation-history contexts: the moves made 1, 2 and 4 plies earlier,
/// as (moved piece, destination). `None` where no real move was made.
pub(crate) type ContinuationKeys = [Option<(ColoredPiece, Square)>; 3];

#[derive(Clone)]
pub(crate) struct StackEntry {
    pv: [Move; MAX_PLY + 1],
    pv_len: usize,
    /// Move made from this ply, null for a null move
    pub mv: Move,
    pub moved: ColoredPiece,
    pub static_eval: i32,
    /// Move skipped by a singular-extension verification search
    pub excluded: Move,
}

impl StackEntry {
    fn new() -> Self {
        StackEntry {
            pv: [Move::null(); MAX_PLY + 1],
            pv_len: 0,
            mv: Move::null(),
            moved: ColoredPiece::NONE,
            static_eval: 0,
            excluded: Move::null(),
        }
    }
}

pub(crate) struct SearchStack {
    entries: Vec<StackEntry>,
}

impl SearchStack {
    pub fn new() -> Self {
        SearchStack {
            entries: vec![StackEntry::new(); MAX_PLY + OFFSET + 2],
        }
    }

    pub fn clear(&mut self) {
        for entry in &mut self.entries {
            entry.pv_len = 0;
            entry.mv = Move::null();
            entry.moved = ColoredPiece::NONE;
            entry.static_eval = 0;
            entry.excluded = Move::null();
        }
    }

    #[inline]
    pub fn at(&self, ply: usize) -> &StackEntry {
        &self.entries[ply + OFFSET]
    }

    #[inline]
    pub fn at_mut(&mut self, ply: usize) -> &mut StackEntry {
        &mut self.entries[ply + OFFSET]
    }

    /// Record the move leaving `ply`.
    #[inline]
    pub fn set_move(&mut self, ply: usize, mv: Move, moved: ColoredPiece) {
        let entry = self.at_mut(ply);
        entry.mv = mv;
        entry.moved = moved;
    }

    /// The move that led into `ply`, if it was a real move.
    #[inline]
    pub fn previous(&self, ply: usize) -> Option<(ColoredPiece, Square)> {
        self.context_at(ply, 1)
    }

    pub fn continuation_keys(&self, ply: usize) -> ContinuationKeys {
        [
            self.context_at(ply, 1),
            self.context_at(ply, 2),
            self.context_at(ply, 4),
        ]
    }

    fn context_at(&self, ply: usize, back: usize) -> Option<(ColoredPiece, Square)> {
        let entry = &self.entries[ply + OFFSET - back];
        (!entry.mv.is_null()).then(|| (entry.moved, entry.mv.to()))
    }

    #[inline]
    pub fn clear_pv(&mut self, ply: usize) {
        self.at_mut(ply).pv_len = 0;
    }

    /// PV at `ply` becomes `mv` followed by the child's PV.
    pub fn update_pv(&mut self, ply: usize, mv: Move) {
        let idx = ply + OFFSET;
        let (head, tail) = self.entries.split_at_mut(idx + 1);
        let entry = &mut head[idx];
        let child = &tail[0];
        let len = (child.pv_len + 1).min(MAX_PLY + 1);
        entry.pv[0] = mv;
        entry.pv[1..len].copy_from_slice(&child.pv[..len - 1]);
        entry.pv_len = len;
    }

    pub fn pv(&self, ply: usize) -> &[Move] {
        let entry = self.at(ply);
        &entry.pv[..entry.pv_len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, Piece};

    #[test]
    fn test_pv_is_built_from_children() {
        let mut stack = SearchStack::new();
        let a = Move::new(Square::E1, Square::F1);
        let b = Move::new(Square::E8, Square::D8);
        let c = Move::new(Square::F1, Square::G1);

        stack.clear_pv(3);
        stack.update_pv(2, c);
        stack.update_pv(1, b);
        stack.update_pv(0, a);
        assert_eq!(stack.pv(0), &[a, b, c]);

        stack.clear_pv(1);
        stack.update_pv(0, b);
        assert_eq!(stack.pv(0), &[b]);
    }

    #[test]
    fn test_continuation_keys_skip_null_moves() {
        let mut stack = SearchStack::new();
        let knight = ColoredPiece::new(Color::White, Piece::Knight);
        let mv = Move::new(Square::G1, Square::F1);
        stack.set_move(0, mv, knight);
        stack.set_move(1, Move::null(), ColoredPiece::NONE);

        assert_eq!(stack.previous(1), Some((knight, Square::F1)));
        assert_eq!(stack.continuation_keys(2), [None, Some((knight, Square::F1)), None]);
        assert_eq!(stack.continuation_keys(0), [None, None, None]);
    }
}
