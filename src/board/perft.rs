//! Perft: exhaustive leaf counting of the legal move tree.

use super::state::Position;
use super::types::Move;

impl Position {
    /// Count leaf nodes `depth` plies below this position.
    ///
    /// The last ply is bulk-counted from the legal move list.
    pub fn perft(&mut self, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.generate_legal();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for &mv in &moves {
            self.apply_move(mv);
            nodes += self.perft(depth - 1);
            self.undo_move();
        }
        nodes
    }

    /// Leaf counts below each root move, in generation order.
    pub fn perft_divide(&mut self, depth: usize) -> Vec<(Move, u64)> {
        if depth == 0 {
            return Vec::new();
        }
        let moves = self.generate_legal();
        let mut out = Vec::with_capacity(moves.len());
        for &mv in &moves {
            self.apply_move(mv);
            out.push((mv, self.perft(depth - 1)));
            self.undo_move();
        }
        out
    }
}
