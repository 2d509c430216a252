use super::super::constants::{is_mate_score, INFINITE};
use super::super::log::{ScoreReport, SearchInfo};
use super::{Completed, NodeKind, Worker};

/// Helpers on odd ids start one ply deeper so the threads spread over depths.
fn depth_offset(id: usize) -> i32 {
    (id % 2) as i32
}

impl Worker {
    /// Iterative deepening with aspiration windows. Returns the deepest
    /// completed iteration, if any.
    pub fn iterative_deepening(mut self) -> Option<Completed> {
        self.histories.clear();
        self.stack.clear();

        let offset = if self.is_main() { 0 } else { depth_offset(self.id) };
        let max_depth = self.shared.time.max_depth() + offset;
        let mut score = 0;

        for depth in (1 + offset)..=max_depth {
            if self.stopped() {
                break;
            }
            if self.is_main() && depth > 1 && !self.shared.time.can_start_iteration() {
                break;
            }

            self.seldepth = 0;
            let Some(s) = self.aspiration(depth, score) else {
                break;
            };
            score = s;

            let pv = self.stack.pv(0).to_vec();
            if pv.is_empty() {
                // Mated or stalemated at the root
                break;
            }
            self.completed = Some(Completed { depth, score, pv });
            if self.is_main() {
                self.report();
            }
        }

        self.flush_nodes();
        if self.is_main() {
            self.shared.stop.stop();
        }
        self.completed
    }

    /// Search one depth, re-searching with a wider window until the score
    /// falls inside it. `None` if the search was stopped.
    fn aspiration(&mut self, depth: i32, previous: i32) -> Option<i32> {
        // Helpers perturb the window so their trees differ from the main thread's.
        let mut delta = self.params.aspiration_delta + 2 * (self.id % 4) as i32;
        let (mut alpha, mut beta) = if depth <= 1 || is_mate_score(previous) {
            (-INFINITE, INFINITE)
        } else {
            (previous - delta, previous + delta)
        };

        loop {
            let score = self.search(NodeKind::Root, alpha, beta, depth, 0);
            if self.stopped() {
                return None;
            }

            if score <= alpha {
                alpha = (alpha - delta).max(-INFINITE);
            } else if score >= beta {
                beta = (beta + delta).min(INFINITE);
            } else {
                return Some(score);
            }

            delta *= 2;
            if delta > self.params.aspiration_max {
                alpha = -INFINITE;
                beta = INFINITE;
            }
        }
    }

    fn report(&mut self) {
        let Some(callback) = self.shared.info_callback.clone() else {
            return;
        };
        let nodes = self.flush_nodes();
        let Some(done) = &self.completed else {
            return;
        };

        let time_ms = self.shared.time.elapsed_ms();
        let info = SearchInfo {
            depth: done.depth as u32,
            seldepth: self.seldepth as u32,
            score: ScoreReport::from_score(done.score),
            nodes,
            nps: nodes * 1000 / time_ms.max(1),
            hashfull: self.shared.tt.hashfull(),
            time_ms,
            pv: done.pv.clone(),
        };
        log::trace!("{info}");
        callback(&info);
    }
}
