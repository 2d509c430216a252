//! Per-iteration search progress reports.

use std::fmt;
use std::sync::Arc;

use super::constants::{is_mate_score, MATE};
use crate::board::Move;

/// Score as shown to a user: centipawns or moves to mate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreReport {
    Centipawns(i32),
    /// Full moves until mate; negative when the side to move gets mated
    Mate(i32),
}

impl ScoreReport {
    #[must_use]
    pub fn from_score(score: i32) -> Self {
        if !is_mate_score(score) {
            ScoreReport::Centipawns(score)
        } else if score > 0 {
            ScoreReport::Mate((MATE - score + 1) / 2)
        } else {
            ScoreReport::Mate(-((MATE + score) / 2))
        }
    }
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreReport::Centipawns(cp) => write!(f, "cp {cp}"),
            ScoreReport::Mate(n) => write!(f, "mate {n}"),
        }
    }
}

/// Progress after one completed iterative-deepening iteration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchInfo {
    pub depth: u32,
    pub seldepth: u32,
    pub score: ScoreReport,
    /// Nodes summed over all search threads
    pub nodes: u64,
    pub nps: u64,
    /// Permill of the transposition table in use
    pub hashfull: u32,
    pub time_ms: u64,
    pub pv: Vec<Move>,
}

impl fmt::Display for SearchInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "info depth {} seldepth {} score {} nodes {} nps {} hashfull {} time {} pv",
            self.depth, self.seldepth, self.score, self.nodes, self.nps, self.hashfull, self.time_ms
        )?;
        for mv in &self.pv {
            write!(f, " {mv}")?;
        }
        Ok(())
    }
}

/// Receives a [`SearchInfo`] from the main search thread after each iteration.
pub type SearchInfoCallback = Arc<dyn Fn(&SearchInfo) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    #[test]
    fn test_score_report_conversion() {
        assert_eq!(ScoreReport::from_score(35), ScoreReport::Centipawns(35));
        assert_eq!(ScoreReport::from_score(MATE - 1), ScoreReport::Mate(1));
        assert_eq!(ScoreReport::from_score(MATE - 3), ScoreReport::Mate(2));
        assert_eq!(ScoreReport::from_score(-MATE + 2), ScoreReport::Mate(-1));
        assert_eq!(ScoreReport::from_score(-MATE + 4), ScoreReport::Mate(-2));
    }

    #[test]
    fn test_info_line_format() {
        let info = SearchInfo {
            depth: 3,
            seldepth: 5,
            score: ScoreReport::Centipawns(-12),
            nodes: 1500,
            nps: 30000,
            hashfull: 2,
            time_ms: 50,
            pv: vec![Move::new(Square::E1, Square::F1), Move::new(Square::E8, Square::D8)],
        };
        assert_eq!(
            info.to_string(),
            "info depth 3 seldepth 5 score cp -12 nodes 1500 nps 30000 hashfull 2 time 50 pv e1f1 e8d8"
        );
        assert_eq!(ScoreReport::Mate(-2).to_string(), "mate -2");
    }
}
