//! Search limits and time management.
//!
//! A search is bounded by any combination of depth, nodes, a fixed move time
//! and the game clock. The clock budget is spent conservatively: roughly the
//! increment plus two percent of the remaining bank, minus a fixed overhead.

use std::time::{Duration, Instant};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::search::MAX_PLY;
use crate::board::Color;

/// Communication latency reserved from every clock-based budget
const MOVE_OVERHEAD_MS: u64 = 50;

/// Budgets never drop below this
const MIN_BUDGET_MS: u64 = 10;

/// One move spends this fraction of the remaining bank (after the increment)
const BANK_DIVISOR: u64 = 50;

/// What bounds a search. Times are in milliseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchLimits {
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub movetime: Option<u64>,
    /// Remaining clock time, indexed by `Color::index()`
    pub time: [Option<u64>; 2],
    /// Increment per move, indexed by `Color::index()`
    pub inc: [u64; 2],
    /// Ignore the clock; only `stop`, depth or nodes end the search
    pub infinite: bool,
}

impl SearchLimits {
    #[must_use]
    pub fn depth(depth: u32) -> Self {
        SearchLimits {
            depth: Some(depth),
            ..SearchLimits::default()
        }
    }

    #[must_use]
    pub fn nodes(nodes: u64) -> Self {
        SearchLimits {
            nodes: Some(nodes),
            ..SearchLimits::default()
        }
    }

    #[must_use]
    pub fn movetime(ms: u64) -> Self {
        SearchLimits {
            movetime: Some(ms),
            ..SearchLimits::default()
        }
    }

    #[must_use]
    pub fn infinite() -> Self {
        SearchLimits {
            infinite: true,
            ..SearchLimits::default()
        }
    }

    /// Clock-based limits for both sides.
    #[must_use]
    pub fn clock(wtime: u64, btime: u64, winc: u64, binc: u64) -> Self {
        SearchLimits {
            time: [Some(wtime), Some(btime)],
            inc: [winc, binc],
            ..SearchLimits::default()
        }
    }
}

/// Time to spend on one move given the remaining time and increment.
#[must_use]
pub fn clock_budget_ms(time: u64, inc: u64) -> u64 {
    let raw = if time < inc {
        time
    } else {
        (time - inc) / BANK_DIVISOR + inc
    };
    raw.saturating_sub(MOVE_OVERHEAD_MS).max(MIN_BUDGET_MS)
}

/// Clock and node accounting for one search.
#[derive(Clone, Debug)]
pub struct TimeManager {
    start: Instant,
    budget: Option<Duration>,
    node_limit: Option<u64>,
    max_depth: i32,
}

impl TimeManager {
    /// Starts the clock.
    #[must_use]
    pub fn new(limits: &SearchLimits, us: Color) -> Self {
        let budget_ms = if limits.infinite {
            None
        } else if let Some(ms) = limits.movetime {
            Some(ms.max(1))
        } else {
            limits.time[us.index()].map(|time| clock_budget_ms(time, limits.inc[us.index()]))
        };

        let max_depth = limits
            .depth
            .map_or(MAX_PLY as i32 - 1, |d| (d as i32).clamp(1, MAX_PLY as i32 - 1));

        TimeManager {
            start: Instant::now(),
            budget: budget_ms.map(Duration::from_millis),
            node_limit: limits.nodes,
            max_depth,
        }
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Budget for this move, `None` when the clock does not bound the search.
    #[must_use]
    pub fn budget(&self) -> Option<Duration> {
        self.budget
    }

    #[must_use]
    pub fn max_depth(&self) -> i32 {
        self.max_depth
    }

    /// Whether another iteration is worth starting: less than half the
    /// budget has been spent.
    #[must_use]
    pub fn can_start_iteration(&self) -> bool {
        self.budget.map_or(true, |budget| self.elapsed() < budget / 2)
    }

    /// Hard stop once the budget or node limit is exhausted.
    #[must_use]
    pub fn should_stop(&self, nodes: u64) -> bool {
        self.node_limit.is_some_and(|limit| nodes >= limit)
            || self.budget.is_some_and(|budget| self.elapsed() >= budget)
    }
}
