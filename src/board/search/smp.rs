//! Lazy SMP (Symmetric `MultiProcessing`) parallel search.
//!
//! Every thread runs the same iterative deepening over its own copy of the
//! position with its own killers and histories. The transposition table is
//! the only channel between them. The main thread owns time control: when it
//! finishes it raises the stop flag, the helpers unwind, and the main
//! thread's last completed iteration becomes the result.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::log::SearchInfoCallback;
use super::params::SearchParams;
use super::worker::{Completed, SharedState, Worker};
use super::SearchResult;
use crate::board::{Move, Position};
use crate::engine::{SearchLimits, TimeManager};
use crate::eval::Evaluator;
use crate::sync::{NodeCounter, StopFlag};
use crate::tt::TranspositionTable;

/// Search thread stack size (32 MB to handle deep recursion)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Configuration for one parallel search.
#[derive(Clone, Default)]
pub struct SmpConfig {
    /// Number of worker threads, at least one
    pub threads: usize,
    pub params: SearchParams,
    /// Receives a report after every completed iteration of the main thread
    pub info_callback: Option<SearchInfoCallback>,
}

impl SmpConfig {
    #[must_use]
    pub fn with_threads(threads: usize) -> Self {
        SmpConfig {
            threads: threads.max(1),
            ..SmpConfig::default()
        }
    }

    #[must_use]
    pub fn with_callback(mut self, callback: SearchInfoCallback) -> Self {
        self.info_callback = Some(callback);
        self
    }
}

/// Run a Lazy SMP search of `pos` and block until it finishes.
///
/// The search ends when the limits are reached or `stop` is raised from
/// outside. The flag is left raised afterwards.
pub fn smp_search(
    pos: &Position,
    limits: &SearchLimits,
    tt: &Arc<TranspositionTable>,
    evaluator: &Arc<dyn Evaluator>,
    config: SmpConfig,
    stop: &StopFlag,
) -> SearchResult {
    let threads = config.threads.max(1);
    let shared = Arc::new(SharedState {
        tt: Arc::clone(tt),
        evaluator: Arc::clone(evaluator),
        stop: stop.clone(),
        nodes: NodeCounter::new(),
        params: config.params,
        time: TimeManager::new(limits, pos.side_to_move()),
        info_callback: config.info_callback,
    });

    let mut handles: Vec<(usize, JoinHandle<Option<Completed>>)> = Vec::with_capacity(threads);
    for id in 0..threads {
        let worker = Worker::new(id, pos.clone(), Arc::clone(&shared));
        let spawned = thread::Builder::new()
            .name(format!("search-{id}"))
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || worker.iterative_deepening());
        match spawned {
            Ok(handle) => handles.push((id, handle)),
            Err(err) => log::warn!("failed to spawn search thread {id}: {err}"),
        }
    }

    // Helpers only end on the stop flag; without a main thread nobody raises it.
    if !handles.iter().any(|(id, _)| *id == 0) {
        stop.stop();
    }

    let mut main_result = None;
    let mut helper_best: Option<Completed> = None;
    for (id, handle) in handles {
        let Ok(result) = handle.join() else {
            log::error!("search thread {id} panicked");
            continue;
        };
        if id == 0 {
            main_result = result;
        } else if let Some(done) = result {
            if helper_best.as_ref().map_or(true, |best| done.depth > best.depth) {
                helper_best = Some(done);
            }
        }
    }

    let nodes = shared.nodes.get();
    let mut pos = pos.clone();
    let completed = main_result
        .or(helper_best)
        .and_then(|done| done.pv.first().copied().map(|mv| (mv, done)));
    match completed {
        Some((best_move, done)) => {
            let ponder_move = done
                .pv
                .get(1)
                .copied()
                .or_else(|| ponder_from_tt(&mut pos, tt, best_move));
            SearchResult {
                best_move: Some(best_move),
                ponder_move,
                score: done.score,
                depth: done.depth as u32,
                nodes,
                pv: done.pv,
            }
        }
        None => {
            // Stopped before depth 1 completed
            let best_move = pos.generate_legal().iter().next().copied();
            SearchResult {
                best_move,
                ponder_move: None,
                score: 0,
                depth: 0,
                nodes,
                pv: best_move.into_iter().collect(),
            }
        }
    }
}

/// Expected reply from the hash table after playing `best`.
fn ponder_from_tt(pos: &mut Position, tt: &TranspositionTable, best: Move) -> Option<Move> {
    pos.apply_move(best);
    let reply = tt
        .probe(pos.key())
        .map(|entry| entry.best_move)
        .filter(|&mv| !mv.is_null() && pos.is_pseudo_legal(mv) && pos.is_legal(mv));
    pos.undo_move();
    reply
}
