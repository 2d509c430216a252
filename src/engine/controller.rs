//! Engine controller implementation.

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::time::SearchLimits;
use crate::board::search::{smp_search, SearchInfoCallback, SearchParams, SearchResult, SmpConfig};
use crate::board::{BoardContext, FenError, MoveParseError, Position, START_FEN};
use crate::eval::{ClassicalEvaluator, Evaluator};
use crate::sync::StopFlag;
use crate::tt::{TranspositionTable, MAX_HASH_MB};

/// Upper bound on search threads regardless of the hardware
pub const MAX_THREADS: usize = 256;

/// Default hash size in MiB
pub const DEFAULT_HASH_MB: usize = 16;

/// Largest usable thread count on this machine.
#[must_use]
pub fn max_threads() -> usize {
    thread::available_parallelism()
        .map_or(1, std::num::NonZeroUsize::get)
        .min(MAX_THREADS)
}

/// User-adjustable engine options.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Transposition table size in MiB
    pub hash_mb: usize,
    /// Number of Lazy SMP search threads
    pub threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            hash_mb: DEFAULT_HASH_MB,
            threads: 1,
        }
    }
}

/// Error type for engine control requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The position string could not be parsed
    InvalidFen { source: FenError },
    /// A move of the move list is malformed or illegal
    InvalidMove { index: usize, source: MoveParseError },
    /// The request needs the engine idle but a search is running
    Busy,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidFen { source } => write!(f, "Invalid position: {source}"),
            EngineError::InvalidMove { index, source } => {
                write!(f, "Invalid move #{}: {source}", index + 1)
            }
            EngineError::Busy => write!(f, "Engine is searching"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::InvalidFen { source } => Some(source),
            EngineError::InvalidMove { source, .. } => Some(source),
            EngineError::Busy => None,
        }
    }
}

impl From<FenError> for EngineError {
    fn from(source: FenError) -> Self {
        EngineError::InvalidFen { source }
    }
}

/// Background search started by [`Engine::go`].
struct SearchJob {
    handle: JoinHandle<()>,
}

/// Engine state: the game position, the shared hash table and the running
/// search, if any.
pub struct Engine {
    config: EngineConfig,
    position: Position,
    tt: Arc<TranspositionTable>,
    evaluator: Arc<dyn Evaluator>,
    params: SearchParams,
    info_callback: Option<SearchInfoCallback>,
    stop: StopFlag,
    job: Option<SearchJob>,
    /// Result of the last finished background search
    result: Arc<Mutex<Option<SearchResult>>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Engine with the default configuration and the classical evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_evaluator(config, Arc::new(ClassicalEvaluator::new()))
    }

    #[must_use]
    pub fn with_evaluator(config: EngineConfig, evaluator: Arc<dyn Evaluator>) -> Self {
        let config = EngineConfig {
            hash_mb: config.hash_mb.clamp(1, MAX_HASH_MB),
            threads: config.threads.clamp(1, max_threads()),
        };
        log::info!(
            "engine: hash {} MiB, {} thread(s), {} evaluation",
            config.hash_mb,
            config.threads,
            evaluator.name()
        );
        Engine {
            tt: Arc::new(TranspositionTable::new(config.hash_mb)),
            position: Position::startpos_in(Arc::new(BoardContext::new())),
            config,
            evaluator,
            params: SearchParams::default(),
            info_callback: None,
            stop: StopFlag::new(),
            job: None,
            result: Arc::new(Mutex::new(None)),
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Whether a background search is still running.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.job.as_ref().is_some_and(|job| !job.handle.is_finished())
    }

    fn ensure_idle(&mut self) -> Result<(), EngineError> {
        if self.is_searching() {
            return Err(EngineError::Busy);
        }
        // Reap a finished job so its handle does not linger.
        self.wait();
        Ok(())
    }

    /// Resize the transposition table, dropping its contents. Returns the
    /// size actually used.
    pub fn set_hash(&mut self, mb: usize) -> Result<usize, EngineError> {
        self.ensure_idle()?;
        let mb = mb.clamp(1, MAX_HASH_MB);
        if mb != self.config.hash_mb {
            self.tt = Arc::new(TranspositionTable::new(mb));
            self.config.hash_mb = mb;
            log::info!("hash set to {mb} MiB");
        }
        Ok(mb)
    }

    /// Set the number of search threads. Returns the count actually used.
    pub fn set_threads(&mut self, threads: usize) -> Result<usize, EngineError> {
        self.ensure_idle()?;
        let threads = threads.clamp(1, max_threads());
        if threads != self.config.threads {
            self.config.threads = threads;
            log::info!("threads set to {threads}");
        }
        Ok(threads)
    }

    pub fn set_params(&mut self, params: SearchParams) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.params = params;
        Ok(())
    }

    /// Install the callback receiving progress after each iteration.
    pub fn set_info_callback(&mut self, callback: Option<SearchInfoCallback>) {
        self.info_callback = callback;
    }

    /// Set the game position: a FEN string (or `startpos`) followed by moves
    /// in coordinate notation. On error the previous position is kept.
    pub fn set_position<'a>(
        &mut self,
        fen: &str,
        moves: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), EngineError> {
        self.ensure_idle()?;
        let fen = if fen.trim() == "startpos" { START_FEN } else { fen };
        let mut pos = Position::from_fen_in(Arc::clone(self.position.context()), fen)?;
        for (index, text) in moves.into_iter().enumerate() {
            let mv = pos
                .parse_move(text)
                .map_err(|source| EngineError::InvalidMove { index, source })?;
            pos.apply_move(mv);
        }
        self.position = pos;
        Ok(())
    }

    /// Forget the game: clear the hash table and return to the start position.
    pub fn new_game(&mut self) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.tt.clear();
        self.position = Position::startpos_in(Arc::clone(self.position.context()));
        *self.result.lock() = None;
        log::debug!("new game");
        Ok(())
    }

    /// Permill of the hash table in use.
    #[must_use]
    pub fn hashfull(&self) -> u32 {
        self.tt.hashfull()
    }

    fn smp_config(&self) -> SmpConfig {
        SmpConfig {
            threads: self.config.threads,
            params: self.params.clone(),
            info_callback: self.info_callback.clone(),
        }
    }

    /// Start searching the current position in the background.
    pub fn go(&mut self, limits: SearchLimits) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.stop.reset();
        *self.result.lock() = None;

        let pos = self.position.clone();
        let tt = Arc::clone(&self.tt);
        let evaluator = Arc::clone(&self.evaluator);
        let config = self.smp_config();
        let stop = self.stop.clone();
        let slot = Arc::clone(&self.result);
        let job_limits = limits.clone();
        log::debug!("go {limits:?} on {}", pos.fen());

        let handle = thread::Builder::new()
            .name("search-control".to_string())
            .spawn(move || {
                let result = smp_search(&pos, &job_limits, &tt, &evaluator, config, &stop);
                log::debug!("search finished: {:?} at depth {}", result.best_move, result.depth);
                *slot.lock() = Some(result);
            });
        match handle {
            Ok(handle) => {
                self.job = Some(SearchJob { handle });
                Ok(())
            }
            Err(err) => {
                // Without a control thread, search in place.
                log::warn!("failed to spawn search control thread: {err}");
                let result = smp_search(
                    &self.position,
                    &limits,
                    &self.tt,
                    &self.evaluator,
                    self.smp_config(),
                    &self.stop,
                );
                *self.result.lock() = Some(result);
                Ok(())
            }
        }
    }

    /// Ask a running search to finish. The result is collected with [`Engine::wait`].
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Block until the background search finishes and return its result.
    pub fn wait(&mut self) -> Option<SearchResult> {
        if let Some(job) = self.job.take() {
            if job.handle.join().is_err() {
                log::error!("search control thread panicked");
            }
        }
        self.result.lock().clone()
    }

    /// Search the current position and block until done.
    pub fn search(&mut self, limits: SearchLimits) -> Result<SearchResult, EngineError> {
        self.ensure_idle()?;
        self.stop.reset();
        log::debug!("search {limits:?} on {}", self.position.fen());
        let result = smp_search(
            &self.position,
            &limits,
            &self.tt,
            &self.evaluator,
            self.smp_config(),
            &self.stop,
        );
        *self.result.lock() = Some(result.clone());
        Ok(result)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop.stop();
        if let Some(job) = self.job.take() {
            let _ = job.handle.join();
        }
    }
}
