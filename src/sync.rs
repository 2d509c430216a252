//! Cross-thread search control.
//!
//! Workers own their positions and history tables; the only state they
//! share besides the transposition table lives here.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Cooperative stop signal polled by every search thread.
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    #[must_use]
    pub fn new() -> Self {
        StopFlag(Arc::new(AtomicBool::new(false)))
    }

    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Node count summed over all workers of one search.
///
/// Workers batch their local counts and flush them here, so readers may
/// lag the true total by one batch per thread.
#[derive(Debug, Default)]
pub struct NodeCounter(AtomicU64);

impl NodeCounter {
    #[must_use]
    pub fn new() -> Self {
        NodeCounter(AtomicU64::new(0))
    }

    #[inline]
    pub fn add(&self, nodes: u64) -> u64 {
        self.0.fetch_add(nodes, Ordering::Relaxed) + nodes
    }

    #[inline]
    #[must_use]
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}
