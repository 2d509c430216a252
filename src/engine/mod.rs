//! Engine control surface for a protocol front end.
//!
//! [`Engine`] owns the game position and the transposition table, starts and
//! stops searches, and hands out their results. Talking UCI or any other
//! protocol is left to the caller.

mod controller;
pub mod time;

pub use controller::{max_threads, Engine, EngineConfig, EngineError, DEFAULT_HASH_MB, MAX_THREADS};
pub use time::{clock_budget_ms, SearchLimits, TimeManager};
