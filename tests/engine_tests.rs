//! Engine control surface: background searches, configuration and game state.

use std::thread;
use std::time::Duration;

use ferrum_chess::engine::{Engine, EngineConfig, EngineError, SearchLimits, DEFAULT_HASH_MB};

#[test]
fn go_stop_wait_cycle() {
    let mut engine = Engine::new();
    engine.go(SearchLimits::infinite()).unwrap();
    thread::sleep(Duration::from_millis(50));
    assert!(engine.is_searching());

    assert_eq!(engine.go(SearchLimits::depth(1)), Err(EngineError::Busy));
    assert_eq!(engine.set_hash(8), Err(EngineError::Busy));
    assert!(matches!(
        engine.set_position("startpos", ["e2e4"]),
        Err(EngineError::Busy)
    ));

    engine.stop();
    let result = engine.wait().expect("search result");
    assert!(result.best_move.is_some());
    assert!(!engine.is_searching());

    // The engine accepts work again.
    engine.set_position("startpos", ["e2e4"]).unwrap();
}

#[test]
fn background_search_ends_on_its_own() {
    let mut engine = Engine::new();
    engine.go(SearchLimits::depth(3)).unwrap();
    let result = engine.wait().expect("search result");
    assert_eq!(result.depth, 3);
    assert!(!engine.is_searching());
}

#[test]
fn wait_without_search_returns_last_result() {
    let mut engine = Engine::new();
    assert!(engine.wait().is_none());
    let searched = engine.search(SearchLimits::depth(2)).unwrap();
    assert_eq!(engine.wait(), Some(searched));
}

#[test]
fn new_game_clears_hash_and_position() {
    // A small table so the hashfull sample sees the stored entries
    let mut engine = Engine::with_config(EngineConfig {
        hash_mb: 1,
        threads: 1,
    });
    engine.set_position("startpos", ["d2d4", "d7d5"]).unwrap();
    engine.search(SearchLimits::depth(5)).unwrap();
    assert!(engine.hashfull() > 0);

    engine.new_game().unwrap();
    assert_eq!(engine.hashfull(), 0);
    assert_eq!(
        engine.position().fen(),
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    );
    assert!(engine.wait().is_none());
}

#[test]
fn thread_count_is_clamped() {
    let mut engine = Engine::with_config(EngineConfig::default());
    assert_eq!(engine.config().hash_mb, DEFAULT_HASH_MB);
    assert_eq!(engine.set_threads(0).unwrap(), 1);
    let max = engine.set_threads(usize::MAX).unwrap();
    assert!(max >= 1);
    assert_eq!(engine.config().threads, max);
}

#[test]
fn set_position_from_fen() {
    let mut engine = Engine::new();
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    engine.set_position(fen, ["e1g1"]).unwrap();
    assert_eq!(
        engine.position().fen(),
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R4RK1 b kq - 1 1"
    );
}

#[test]
fn error_source_is_reported() {
    use std::error::Error;

    let mut engine = Engine::new();
    let err = engine
        .set_position("8/8/8/8/8/8/8/8 w - - 0 1", std::iter::empty())
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidFen { .. }));
    assert!(err.source().is_some());
}
