//! Benchmarks for move generation, search and evaluation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ferrum_chess::board::Position;
use ferrum_chess::engine::{Engine, EngineConfig, SearchLimits};
use ferrum_chess::eval::{ClassicalEvaluator, Evaluator};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const ITALIAN: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    let mut startpos = Position::startpos();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| startpos.perft(black_box(depth)))
        });
    }

    let mut kiwipete = Position::from_fen(KIWIPETE).unwrap();
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| kiwipete.perft(black_box(depth)))
        });
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");

    for (name, fen) in [
        ("startpos", ferrum_chess::board::START_FEN),
        ("middlegame", ITALIAN),
        ("kiwipete", KIWIPETE),
    ] {
        let mut pos = Position::from_fen(fen).unwrap();
        group.bench_function(name, |b| b.iter(|| black_box(pos.generate_legal())));
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    for (name, fen, depths) in [
        ("startpos", ferrum_chess::board::START_FEN, &[3u32, 4, 5][..]),
        ("kiwipete", KIWIPETE, &[3, 4][..]),
    ] {
        for &depth in depths {
            group.bench_with_input(BenchmarkId::new(name, depth), &depth, |b, &depth| {
                b.iter(|| {
                    let mut engine = Engine::with_config(EngineConfig::default());
                    engine.set_position(fen, std::iter::empty()).unwrap();
                    engine.search(SearchLimits::depth(depth)).unwrap()
                })
            });
        }
    }

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");
    let evaluator = ClassicalEvaluator::new();

    for (name, fen) in [
        ("startpos", ferrum_chess::board::START_FEN),
        ("middlegame", ITALIAN),
        ("endgame", "8/5k2/8/8/8/8/5K2/4R3 w - - 0 1"),
    ] {
        let pos = Position::from_fen(fen).unwrap();
        group.bench_with_input(BenchmarkId::new("position", name), &pos, |b, pos| {
            b.iter(|| black_box(evaluator.evaluate(pos)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen, bench_search, bench_eval);
criterion_main!(benches);
