use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use ferrum_chess::board::search::SearchInfo;
use ferrum_chess::board::{Position, START_FEN};
use ferrum_chess::engine::{Engine, EngineConfig, SearchLimits};

const USAGE: &str = "usage:
  ferrum perft <depth> [fen]
  ferrum divide <depth> [fen]
  ferrum search <depth|Nms> [threads] [fen]";

fn parse_fen(args: &[String]) -> String {
    if args.is_empty() {
        START_FEN.to_string()
    } else {
        args.join(" ")
    }
}

fn perft(args: &[String], divide: bool) -> Result<(), String> {
    let depth: usize = args
        .first()
        .and_then(|d| d.parse().ok())
        .ok_or_else(|| USAGE.to_string())?;
    let fen = parse_fen(&args[1..]);
    let mut pos = Position::from_fen(&fen).map_err(|e| e.to_string())?;

    let start = Instant::now();
    let nodes = if divide {
        let mut total = 0;
        for (mv, count) in pos.perft_divide(depth) {
            println!("{mv}: {count}");
            total += count;
        }
        total
    } else {
        pos.perft(depth)
    };
    let elapsed = start.elapsed();
    let nps = nodes as f64 / elapsed.as_secs_f64().max(1e-9);
    println!("nodes {nodes} time {}ms nps {:.0}", elapsed.as_millis(), nps);
    Ok(())
}

fn search(args: &[String]) -> Result<(), String> {
    let limit = args.first().ok_or_else(|| USAGE.to_string())?;
    let limits = if let Some(ms) = limit.strip_suffix("ms") {
        SearchLimits::movetime(ms.parse().map_err(|_| USAGE.to_string())?)
    } else {
        SearchLimits::depth(limit.parse().map_err(|_| USAGE.to_string())?)
    };

    let (threads, rest) = match args.get(1).and_then(|t| t.parse::<usize>().ok()) {
        Some(threads) => (threads, &args[2..]),
        None => (1, &args[1..]),
    };

    let mut engine = Engine::with_config(EngineConfig {
        threads,
        ..EngineConfig::default()
    });
    engine
        .set_position(&parse_fen(rest), std::iter::empty())
        .map_err(|e| e.to_string())?;
    engine.set_info_callback(Some(Arc::new(|info: &SearchInfo| println!("{info}"))));

    let result = engine.search(limits).map_err(|e| e.to_string())?;
    match (result.best_move, result.ponder_move) {
        (Some(best), Some(ponder)) => println!("bestmove {best} ponder {ponder}"),
        (Some(best), None) => println!("bestmove {best}"),
        (None, _) => println!("bestmove 0000"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let outcome = match args.first().map(String::as_str) {
        Some("perft") => perft(&args[1..], false),
        Some("divide") => perft(&args[1..], true),
        Some("search") => search(&args[1..]),
        _ => Err(USAGE.to_string()),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}
