//! Apply/undo move tests.

use super::find_move;
use crate::board::{Color, ColoredPiece, Piece, Position};
use rand::prelude::*;

#[test]
fn test_en_passant_apply_undo() {
    let mut pos =
        Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
            .unwrap();
    let before = pos.clone();
    let mv = find_move(&mut pos, "e5", "f6", None);
    assert!(mv.is_en_passant());
    pos.apply_move(mv);
    assert!(pos.piece_on("f5".parse().unwrap()).is_none());
    assert_eq!(pos.state().captured, ColoredPiece::new(Color::Black, Piece::Pawn));
    assert_eq!(pos.key(), pos.compute_key());
    pos.undo_move();
    assert_eq!(pos, before);
}

#[test]
fn test_promotion_apply_undo() {
    let mut pos = Position::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
    let before = pos.clone();
    let mv = find_move(&mut pos, "a7", "a8", Some(Piece::Queen));
    pos.apply_move(mv);
    assert_eq!(
        pos.piece_on("a8".parse().unwrap()),
        ColoredPiece::new(Color::White, Piece::Queen)
    );
    assert_eq!(pos.key(), pos.compute_key());
    pos.undo_move();
    assert_eq!(pos, before);
    assert_eq!(
        pos.piece_on("a7".parse().unwrap()),
        ColoredPiece::new(Color::White, Piece::Pawn)
    );
}

#[test]
fn test_castling_moves_rook() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let before = pos.clone();
    let mv = find_move(&mut pos, "e1", "g1", None);
    assert!(mv.is_castling());
    pos.apply_move(mv);
    assert_eq!(
        pos.piece_on("f1".parse().unwrap()),
        ColoredPiece::new(Color::White, Piece::Rook)
    );
    assert!(pos.piece_on("h1".parse().unwrap()).is_none());
    assert_eq!(pos.castling_rights().to_string(), "kq");
    assert_eq!(pos.key(), pos.compute_key());
    pos.undo_move();
    assert_eq!(pos, before);
}

#[test]
fn test_capturing_rook_removes_right() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/6B1/R3K2R w KQkq - 0 1").unwrap();
    let mv = find_move(&mut pos, "g2", "a8", None);
    pos.apply_move(mv);
    assert_eq!(pos.castling_rights().to_string(), "KQk");
    assert_eq!(pos.key(), pos.compute_key());
}

#[test]
fn test_random_games_undo_exactly() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let mut pos = Position::startpos();
        let start = pos.clone();
        let mut played = 0;
        for _ in 0..60 {
            let moves = pos.generate_legal();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            pos.apply_move(mv);
            assert_eq!(pos.key(), pos.compute_key(), "after {mv}");
            played += 1;
        }
        for _ in 0..played {
            pos.undo_move();
        }
        assert_eq!(pos, start);
    }
}
