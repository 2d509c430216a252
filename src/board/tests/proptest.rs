//! Property-based tests using proptest.

use crate::board::see::SEE_VALUES;
use crate::board::{MoveKind, Position};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Strategy to generate a random legal move sequence length
fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=40usize
}

/// Strategy to generate a random seed for move selection
fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// Play up to `num_moves` random legal moves from the start position.
fn random_game(seed: u64, num_moves: usize) -> Position {
    let mut pos = Position::startpos();
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..num_moves {
        let moves = pos.generate_legal();
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        pos.apply_move(mv);
    }
    pos
}

proptest! {
    /// Property: apply followed by undo restores the position exactly
    #[test]
    fn prop_apply_undo_restores_state(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut pos = random_game(seed, num_moves);
        let snapshot = pos.clone();
        let moves = pos.generate_legal();
        for &mv in &moves {
            pos.apply_move(mv);
            pos.undo_move();
            prop_assert_eq!(&pos, &snapshot, "apply/undo of {} changed the position", mv);
        }
    }

    /// Property: incremental key always equals the recomputed key
    #[test]
    fn prop_key_consistency(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut pos = Position::startpos();
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..num_moves {
            let moves = pos.generate_legal();
            if moves.is_empty() {
                break;
            }
            pos.apply_move(moves[rng.gen_range(0..moves.len())]);
            prop_assert_eq!(pos.key(), pos.compute_key());
            if !pos.in_check() {
                pos.apply_null_move();
                prop_assert_eq!(pos.key(), pos.compute_key());
                pos.undo_null_move();
            }
        }
    }

    /// Property: FEN round-trip preserves the position
    #[test]
    fn prop_fen_roundtrip(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let pos = random_game(seed, num_moves);
        let fen = pos.fen();
        let restored = Position::from_fen(&fen).expect("reachable position parses");
        prop_assert_eq!(restored.fen(), fen);
        prop_assert_eq!(restored.key(), pos.key());
    }

    /// Property: legal moves never leave the mover in check, and the
    /// check prediction matches the position after the move
    #[test]
    fn prop_legal_moves_are_legal(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut pos = random_game(seed, num_moves);
        let us = pos.side_to_move();
        let moves = pos.generate_legal();
        for &mv in &moves {
            prop_assert!(pos.is_pseudo_legal(mv), "{} not pseudo-legal", mv);
            let predicted = pos.gives_check(mv);
            pos.apply_move(mv);
            let ksq = pos.king_square(us);
            prop_assert!(!pos.is_under_attack(ksq, !us, pos.occupied()), "{} leaves king in check", mv);
            prop_assert_eq!(predicted, pos.in_check(), "gives_check wrong for {}", mv);
            pos.undo_move();
        }
    }

    /// Property: SEE of a normal capture never exceeds the victim's value
    #[test]
    fn prop_see_bounded_by_victim(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut pos = random_game(seed, num_moves);
        for &mv in &pos.generate_legal() {
            if mv.kind() != MoveKind::Normal {
                continue;
            }
            if let Some(victim) = pos.piece_type_on(mv.to()) {
                prop_assert!(pos.see(mv) <= SEE_VALUES[victim.index()]);
            }
        }
    }
}
