//! Zobrist hashing keys.
//!
//! Keys come from a fixed-seed RNG, so every `ZobristKeys` instance is
//! identical and hashes are reproducible across runs and engine instances.

use rand::prelude::*;

use crate::board::{CastlingRights, ColoredPiece, Square};

const ZOBRIST_SEED: u64 = 1_234_567_890;

/// Random keys for every hashed position feature.
pub struct ZobristKeys {
    /// Indexed by colored piece code, then square
    pieces: [[u64; 64]; ColoredPiece::COUNT],
    /// Indexed by the full castling mask (0-15)
    castling: [u64; 16],
    en_passant_file: [u64; 8],
    side: u64,
}

impl ZobristKeys {
    #[must_use]
    pub fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut pieces = [[0u64; 64]; ColoredPiece::COUNT];
        for code in pieces.iter_mut().skip(1) {
            for key in code.iter_mut() {
                *key = rng.gen();
            }
        }
        let mut castling = [0u64; 16];
        for key in castling.iter_mut().skip(1) {
            *key = rng.gen();
        }
        let mut en_passant_file = [0u64; 8];
        for key in &mut en_passant_file {
            *key = rng.gen();
        }
        ZobristKeys {
            pieces,
            castling,
            en_passant_file,
            side: rng.gen(),
        }
    }

    #[inline]
    #[must_use]
    pub fn piece(&self, pc: ColoredPiece, sq: Square) -> u64 {
        self.pieces[pc.code()][sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn castling(&self, rights: CastlingRights) -> u64 {
        self.castling[rights.as_u8() as usize]
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self, sq: Square) -> u64 {
        self.en_passant_file[sq.file()]
    }

    /// Toggled whenever the side to move changes.
    #[inline]
    #[must_use]
    pub fn side(&self) -> u64 {
        self.side
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Color, Piece};

    #[test]
    fn test_keys_are_reproducible() {
        let a = ZobristKeys::new();
        let b = ZobristKeys::new();
        let pc = ColoredPiece::new(Color::Black, Piece::Queen);
        assert_eq!(a.piece(pc, Square::D8), b.piece(pc, Square::D8));
        assert_eq!(a.side(), b.side());
    }

    #[test]
    fn test_empty_features_hash_to_zero() {
        let keys = ZobristKeys::new();
        assert_eq!(keys.piece(ColoredPiece::NONE, Square::E1), 0);
        assert_eq!(keys.castling(CastlingRights::none()), 0);
        assert_ne!(keys.castling(CastlingRights::all()), 0);
    }
}
