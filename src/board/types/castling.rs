//! Castling rights type.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::bitboard::Bitboard;
use super::piece::Color;
use super::square::Square;

pub(crate) const CASTLE_WHITE_Q: u8 = 1 << 0;
pub(crate) const CASTLE_WHITE_K: u8 = 1 << 1;
pub(crate) const CASTLE_BLACK_Q: u8 = 1 << 2;
pub(crate) const CASTLE_BLACK_K: u8 = 1 << 3;

/// Castling rights represented as a bitmask (WQ = 1, WK = 2, BQ = 4, BK = 8).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    #[must_use]
    pub const fn all() -> Self {
        CastlingRights(CASTLE_WHITE_Q | CASTLE_WHITE_K | CASTLE_BLACK_Q | CASTLE_BLACK_K)
    }

    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, kingside: bool) -> bool {
        self.0 & Self::bit_for(color, kingside) != 0
    }

    /// Either right still held by `color`.
    #[inline]
    #[must_use]
    pub const fn has_any(self, color: Color) -> bool {
        self.0 & (Self::bit_for(color, true) | Self::bit_for(color, false)) != 0
    }

    #[inline]
    pub fn set(&mut self, color: Color, kingside: bool) {
        self.0 |= Self::bit_for(color, kingside);
    }

    #[inline]
    pub fn remove(&mut self, color: Color, kingside: bool) {
        self.0 &= !Self::bit_for(color, kingside);
    }

    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.0 &= !(Self::bit_for(color, true) | Self::bit_for(color, false));
    }

    /// Raw mask, also the Zobrist castling index (0-15).
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        CastlingRights(value & 0x0F)
    }

    #[inline]
    const fn bit_for(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => CASTLE_WHITE_K,
            (Color::White, false) => CASTLE_WHITE_Q,
            (Color::Black, true) => CASTLE_BLACK_K,
            (Color::Black, false) => CASTLE_BLACK_Q,
        }
    }
}

/// FEN castling field (`KQkq` order, `-` when empty).
impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "-");
        }
        for (bit, c) in [
            (CASTLE_WHITE_K, 'K'),
            (CASTLE_WHITE_Q, 'Q'),
            (CASTLE_BLACK_K, 'k'),
            (CASTLE_BLACK_Q, 'q'),
        ] {
            if self.0 & bit != 0 {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// Squares that must be empty between king and rook.
#[inline]
#[must_use]
pub(crate) const fn castling_path(color: Color, kingside: bool) -> Bitboard {
    match (color, kingside) {
        (Color::White, false) => Bitboard(0x0E),
        (Color::White, true) => Bitboard(0x60),
        (Color::Black, false) => Bitboard(0x0E00_0000_0000_0000),
        (Color::Black, true) => Bitboard(0x6000_0000_0000_0000),
    }
}

/// Rook origin and destination for a castling move.
#[inline]
#[must_use]
pub(crate) const fn castling_rook_squares(color: Color, kingside: bool) -> (Square, Square) {
    match (color, kingside) {
        (Color::White, true) => (Square::H1, Square::F1),
        (Color::White, false) => (Square::A1, Square::D1),
        (Color::Black, true) => (Square::H8, Square::F8),
        (Color::Black, false) => (Square::A8, Square::D8),
    }
}

/// King start square per color.
#[inline]
#[must_use]
pub(crate) const fn king_home(color: Color) -> Square {
    match color {
        Color::White => Square::E1,
        Color::Black => Square::E8,
    }
}
