//! Move types and move lists.

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Piece;
use super::square::Square;

/// What kind of move a `Move` encodes (bits 14-15).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Normal,
    EnPassant,
    Promotion,
    Castling,
}

const KIND_SHIFT: u16 = 14;
const PROMO_SHIFT: u16 = 12;

/// Compact 16-bit move representation.
///
/// Encoding:
/// - bits 0-5:   from square (0-63)
/// - bits 6-11:  to square (0-63)
/// - bits 12-13: promotion piece (knight = 0 .. queen = 3)
/// - bits 14-15: move kind (normal, en passant, promotion, castling)
///
/// Castling is stored as the king's two-square step (`e1g1`). The all-zero
/// value is the null move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move(u16);

impl Move {
    /// The null move (also "no move" in tables)
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Move(0)
    }

    #[inline]
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Move(from.index() as u16 | (to.index() as u16) << 6)
    }

    #[inline]
    #[must_use]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move(Move::new(from, to).0 | 1 << KIND_SHIFT)
    }

    #[inline]
    #[must_use]
    pub const fn promotion(from: Square, to: Square, piece: Piece) -> Self {
        let promo = (piece.index() as u16).saturating_sub(1) & 3;
        Move(Move::new(from, to).0 | promo << PROMO_SHIFT | 2 << KIND_SHIFT)
    }

    #[inline]
    #[must_use]
    pub const fn castling(from: Square, to: Square) -> Self {
        Move(Move::new(from, to).0 | 3 << KIND_SHIFT)
    }

    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        Square::from_index((self.0 & 0x3F) as usize)
    }

    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        Square::from_index(((self.0 >> 6) & 0x3F) as usize)
    }

    #[inline]
    #[must_use]
    pub const fn kind(self) -> MoveKind {
        match self.0 >> KIND_SHIFT {
            0 => MoveKind::Normal,
            1 => MoveKind::EnPassant,
            2 => MoveKind::Promotion,
            _ => MoveKind::Castling,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind(), MoveKind::EnPassant)
    }

    #[inline]
    #[must_use]
    pub const fn is_castling(self) -> bool {
        matches!(self.kind(), MoveKind::Castling)
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        matches!(self.kind(), MoveKind::Promotion)
    }

    /// Promotion piece, if this is a promotion
    #[inline]
    #[must_use]
    pub const fn promotion_piece(self) -> Option<Piece> {
        if self.is_promotion() {
            Piece::from_index(((self.0 >> PROMO_SHIFT) & 3) as usize + 1)
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn from_u16(value: u16) -> Self {
        Move(value)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "Move(null)");
        }
        write!(f, "Move({self}")?;
        match self.kind() {
            MoveKind::Normal | MoveKind::Promotion => {}
            MoveKind::EnPassant => write!(f, " ep")?,
            MoveKind::Castling => write!(f, " castle")?,
        }
        write!(f, ")")
    }
}

/// Coordinate notation: `e2e4`, `e7e8q`, `0000` for the null move.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promo) = self.promotion_piece() {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

pub(crate) const MAX_MOVES: usize = 256;

/// List of moves with a fixed-size backing array.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        MoveList {
            moves: [Move::null(); MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, mv: Move) {
        // FEN parsing caps each side at 16 pieces, which keeps generation below this.
        debug_assert!(self.len < MAX_MOVES, "move list overflow");
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    /// Keep only the moves for which `keep` returns true, preserving order.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(Move) -> bool) {
        let mut write = 0;
        for read in 0..self.len {
            let mv = self.moves[read];
            if keep(mv) {
                self.moves[write] = mv;
                write += 1;
            }
        }
        self.len = write;
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Self::Output {
        assert!(
            idx < self.len,
            "MoveList index {} out of bounds (len {})",
            idx,
            self.len
        );
        &self.moves[idx]
    }
}

/// A scored move for move ordering.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Fixed-size list of scored moves.
#[derive(Clone)]
pub(crate) struct ScoredMoveList {
    moves: [ScoredMove; MAX_MOVES],
    len: usize,
}

impl ScoredMoveList {
    pub fn new() -> Self {
        ScoredMoveList {
            moves: [ScoredMove {
                mv: Move::null(),
                score: 0,
            }; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move, score: i32) {
        self.moves[self.len] = ScoredMove { mv, score };
        self.len += 1;
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn as_slice(&self) -> &[ScoredMove] {
        &self.moves[..self.len]
    }

    /// Stable sort, highest score first.
    pub fn sort_by_score_desc(&mut self) {
        self.moves[..self.len].sort_by(|a, b| b.score.cmp(&a.score));
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<ScoredMove> {
        self.as_slice().get(idx).copied()
    }
}

impl Default for ScoredMoveList {
    fn default() -> Self {
        ScoredMoveList::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn test_move_encoding_fields() {
        let mv = Move::new(sq("e2"), sq("e4"));
        assert_eq!(mv.from(), sq("e2"));
        assert_eq!(mv.to(), sq("e4"));
        assert_eq!(mv.kind(), MoveKind::Normal);
        assert_eq!(mv.as_u16(), 12 | 28 << 6);

        let promo = Move::promotion(sq("e7"), sq("e8"), Piece::Knight);
        assert_eq!(promo.kind(), MoveKind::Promotion);
        assert_eq!(promo.promotion_piece(), Some(Piece::Knight));
        assert_eq!(promo.to_string(), "e7e8n");

        let castle = Move::castling(sq("e1"), sq("g1"));
        assert!(castle.is_castling());
        assert_eq!(castle.to_string(), "e1g1");

        assert!(Move::en_passant(sq("e5"), sq("d6")).is_en_passant());
    }

    #[test]
    fn test_all_promotion_pieces_encode() {
        for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
            let mv = Move::promotion(sq("a7"), sq("a8"), piece);
            assert_eq!(mv.promotion_piece(), Some(piece));
        }
    }

    #[test]
    fn test_null_move_display() {
        assert!(Move::null().is_null());
        assert_eq!(Move::null().to_string(), "0000");
    }

    #[test]
    fn test_move_list_retain() {
        let mut list = MoveList::new();
        list.push(Move::new(sq("a2"), sq("a3")));
        list.push(Move::new(sq("b2"), sq("b3")));
        list.push(Move::new(sq("c2"), sq("c3")));
        list.retain(|m| m.from() != sq("b2"));
        assert_eq!(list.len(), 2);
        assert_eq!(list[1], Move::new(sq("c2"), sq("c3")));
    }
}
