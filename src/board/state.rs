//! Position representation: piece placement, side to move and the
//! per-move history of `BoardState` frames.

use std::fmt;
use std::sync::Arc;

use super::attack_tables::AttackTables;
use super::context::BoardContext;
use super::types::{Bitboard, CastlingRights, Color, ColoredPiece, Move, Piece, Square};

/// Check and pin information for the side to move, computed lazily per node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KingAttackInfo {
    /// Checking pieces plus the squares between a checking slider and the king
    pub attacks: Bitboard,
    /// Friendly pieces pinned to their king
    pub pinned: Bitboard,
    pub double_check: bool,
    pub computed: bool,
}

impl KingAttackInfo {
    #[inline]
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.attacks.any()
    }
}

/// Irreversible state saved for every ply, pushed by apply and popped by undo.
#[derive(Clone, Copy, Debug)]
pub struct BoardState {
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub fifty_move_count: u32,
    /// Game ply (0 = white's first move)
    pub ply: u32,
    /// Earlier occurrences of this position within the fifty-move window
    pub repetitions: u32,
    pub captured: ColoredPiece,
    pub last_move: Move,
    pub key: u64,
    pub(crate) king_attack: KingAttackInfo,
}

// The king attack cache is derived data and takes no part in equality.
impl PartialEq for BoardState {
    fn eq(&self, other: &Self) -> bool {
        self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.fifty_move_count == other.fifty_move_count
            && self.ply == other.ply
            && self.repetitions == other.repetitions
            && self.captured == other.captured
            && self.last_move == other.last_move
            && self.key == other.key
    }
}

impl Eq for BoardState {}

impl BoardState {
    pub(crate) fn root() -> Self {
        BoardState {
            castling: CastlingRights::none(),
            en_passant: None,
            fifty_move_count: 0,
            ply: 0,
            repetitions: 0,
            captured: ColoredPiece::NONE,
            last_move: Move::null(),
            key: 0,
            king_attack: KingAttackInfo::default(),
        }
    }
}

/// A chess position with undo history.
///
/// The square array, the per-type and per-color bitboards and `occupied` always
/// agree; `occupied` is the union of the color sets.
#[derive(Clone)]
pub struct Position {
    pub(crate) ctx: Arc<BoardContext>,
    pub(crate) squares: [ColoredPiece; 64],
    pub(crate) by_piece: [Bitboard; 6],
    pub(crate) by_color: [Bitboard; 2],
    pub(crate) occupied: Bitboard,
    pub(crate) side_to_move: Color,
    pub(crate) history: Vec<BoardState>,
}

impl Position {
    pub(crate) fn empty(ctx: Arc<BoardContext>) -> Self {
        let mut history = Vec::with_capacity(512);
        history.push(BoardState::root());
        Position {
            ctx,
            squares: [ColoredPiece::NONE; 64],
            by_piece: [Bitboard::EMPTY; 6],
            by_color: [Bitboard::EMPTY; 2],
            occupied: Bitboard::EMPTY,
            side_to_move: Color::White,
            history,
        }
    }

    #[inline]
    #[must_use]
    pub fn context(&self) -> &Arc<BoardContext> {
        &self.ctx
    }

    #[inline]
    #[must_use]
    pub fn attacks(&self) -> &AttackTables {
        self.ctx.attacks()
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn piece_on(&self, sq: Square) -> ColoredPiece {
        self.squares[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn piece_type_on(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()].piece()
    }

    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.by_piece[piece.index()] & self.by_color[color.index()]
    }

    /// Pieces of one type, both colors.
    #[inline]
    #[must_use]
    pub fn pieces_of_type(&self, piece: Piece) -> Bitboard {
        self.by_piece[piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn color(&self, color: Color) -> Bitboard {
        self.by_color[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.pieces(color, Piece::King).lsb()
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &BoardState {
        // The root frame is pushed at construction and never popped.
        &self.history[self.history.len() - 1]
    }

    #[inline]
    pub(crate) fn state_mut(&mut self) -> &mut BoardState {
        let last = self.history.len() - 1;
        &mut self.history[last]
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> u64 {
        self.state().key
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.state().castling
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self) -> Option<Square> {
        self.state().en_passant
    }

    #[inline]
    #[must_use]
    pub fn fifty_move_count(&self) -> u32 {
        self.state().fifty_move_count
    }

    #[inline]
    #[must_use]
    pub fn repetitions(&self) -> u32 {
        self.state().repetitions
    }

    #[inline]
    #[must_use]
    pub fn last_move(&self) -> Move {
        self.state().last_move
    }

    /// Frames on the undo stack, the construction frame included.
    #[inline]
    #[must_use]
    pub fn history(&self) -> &[BoardState] {
        &self.history
    }

    pub(crate) fn put_piece(&mut self, sq: Square, pc: ColoredPiece) {
        let Some(piece) = pc.piece() else {
            return;
        };
        let bb = Bitboard::from_square(sq);
        self.squares[sq.index()] = pc;
        self.by_piece[piece.index()] |= bb;
        self.by_color[pc.color().index()] |= bb;
        self.occupied |= bb;
    }

    pub(crate) fn remove_piece(&mut self, sq: Square) -> ColoredPiece {
        let pc = self.squares[sq.index()];
        if let Some(piece) = pc.piece() {
            let bb = Bitboard::from_square(sq);
            self.squares[sq.index()] = ColoredPiece::NONE;
            self.by_piece[piece.index()] ^= bb;
            self.by_color[pc.color().index()] ^= bb;
            self.occupied ^= bb;
        }
        pc
    }

    pub(crate) fn move_piece(&mut self, from: Square, to: Square) {
        let pc = self.remove_piece(from);
        self.put_piece(to, pc);
    }

    /// Recompute the Zobrist key from scratch.
    #[must_use]
    pub fn compute_key(&self) -> u64 {
        let keys = self.ctx.zobrist();
        let mut key = 0u64;
        for sq in self.occupied {
            key ^= keys.piece(self.piece_on(sq), sq);
        }
        let state = self.state();
        key ^= keys.castling(state.castling);
        if let Some(ep) = state.en_passant {
            key ^= keys.en_passant(ep);
        }
        if self.side_to_move == Color::Black {
            key ^= keys.side();
        }
        key
    }

    /// All pieces of either color attacking `sq` given occupancy `occ`.
    #[must_use]
    pub fn attackers_to(&self, sq: Square, occ: Bitboard) -> Bitboard {
        let attacks = self.attacks();
        let diagonal = self.pieces_of_type(Piece::Bishop) | self.pieces_of_type(Piece::Queen);
        let straight = self.pieces_of_type(Piece::Rook) | self.pieces_of_type(Piece::Queen);
        (attacks.pawn(Color::Black, sq) & self.pieces(Color::White, Piece::Pawn))
            | (attacks.pawn(Color::White, sq) & self.pieces(Color::Black, Piece::Pawn))
            | (attacks.knight(sq) & self.pieces_of_type(Piece::Knight))
            | (attacks.king(sq) & self.pieces_of_type(Piece::King))
            | (attacks.bishop(sq, occ) & diagonal)
            | (attacks.rook(sq, occ) & straight)
    }

    /// Whether `by` attacks `sq` with occupancy `occ`.
    #[must_use]
    pub fn is_under_attack(&self, sq: Square, by: Color, occ: Bitboard) -> bool {
        (self.attackers_to(sq, occ) & self.color(by)).any()
    }

    /// Enemy pieces giving check to the side to move.
    #[must_use]
    pub fn checkers(&self) -> Bitboard {
        let us = self.side_to_move;
        self.attackers_to(self.king_square(us), self.occupied) & self.color(!us)
    }

    #[inline]
    #[must_use]
    pub fn in_check(&self) -> bool {
        self.checkers().any()
    }

    /// Type of the piece `mv` captures; en passant always takes a pawn.
    #[inline]
    #[must_use]
    pub fn captured_piece(&self, mv: Move) -> Option<Piece> {
        if mv.is_en_passant() {
            Some(Piece::Pawn)
        } else if mv.is_castling() {
            None
        } else {
            self.piece_type_on(mv.to())
        }
    }

    #[inline]
    #[must_use]
    pub fn is_capture(&self, mv: Move) -> bool {
        self.captured_piece(mv).is_some()
    }

    #[must_use]
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let pawns_and_king = self.pieces_of_type(Piece::Pawn) | self.pieces_of_type(Piece::King);
        (self.color(color) & !pawns_and_king).any()
    }

    /// Threefold repetition or the fifty-move rule.
    #[must_use]
    pub fn is_draw(&self) -> bool {
        let state = self.state();
        state.repetitions >= 2 || state.fifty_move_count >= 100
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares
            && self.by_piece == other.by_piece
            && self.by_color == other.by_color
            && self.occupied == other.occupied
            && self.side_to_move == other.side_to_move
            && self.history == other.history
    }
}

impl Eq for Position {}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("fen", &self.fen())
            .field("key", &format_args!("{:#018x}", self.key()))
            .finish()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let sq = Square::from_index(rank * 8 + file);
                write!(f, " {}", self.piece_on(sq).to_fen_char())?;
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        write!(f, "{}", self.fen())
    }
}
