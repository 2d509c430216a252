//! FEN parsing and serialization, plus coordinate move notation.

use std::str::FromStr;
use std::sync::Arc;

use super::context::BoardContext;
use super::error::{FenError, MoveParseError};
use super::state::Position;
use super::types::{
    castling_rook_squares, king_home, Bitboard, CastlingRights, Color, ColoredPiece, Move, Piece,
    Square,
};

/// FEN of the standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const BACK_RANK: [Piece; 8] = [
    Piece::Rook,
    Piece::Knight,
    Piece::Bishop,
    Piece::Queen,
    Piece::King,
    Piece::Bishop,
    Piece::Knight,
    Piece::Rook,
];

impl Position {
    /// The standard starting position with a freshly built context.
    #[must_use]
    pub fn startpos() -> Self {
        Self::startpos_in(BoardContext::shared())
    }

    /// The standard starting position sharing `ctx`.
    #[must_use]
    pub fn startpos_in(ctx: Arc<BoardContext>) -> Self {
        let mut pos = Position::empty(ctx);
        for (file, &piece) in BACK_RANK.iter().enumerate() {
            pos.put_piece(Square::from_index(file), ColoredPiece::new(Color::White, piece));
            pos.put_piece(Square::from_index(8 + file), ColoredPiece::new(Color::White, Piece::Pawn));
            pos.put_piece(Square::from_index(48 + file), ColoredPiece::new(Color::Black, Piece::Pawn));
            pos.put_piece(Square::from_index(56 + file), ColoredPiece::new(Color::Black, piece));
        }
        pos.state_mut().castling = CastlingRights::all();
        let key = pos.compute_key();
        pos.state_mut().key = key;
        pos
    }

    /// Parse a FEN string with a freshly built context.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Self::from_fen_in(BoardContext::shared(), fen)
    }

    /// Parse a FEN string, sharing an existing context.
    ///
    /// The halfmove clock and fullmove number may be omitted. Castling rights
    /// whose king or rook is not on its home square are dropped.
    pub fn from_fen_in(ctx: Arc<BoardContext>, fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let mut pos = Position::empty(ctx);

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if skip == 0 || skip > 8 {
                        return Err(FenError::InvalidPiece { char: c });
                    }
                    file += skip as usize;
                } else {
                    let pc = ColoredPiece::from_fen_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if file >= 8 {
                        return Err(FenError::WrongFileCount {
                            rank: rank + 1,
                            files: file + 1,
                        });
                    }
                    pos.put_piece(Square::from_index(rank * 8 + file), pc);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::WrongFileCount {
                    rank: rank + 1,
                    files: file,
                });
            }
        }

        let white_kings = pos.pieces(Color::White, Piece::King).popcount();
        let black_kings = pos.pieces(Color::Black, Piece::King).popcount();
        if white_kings != 1 || black_kings != 1 {
            return Err(FenError::WrongKingCount {
                white: white_kings,
                black: black_kings,
            });
        }
        if (pos.pieces_of_type(Piece::Pawn) & (Bitboard::RANK_1 | Bitboard::RANK_8)).any() {
            return Err(FenError::PawnOnBackRank);
        }
        // Keeps the pseudo-legal move count within a move list.
        for color in Color::BOTH {
            if pos.color(color).popcount() > 16 || pos.pieces(color, Piece::Pawn).popcount() > 8 {
                return Err(FenError::TooManyPieces { color });
            }
        }

        pos.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        let mut castling = CastlingRights::none();
        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => castling.set(Color::White, true),
                    'Q' => castling.set(Color::White, false),
                    'k' => castling.set(Color::Black, true),
                    'q' => castling.set(Color::Black, false),
                    _ => return Err(FenError::InvalidCastling { char: c }),
                }
            }
        }
        for color in Color::BOTH {
            for kingside in [true, false] {
                let (rook_sq, _) = castling_rook_squares(color, kingside);
                if pos.piece_on(king_home(color)) != ColoredPiece::new(color, Piece::King)
                    || pos.piece_on(rook_sq) != ColoredPiece::new(color, Piece::Rook)
                {
                    castling.remove(color, kingside);
                }
            }
        }

        let en_passant = if parts[3] == "-" {
            None
        } else {
            let invalid = || FenError::InvalidEnPassant {
                found: parts[3].to_string(),
            };
            let sq: Square = parts[3].parse().map_err(|_| invalid())?;
            let expected_rank = if pos.side_to_move == Color::White { 5 } else { 2 };
            if sq.rank() != expected_rank {
                return Err(invalid());
            }
            // The pawn that just made the double push must still be there.
            let us = pos.side_to_move;
            let pushed = sq.offset(-us.pawn_push());
            let origin = sq.offset(us.pawn_push());
            if pos.piece_on(pushed) != ColoredPiece::new(!us, Piece::Pawn)
                || !pos.piece_on(sq).is_none()
                || !pos.piece_on(origin).is_none()
            {
                return Err(invalid());
            }
            Some(sq)
        };

        let fifty_move_count = match parts.get(4) {
            Some(text) => text.parse::<u32>().map_err(|_| FenError::InvalidHalfmoveClock {
                found: (*text).to_string(),
            })?,
            None => 0,
        };
        let fullmove = match parts.get(5) {
            Some(text) => match text.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(FenError::InvalidFullmoveNumber {
                        found: (*text).to_string(),
                    })
                }
            },
            None => 1,
        };

        let black = u32::from(pos.side_to_move == Color::Black);
        {
            let state = pos.state_mut();
            state.castling = castling;
            state.en_passant = en_passant;
            state.fifty_move_count = fifty_move_count;
            state.ply = (fullmove - 1).saturating_mul(2).saturating_add(black);
        }
        let key = pos.compute_key();
        pos.state_mut().key = key;

        let them = !pos.side_to_move;
        if pos.is_under_attack(pos.king_square(them), pos.side_to_move, pos.occupied) {
            return Err(FenError::OpponentInCheck);
        }
        Ok(pos)
    }

    /// Serialize to FEN; the exact inverse of [`Position::from_fen`].
    #[must_use]
    pub fn fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                let pc = self.piece_on(Square::from_index(rank * 8 + file));
                if pc.is_none() {
                    empty += 1;
                    continue;
                }
                if empty > 0 {
                    out.push_str(&empty.to_string());
                    empty = 0;
                }
                out.push(pc.to_fen_char());
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }

        let state = self.state();
        let side = if self.side_to_move == Color::White { 'w' } else { 'b' };
        let ep = state.en_passant.map_or_else(|| "-".to_string(), |sq| sq.to_string());
        let black = u32::from(self.side_to_move == Color::Black);
        let fullmove = 1 + state.ply.saturating_sub(black) / 2;
        format!(
            "{out} {side} {} {ep} {} {fullmove}",
            state.castling, state.fifty_move_count
        )
    }

    /// Parse a move in coordinate notation (`e2e4`, `e7e8q`) and match it
    /// against the legal moves.
    ///
    /// Castling is written as the king's two-square step (`e1g1`).
    pub fn parse_move(&mut self, text: &str) -> Result<Move, MoveParseError> {
        if !text.is_ascii() || text.len() < 4 || text.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: text.len() });
        }
        let invalid_square = || MoveParseError::InvalidSquare {
            notation: text.to_string(),
        };
        let from: Square = text[0..2].parse().map_err(|_| invalid_square())?;
        let to: Square = text[2..4].parse().map_err(|_| invalid_square())?;
        let promotion = match text[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_char(c.to_ascii_lowercase()) {
                Some(p @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => Some(p),
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
        };

        self.generate_legal()
            .iter()
            .copied()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion_piece() == promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: text.to_string(),
            })
    }

    /// Like [`Position::parse_move`], but "no move found" is simply `None`.
    pub fn to_move(&mut self, text: &str) -> Option<Move> {
        self.parse_move(text).ok()
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_matches_fen() {
        let built = Position::startpos();
        let parsed = Position::from_fen(START_FEN).unwrap();
        assert_eq!(built, parsed);
        assert_eq!(built.fen(), START_FEN);
    }

    #[test]
    fn test_fen_roundtrip() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/8/PPPP1PPP/RNBQKBNR w KQkq c6 0 2",
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 3 19",
        ] {
            assert_eq!(Position::from_fen(fen).unwrap().fen(), fen);
        }
    }

    #[test]
    fn test_short_fen_defaults_counters() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(pos.fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn test_mismatched_castling_rights_dropped() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w KQkq - 0 1").unwrap();
        assert_eq!(pos.castling_rights().to_string(), "K");
    }

    #[test]
    fn test_malformed_fens_rejected() {
        let cases = [
            ("", FenError::TooFewParts { found: 0 }),
            ("8/8/8 w - -", FenError::WrongRankCount { found: 3 }),
            (
                "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                FenError::InvalidPiece { char: '9' },
            ),
            (
                "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                FenError::WrongFileCount { rank: 7, files: 7 },
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
                FenError::InvalidSideToMove {
                    found: "x".to_string(),
                },
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQxq - 0 1",
                FenError::InvalidCastling { char: 'x' },
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1",
                FenError::InvalidEnPassant {
                    found: "e4".to_string(),
                },
            ),
            (
                "4k3/8/8/3P4/8/8/8/4K3 w - e6 0 1",
                FenError::InvalidEnPassant {
                    found: "e6".to_string(),
                },
            ),
            (
                "4k3/4p3/8/3Pp3/8/8/8/4K3 w - e6 0 1",
                FenError::InvalidEnPassant {
                    found: "e6".to_string(),
                },
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - x 1",
                FenError::InvalidHalfmoveClock {
                    found: "x".to_string(),
                },
            ),
            (
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 0",
                FenError::InvalidFullmoveNumber {
                    found: "0".to_string(),
                },
            ),
            ("8/8/8/8/8/8/8/4K3 w - - 0 1", FenError::WrongKingCount { white: 1, black: 0 }),
            ("P3k3/8/8/8/8/8/8/4K3 w - - 0 1", FenError::PawnOnBackRank),
            ("4k3/8/8/8/4R3/8/8/4K3 w - - 0 1", FenError::OpponentInCheck),
            (
                "QQQQkQQQ/QQQQQQQQ/QQQQQQQQ/8/8/8/8/4K3 w - - 0 1",
                FenError::TooManyPieces {
                    color: Color::White,
                },
            ),
            (
                "4k3/pppppppp/p7/8/8/8/8/4K3 w - - 0 1",
                FenError::TooManyPieces {
                    color: Color::Black,
                },
            ),
        ];
        for (fen, expected) in cases {
            assert_eq!(Position::from_fen(fen).unwrap_err(), expected, "{fen}");
        }
    }

    #[test]
    fn test_parse_move() {
        let mut pos = Position::startpos();
        let mv = pos.parse_move("e2e4").unwrap();
        assert_eq!(mv.to_string(), "e2e4");
        assert!(matches!(
            pos.parse_move("e2e5"),
            Err(MoveParseError::IllegalMove { .. })
        ));
        assert!(matches!(
            pos.parse_move("e2"),
            Err(MoveParseError::InvalidLength { len: 2 })
        ));
        assert!(matches!(
            pos.parse_move("z2e4"),
            Err(MoveParseError::InvalidSquare { .. })
        ));
        assert!(pos.to_move("a1a8").is_none());
    }

    #[test]
    fn test_parse_promotion_and_castling() {
        let mut pos = Position::from_fen("4k3/1P6/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
        let promo = pos.parse_move("b7b8n").unwrap();
        assert_eq!(promo.promotion_piece(), Some(Piece::Knight));
        assert!(matches!(
            pos.parse_move("b7b8k"),
            Err(MoveParseError::InvalidPromotion { char: 'k' })
        ));
        assert!(pos.parse_move("e1c1").unwrap().is_castling());
    }
}
