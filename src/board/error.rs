//! Error types for board construction and move parsing.

use std::fmt;

use super::types::Color;

/// Error type for FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few fields (needs at least 4)
    TooFewParts { found: usize },
    /// Placement field does not have exactly 8 ranks
    WrongRankCount { found: usize },
    /// A rank does not add up to 8 files
    WrongFileCount { rank: usize, files: usize },
    /// Invalid piece character in placement field
    InvalidPiece { char: char },
    /// Invalid side to move (must be 'w' or 'b')
    InvalidSideToMove { found: String },
    /// Invalid castling character
    InvalidCastling { char: char },
    /// Invalid en passant square
    InvalidEnPassant { found: String },
    /// Halfmove clock is not a number
    InvalidHalfmoveClock { found: String },
    /// Fullmove number is not a positive number
    InvalidFullmoveNumber { found: String },
    /// Each side needs exactly one king
    WrongKingCount { white: u32, black: u32 },
    /// A pawn stands on the first or last rank
    PawnOnBackRank,
    /// A side has more than 16 pieces or more than 8 pawns
    TooManyPieces { color: Color },
    /// The side that just moved is still in check
    OpponentInCheck,
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN must have at least 4 parts, found {found}")
            }
            FenError::WrongRankCount { found } => {
                write!(f, "FEN placement must have 8 ranks, found {found}")
            }
            FenError::WrongFileCount { rank, files } => {
                write!(f, "Rank {rank} describes {files} files instead of 8")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidCastling { char } => {
                write!(f, "Invalid castling character '{char}' in FEN")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "Invalid en passant square '{found}'")
            }
            FenError::InvalidHalfmoveClock { found } => {
                write!(f, "Invalid halfmove clock '{found}'")
            }
            FenError::InvalidFullmoveNumber { found } => {
                write!(f, "Invalid fullmove number '{found}'")
            }
            FenError::WrongKingCount { white, black } => {
                write!(
                    f,
                    "Each side needs one king, found {white} white and {black} black"
                )
            }
            FenError::PawnOnBackRank => write!(f, "Pawn on first or last rank"),
            FenError::TooManyPieces { color } => {
                write!(f, "Too many {color:?} pieces for a legal position")
            }
            FenError::OpponentInCheck => {
                write!(f, "Side not to move is in check")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for move parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Move string has invalid length (must be 4-5 characters)
    InvalidLength { len: usize },
    /// Invalid square notation in move
    InvalidSquare { notation: String },
    /// Invalid promotion piece
    InvalidPromotion { char: char },
    /// Move is not legal in the current position
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "Move must be 4-5 characters, found {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "Invalid square notation in '{notation}'")
            }
            MoveParseError::InvalidPromotion { char } => {
                write!(f, "Invalid promotion piece '{char}'")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "Illegal move '{notation}'")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    /// Rank out of bounds (must be 0-7)
    RankOutOfBounds { rank: usize },
    /// File out of bounds (must be 0-7)
    FileOutOfBounds { file: usize },
    /// Invalid algebraic notation
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::RankOutOfBounds { rank } => {
                write!(f, "Rank {rank} out of bounds (must be 0-7)")
            }
            SquareError::FileOutOfBounds { file } => {
                write!(f, "File {file} out of bounds (must be 0-7)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fen_error_display_mentions_fields() {
        let err = FenError::WrongFileCount { rank: 3, files: 9 };
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains('9'));

        let err = FenError::WrongKingCount { white: 2, black: 0 };
        assert!(err.to_string().contains("2 white"));
    }

    #[test]
    fn test_move_parse_error_display() {
        let err = MoveParseError::IllegalMove {
            notation: "e2e5".to_string(),
        };
        assert_eq!(err.to_string(), "Illegal move 'e2e5'");
        let err = MoveParseError::InvalidLength { len: 7 };
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_errors_are_std_errors() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&FenError::PawnOnBackRank);
        assert_error(&FenError::TooManyPieces {
            color: Color::White,
        });
        assert_error(&MoveParseError::InvalidPromotion { char: 'k' });
        assert_error(&SquareError::InvalidNotation {
            notation: "z9".to_string(),
        });
    }
}
