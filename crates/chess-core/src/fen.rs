//! FEN (Forsyth-Edwards Notation) piece-placement parsing.
//!
//! Only the fields this rules engine models are read: piece placement,
//! active color and castling availability. En passant and the move clocks
//! may be present but are ignored.

use crate::{Color, PieceKind};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 1 to 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),
}

/// A parsed grid cell: the kind and color standing there, if any.
pub type PlacementCell = Option<(PieceKind, Color)>;

/// Parsed FEN data.
///
/// `placement` is indexed `[row][col]` with row 0 holding rank 8, matching
/// the engine's board addressing. The engine turns this into a board with
/// piece identities and moved flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    pub placement: [[PlacementCell; 8]; 8],
    /// Side to move; White when the field is absent.
    pub active_color: Color,
    /// Castling availability ("KQkq", "Kq", "-"); `None` when the field is absent.
    pub castling: Option<String>,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string. Trailing fields may be omitted.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.is_empty() || parts.len() > 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let placement = Self::parse_placement(parts[0])?;

        let active_color = match parts.get(1).copied() {
            None | Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(other) => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = match parts.get(2).copied() {
            Some(field) => {
                Self::validate_castling(field)?;
                Some(field.to_string())
            }
            None => None,
        };

        Ok(FenParser {
            placement,
            active_color,
            castling,
        })
    }

    /// Returns true if the castling field grants the given right.
    ///
    /// An absent field grants every right.
    pub fn has_castling_right(&self, color: Color, kingside: bool) -> bool {
        let letter = match (color, kingside) {
            (Color::White, true) => 'K',
            (Color::White, false) => 'Q',
            (Color::Black, true) => 'k',
            (Color::Black, false) => 'q',
        };
        self.castling
            .as_deref()
            .map_or(true, |field| field.contains(letter))
    }

    fn parse_placement(placement: &str) -> Result<[[PlacementCell; 8]; 8], FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut grid = [[None; 8]; 8];
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0usize;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10) {
                    col += skip as usize;
                } else if let Some(cell) = PieceKind::from_fen_char(c) {
                    if col < 8 {
                        grid[row][col] = Some(cell);
                    }
                    col += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        8 - row
                    )));
                }
            }
            if col != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    8 - row,
                    col
                )));
            }
        }

        Ok(grid)
    }

    fn validate_castling(castling: &str) -> Result<(), FenError> {
        if castling == "-" {
            return Ok(());
        }

        for c in castling.chars() {
            if !"KQkq".contains(c) {
                return Err(FenError::InvalidCastlingRights(format!(
                    "invalid character '{}'",
                    c
                )));
            }
        }

        Ok(())
    }
}

impl Default for FenParser {
    fn default() -> Self {
        let mut placement = [[None; 8]; 8];
        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (col, kind) in back.into_iter().enumerate() {
            placement[0][col] = Some((kind, Color::Black));
            placement[1][col] = Some((PieceKind::Pawn, Color::Black));
            placement[6][col] = Some((PieceKind::Pawn, Color::White));
            placement[7][col] = Some((kind, Color::White));
        }
        FenParser {
            placement,
            active_color: Color::White,
            castling: Some("KQkq".to_string()),
        }
    }
}
