//! Recorded moves.

use crate::{Piece, PieceKind, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A move as it was executed, kept in the game history.
///
/// `piece` and `captured` are copies taken before the move, so a record
/// stays valid no matter how the board changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub from: Position,
    pub to: Position,
    /// The moving piece as it stood on `from`.
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub is_castling: bool,
    /// Kind the pawn became, for promotions.
    #[serde(default, rename = "promotionType")]
    pub promotion: Option<PieceKind>,
    /// True if the move left the opponent in check.
    #[serde(default)]
    pub is_check: bool,
    #[serde(default)]
    pub is_checkmate: bool,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub notation: String,
}

impl Move {
    /// Builds the short notation used in move lists: the moving piece's
    /// letter followed by the destination square ("Nf3", "Pe4", "Kg1").
    ///
    /// Ambiguous moves are not disambiguated and check, mate and castling
    /// are not marked.
    pub fn notation_for(kind: PieceKind, to: Position) -> String {
        format!("{}{}", kind.notation_letter(), to)
    }

    /// Returns true if the move removed an opposing piece.
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Returns true if a pawn was promoted by this move.
    #[inline]
    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// Returns the coordinate form of the move ("e2e4", "e7e8q").
    pub fn to_coordinate(&self) -> String {
        match self.promotion {
            Some(kind) => format!("{}{}{}", self.from, self.to, kind.to_char()),
            None => format!("{}{}", self.from, self.to),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.notation)
    }
}
