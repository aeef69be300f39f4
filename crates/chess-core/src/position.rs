//! Board coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell on the board, addressed by row and column.
///
/// Row 0 is Black's back rank (rank 8) and row 7 is White's back rank
/// (rank 1). Column 0 is the a-file.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Creates a position, or `None` if either coordinate is off the board.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Position { row, col })
        } else {
            None
        }
    }

    /// Returns true if both coordinates are on the board.
    ///
    /// Positions built through the public fields may be out of range; the
    /// engine treats such positions as empty cells.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.row < 8 && self.col < 8
    }

    /// Returns the position shifted by the given row and column deltas,
    /// or `None` if that leaves the board.
    #[inline]
    pub const fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = self.row as i16 + d_row as i16;
        let col = self.col as i16 + d_col as i16;
        if row < 0 || row >= 8 || col < 0 || col >= 8 {
            return None;
        }
        Some(Position {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Parses a position from algebraic notation (e.g., "e4").
    pub const fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if file < b'a' || file > b'h' || rank < b'1' || rank > b'8' {
            return None;
        }
        Some(Position {
            row: 7 - (rank - b'1'),
            col: file - b'a',
        })
    }

    /// Returns the file letter ('a'-'h').
    #[inline]
    pub const fn file_char(self) -> char {
        (b'a' + self.col) as char
    }

    /// Returns the rank digit ('1'-'8').
    #[inline]
    pub const fn rank_char(self) -> char {
        (b'1' + (7 - self.row)) as char
    }

    /// Returns the algebraic notation for this position.
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.file_char(), self.rank_char())
    }

    /// Iterates over all 64 positions, row by row from row 0.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Position { row, col }))
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "Position({})", self.to_algebraic())
        } else {
            write!(f, "Position({}, {})", self.row, self.col)
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}", self.to_algebraic())
        } else {
            write!(f, "({}, {})", self.row, self.col)
        }
    }
}
