//! 8×8 board grid.

use chess_core::{Color, FenError, FenParser, Piece, PieceId, PieceKind, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An 8×8 grid of optional pieces, indexed `[row][col]`.
///
/// The grid is a fixed-size `Copy` array, so cloning a board for a legality
/// probe never touches the heap and never aliases the caller's board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl Board {
    /// Creates a board with no pieces.
    pub const fn empty() -> Self {
        Board {
            cells: [[None; 8]; 8],
        }
    }

    /// Creates the standard starting position.
    ///
    /// Piece ids are handed out row by row from a8, so the same layout
    /// always carries the same ids.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        let mut next_id = 0u8;
        for row in [0u8, 1, 6, 7] {
            let color = if row < 2 { Color::Black } else { Color::White };
            for col in 0..8u8 {
                let kind = if row == 1 || row == 6 {
                    PieceKind::Pawn
                } else {
                    BACK_ROW[col as usize]
                };
                board.cells[row as usize][col as usize] =
                    Some(Piece::new(PieceId(next_id), kind, color));
                next_id += 1;
            }
        }
        board
    }

    /// Creates a board from a FEN string. Only piece placement and castling
    /// availability are used.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        FenParser::parse(fen).map(|parsed| Self::from_parsed(&parsed))
    }

    /// Builds a board from parsed FEN data.
    ///
    /// Kings and corner rooks whose castling right is missing are marked as
    /// moved; every other piece starts unmoved.
    pub fn from_parsed(parsed: &FenParser) -> Self {
        let mut board = Board::empty();
        let mut next_id = 0u8;
        for (row, rank) in parsed.placement.iter().enumerate() {
            for (col, cell) in rank.iter().enumerate() {
                let Some((kind, color)) = *cell else {
                    continue;
                };
                let mut piece = Piece::new(PieceId(next_id), kind, color);
                next_id += 1;
                let home = row as u8 == color.back_row();
                piece.has_moved = match kind {
                    PieceKind::King => {
                        !(home
                            && col == 4
                            && (parsed.has_castling_right(color, true)
                                || parsed.has_castling_right(color, false)))
                    }
                    PieceKind::Rook if home && col == 7 => {
                        !parsed.has_castling_right(color, true)
                    }
                    PieceKind::Rook if home && col == 0 => {
                        !parsed.has_castling_right(color, false)
                    }
                    _ => false,
                };
                board.cells[row][col] = Some(piece);
            }
        }
        board
    }

    /// Returns the piece at the given position. Off-board positions are empty.
    #[inline]
    pub fn get(&self, pos: Position) -> Option<Piece> {
        if pos.is_valid() {
            self.cells[pos.row as usize][pos.col as usize]
        } else {
            None
        }
    }

    /// Returns true if no piece stands at the given position.
    #[inline]
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Places (or clears) a piece. Off-board positions are ignored.
    #[inline]
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        debug_assert!(pos.is_valid(), "set on off-board {:?}", pos);
        if pos.is_valid() {
            self.cells[pos.row as usize][pos.col as usize] = piece;
        }
    }

    /// Removes and returns the piece at the given position.
    #[inline]
    pub fn take(&mut self, pos: Position) -> Option<Piece> {
        let piece = self.get(pos);
        if piece.is_some() {
            self.set(pos, None);
        }
        piece
    }

    /// Iterates over every occupied cell, row by row from row 0.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |pos| self.get(pos).map(|piece| (pos, piece)))
    }

    /// Iterates over the pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// Returns the square of the given color's king, if it is on the board.
    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|(_, piece)| piece.is(PieceKind::King, color))
            .map(|(pos, _)| pos)
    }

    /// Counts the pieces of a kind and color.
    pub fn count(&self, kind: PieceKind, color: Color) -> usize {
        self.pieces().filter(|(_, piece)| piece.is(kind, color)).count()
    }

    /// Returns the FEN piece-placement field for this board.
    pub fn to_fen_placement(&self) -> String {
        let mut fen = String::new();
        for row in 0..8usize {
            let mut empty_count = 0;
            for col in 0..8usize {
                match self.cells[row][col] {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push_str(&empty_count.to_string());
                            empty_count = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if row < 7 {
                fen.push('/');
            }
        }
        fen
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, rank) in self.cells.iter().enumerate() {
            write!(f, "{} ", 8 - row)?;
            for cell in rank {
                let c = cell.map_or('.', |piece| piece.to_fen_char());
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
