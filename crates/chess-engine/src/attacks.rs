//! Attack detection over a board snapshot.
//!
//! Everything here is a pure read of a [`Board`]: nothing is mutated and no
//! turn history is consulted.

use crate::Board;
use chess_core::{Color, PieceKind, Position};

/// Returns true if no piece stands strictly between `from` and `to`.
///
/// The two positions must share a rank, file or diagonal. Any other pair
/// (including knight-shaped offsets) is reported as blocked. Identical
/// positions have nothing between them. Off-board positions are blocked.
pub fn is_path_clear(board: &Board, from: Position, to: Position) -> bool {
    if !from.is_valid() || !to.is_valid() {
        return false;
    }
    let d_row = to.row as i8 - from.row as i8;
    let d_col = to.col as i8 - from.col as i8;

    if d_row == 0 && d_col == 0 {
        return true;
    }
    if d_row != 0 && d_col != 0 && d_row.abs() != d_col.abs() {
        return false;
    }

    let step_row = d_row.signum();
    let step_col = d_col.signum();
    let mut current = from.offset(step_row, step_col);
    while let Some(pos) = current {
        if pos == to {
            return true;
        }
        if !board.is_empty(pos) {
            return false;
        }
        current = pos.offset(step_row, step_col);
    }
    false
}

/// Returns true if the piece on `from` could capture something standing on `to`.
///
/// Whose turn it is and whether `to` is occupied are both ignored. Pawns
/// attack only their two forward diagonals; kings attack adjacent cells with
/// no castling logic.
pub fn can_attack(board: &Board, from: Position, to: Position) -> bool {
    let Some(piece) = board.get(from) else {
        return false;
    };
    if from == to || !to.is_valid() {
        return false;
    }

    let d_row = to.row as i8 - from.row as i8;
    let dr = d_row.abs();
    let dc = (to.col as i8 - from.col as i8).abs();

    match piece.kind {
        PieceKind::Pawn => d_row == piece.color.pawn_direction() && dc == 1,
        PieceKind::Knight => (dr == 2 && dc == 1) || (dr == 1 && dc == 2),
        PieceKind::King => dr <= 1 && dc <= 1,
        PieceKind::Bishop => dr == dc && is_path_clear(board, from, to),
        PieceKind::Rook => (dr == 0 || dc == 0) && is_path_clear(board, from, to),
        PieceKind::Queen => {
            (dr == dc || dr == 0 || dc == 0) && is_path_clear(board, from, to)
        }
    }
}

/// Returns true if any piece of color `by` can attack `target`.
pub fn is_square_attacked(board: &Board, target: Position, by: Color) -> bool {
    board
        .pieces_of(by)
        .any(|(from, _)| can_attack(board, from, target))
}

/// Returns true if the king of the given color is attacked.
///
/// A board with no king of that color is reported as not in check.
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    match board.find_king(color) {
        Some(king) => is_square_attacked(board, king, color.opposite()),
        None => {
            tracing::trace!(%color, "no king on board during check detection");
            false
        }
    }
}
