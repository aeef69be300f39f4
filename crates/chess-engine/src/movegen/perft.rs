//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.
//! Promotions count once per choice of piece.

use super::{apply_move, is_promotion_move, legal_moves};
use crate::Board;
use chess_core::{Color, PieceKind, Position, Promotion};

/// Visits every legal `(from, to, kind)` move for `turn`, where `kind` is
/// the piece that lands on `to`.
fn for_each_move<F>(board: &Board, turn: Color, mut visit: F)
where
    F: FnMut(Position, Position, PieceKind),
{
    for (from, piece) in board.pieces_of(turn) {
        for &to in &legal_moves(board, from, turn) {
            if is_promotion_move(board, from, to) {
                for promotion in Promotion::ALL {
                    visit(from, to, promotion.kind());
                }
            } else {
                visit(from, to, piece.kind);
            }
        }
    }
}

/// Counts the number of leaf nodes at the given depth.
pub fn perft(board: &Board, turn: Color, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0u64;
    for_each_move(board, turn, |from, to, kind| {
        if depth == 1 {
            nodes += 1;
        } else if let Some(applied) = apply_move(board, from, to, kind) {
            nodes += perft(&applied.board, turn.opposite(), depth - 1);
        }
    });
    nodes
}

/// Perft with divide - shows node count for each move at depth-1.
/// Useful for debugging to identify which moves have incorrect counts.
pub fn perft_divide(board: &Board, turn: Color, depth: u32) -> Vec<(String, u64)> {
    let mut results = Vec::new();

    for_each_move(board, turn, |from, to, kind| {
        let Some(applied) = apply_move(board, from, to, kind) else {
            return;
        };
        let nodes = if depth > 1 {
            perft(&applied.board, turn.opposite(), depth - 1)
        } else {
            1
        };
        let name = if applied.piece.kind == kind {
            format!("{}{}", from, to)
        } else {
            format!("{}{}{}", from, to, kind.to_char())
        };
        results.push((name, nodes));
    });

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}
