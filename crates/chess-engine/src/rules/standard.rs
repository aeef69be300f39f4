//! Standard chess rules implementation.

use super::{EngineStatus, RuleSet};
use crate::attacks::is_king_in_check;
use crate::movegen::{game_status, is_promotion_move, legal_moves};
use crate::{Board, MoveList};
use chess_core::{Color, Position};

/// Standard chess rules.
///
/// Covers piece movement, castling, promotion, and check, checkmate and
/// stalemate detection. En passant, the fifty-move rule and repetition are
/// not implemented.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl RuleSet for StandardChess {
    fn initial_board(&self) -> Board {
        Board::standard()
    }

    fn legal_moves(&self, board: &Board, from: Position, turn: Color) -> MoveList {
        legal_moves(board, from, turn)
    }

    fn is_check(&self, board: &Board, color: Color) -> bool {
        is_king_in_check(board, color)
    }

    fn needs_promotion(&self, board: &Board, from: Position, to: Position) -> bool {
        is_promotion_move(board, from, to)
    }

    fn status(&self, board: &Board, turn: Color) -> EngineStatus {
        game_status(board, turn)
    }
}
