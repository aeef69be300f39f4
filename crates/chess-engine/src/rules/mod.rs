//! Rule set abstraction.
//!
//! The game state machine delegates every board-level question to a
//! [`RuleSet`]. [`StandardChess`] is the only implementation.

mod standard;

pub use standard::StandardChess;

use crate::{Board, MoveList};
use chess_core::{Color, Position};
use serde::{Deserialize, Serialize};

/// Classification of a position for the side to move.
///
/// `Draw` covers stalemate only; insufficient material, repetition and the
/// fifty-move rule are not detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    /// The side to move has at least one legal move.
    Playing,
    /// No legal move and the king is attacked.
    Checkmate,
    /// No legal move and the king is not attacked.
    Draw,
}

impl EngineStatus {
    /// Returns true for checkmate and draw.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, EngineStatus::Playing)
    }
}

/// Board-level rules consulted by the game state machine.
///
/// # Example
///
/// ```
/// use chess_engine::rules::RuleSet;
/// use chess_engine::StandardChess;
/// use chess_core::{Color, Position};
///
/// let board = StandardChess.initial_board();
/// let e2 = Position::from_algebraic("e2").unwrap();
/// assert_eq!(StandardChess.legal_moves(&board, e2, Color::White).len(), 2);
/// ```
pub trait RuleSet {
    /// Returns the board a new game starts from.
    fn initial_board(&self) -> Board;

    /// Returns the legal destinations for the piece on `from`.
    fn legal_moves(&self, board: &Board, from: Position, turn: Color) -> MoveList;

    /// Returns true if moving from `from` to `to` is legal for `turn`.
    fn is_legal(&self, board: &Board, from: Position, to: Position, turn: Color) -> bool {
        self.legal_moves(board, from, turn).contains(to)
    }

    /// Returns true if the given color's king is attacked.
    fn is_check(&self, board: &Board, color: Color) -> bool;

    /// Returns true if the move needs a promotion choice before it can run.
    fn needs_promotion(&self, board: &Board, from: Position, to: Position) -> bool;

    /// Classifies the position for the side to move.
    fn status(&self, board: &Board, turn: Color) -> EngineStatus;
}
