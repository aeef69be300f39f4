//! Move generation.
//!
//! Moves are generated per piece in two passes: pseudo-legal destinations
//! from the piece's movement shape, then a self-check filter that probes
//! each candidate on a copied board.

pub mod perft;

use crate::attacks::is_king_in_check;
use crate::rules::EngineStatus;
use crate::Board;
use chess_core::{Color, Piece, PieceKind, Position};

/// Destination squares for a single piece, with a fixed maximum capacity.
///
/// A queen in the open reaches 27 squares and a king at most 10 including
/// castling, so a fixed-size array avoids heap allocations during generation.
#[derive(Clone, Copy)]
pub struct MoveList {
    targets: [Position; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Maximum number of destinations for any one piece.
    pub const MAX_MOVES: usize = 32;

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            targets: [Position { row: 0, col: 0 }; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a destination to the list.
    #[inline]
    pub fn push(&mut self, to: Position) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.targets[self.len] = to;
        self.len += 1;
    }

    /// Returns the number of destinations.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the destinations, in generation order.
    #[inline]
    pub fn as_slice(&self) -> &[Position] {
        &self.targets[..self.len]
    }

    /// Returns true if the list holds the given destination.
    #[inline]
    pub fn contains(&self, to: Position) -> bool {
        self.as_slice().contains(&to)
    }

    /// Retains only destinations for which the predicate returns true.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Position) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.targets[read]) {
                self.targets[write] = self.targets[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Position;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.targets[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Position;
    type IntoIter = std::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
];

const KING_STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ORTHOGONALS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Returns the legal destinations for the piece on `from`.
///
/// Empty if the cell is empty or the piece does not belong to `turn`.
/// Destinations come back in generation order; no ranking is implied.
pub fn legal_moves(board: &Board, from: Position, turn: Color) -> MoveList {
    let Some(piece) = board.get(from) else {
        return MoveList::new();
    };
    if piece.color != turn {
        return MoveList::new();
    }

    let mut moves = pseudo_legal_moves(board, from);
    moves.retain(|&to| {
        if is_castling_move(board, from, to) {
            // The king may not pass through an attacked square.
            let mid = Position {
                row: from.row,
                col: (from.col + to.col) / 2,
            };
            if is_king_in_check(&simulate_move(board, from, mid), turn) {
                return false;
            }
        }
        !is_king_in_check(&simulate_move(board, from, to), turn)
    });
    moves
}

/// Returns the pseudo-legal destinations for the piece on `from`: moves
/// consistent with its movement shape and occupancy, not yet checked for
/// leaving its own king attacked.
pub fn pseudo_legal_moves(board: &Board, from: Position) -> MoveList {
    let mut moves = MoveList::new();
    let Some(piece) = board.get(from) else {
        return moves;
    };

    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(board, from, piece, &mut moves),
        PieceKind::Knight => generate_step_moves(board, from, piece, &KNIGHT_JUMPS, &mut moves),
        PieceKind::King => {
            generate_step_moves(board, from, piece, &KING_STEPS, &mut moves);
            generate_castling_moves(board, from, piece, &mut moves);
        }
        PieceKind::Bishop => generate_ray_moves(board, from, piece, &DIAGONALS, &mut moves),
        PieceKind::Rook => generate_ray_moves(board, from, piece, &ORTHOGONALS, &mut moves),
        PieceKind::Queen => {
            generate_ray_moves(board, from, piece, &DIAGONALS, &mut moves);
            generate_ray_moves(board, from, piece, &ORTHOGONALS, &mut moves);
        }
    }

    moves
}

/// Generates pawn pushes and diagonal captures. En passant is not generated.
fn generate_pawn_moves(board: &Board, from: Position, pawn: Piece, moves: &mut MoveList) {
    let dir = pawn.color.pawn_direction();

    if let Some(one) = from.offset(dir, 0) {
        if board.is_empty(one) {
            moves.push(one);
            if from.row == pawn.color.pawn_row() {
                if let Some(two) = one.offset(dir, 0) {
                    if board.is_empty(two) {
                        moves.push(two);
                    }
                }
            }
        }
    }

    for d_col in [1, -1] {
        if let Some(to) = from.offset(dir, d_col) {
            if board.get(to).is_some_and(|target| target.color != pawn.color) {
                moves.push(to);
            }
        }
    }
}

/// Generates fixed-offset moves (knight jumps, king steps).
fn generate_step_moves(
    board: &Board,
    from: Position,
    piece: Piece,
    offsets: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(d_row, d_col) in offsets {
        if let Some(to) = from.offset(d_row, d_col) {
            match board.get(to) {
                Some(target) if target.color == piece.color => {}
                _ => moves.push(to),
            }
        }
    }
}

/// Walks each ray until the edge or the first occupied cell, which is
/// included only when it holds an opposing piece.
fn generate_ray_moves(
    board: &Board,
    from: Position,
    piece: Piece,
    directions: &[(i8, i8)],
    moves: &mut MoveList,
) {
    for &(d_row, d_col) in directions {
        let mut current = from.offset(d_row, d_col);
        while let Some(to) = current {
            match board.get(to) {
                None => moves.push(to),
                Some(target) => {
                    if target.color != piece.color {
                        moves.push(to);
                    }
                    break;
                }
            }
            current = to.offset(d_row, d_col);
        }
    }
}

/// Generates castling candidates for an unmoved king on its home square.
///
/// Only the rook's flag and the emptiness of the squares between king and
/// rook are checked here, plus the king not currently being in check. The
/// squares the king crosses are validated by the self-check filter.
fn generate_castling_moves(board: &Board, from: Position, king: Piece, moves: &mut MoveList) {
    let row = king.color.back_row();
    if king.has_moved || from != (Position { row, col: 4 }) {
        return;
    }
    if is_king_in_check(board, king.color) {
        return;
    }

    let rook_ready = |col: u8| {
        board
            .get(Position { row, col })
            .is_some_and(|rook| rook.is(PieceKind::Rook, king.color) && !rook.has_moved)
    };
    let empty = |cols: &[u8]| cols.iter().all(|&col| board.is_empty(Position { row, col }));

    if rook_ready(7) && empty(&[5, 6]) {
        moves.push(Position { row, col: 6 });
    }
    if rook_ready(0) && empty(&[1, 2, 3]) {
        moves.push(Position { row, col: 2 });
    }
}

/// Returns true if moving the piece on `from` to `to` is a castling move:
/// a king travelling two columns.
pub fn is_castling_move(board: &Board, from: Position, to: Position) -> bool {
    board
        .get(from)
        .is_some_and(|piece| piece.kind == PieceKind::King)
        && from.row == to.row
        && (to.col as i8 - from.col as i8).abs() == 2
}

/// Returns true if moving the piece on `from` to `to` lands a pawn on its
/// promotion row.
pub fn is_promotion_move(board: &Board, from: Position, to: Position) -> bool {
    board
        .get(from)
        .is_some_and(|piece| piece.kind == PieceKind::Pawn && to.row == piece.color.promotion_row())
}

/// Returns a copy of the board with the piece on `from` relocated to `to`.
///
/// This is the legality probe: whatever stood on `to` is overwritten and
/// no castling rook is moved.
pub fn simulate_move(board: &Board, from: Position, to: Position) -> Board {
    let mut next = *board;
    let mover = next.take(from);
    next.set(to, mover);
    next
}

/// The result of executing a move on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    /// The board after the move.
    pub board: Board,
    /// The moving piece as it stood before the move.
    pub piece: Piece,
    /// The piece removed from the destination, if any.
    pub captured: Option<Piece>,
    pub is_castling: bool,
}

/// Executes a move on a copy of the board.
///
/// Relocates the castling rook when the king travels two columns, removes
/// any piece on `to`, and writes the mover there as `promote_to` with its
/// moved flag set. Returns `None` if `from` is empty.
pub fn apply_move(
    board: &Board,
    from: Position,
    to: Position,
    promote_to: PieceKind,
) -> Option<AppliedMove> {
    let piece = board.get(from)?;
    let mut next = *board;

    let is_castling = is_castling_move(board, from, to);
    if is_castling {
        let (rook_from, rook_to) = if to.col == 6 { (7, 5) } else { (0, 3) };
        let rook_from = Position {
            row: from.row,
            col: rook_from,
        };
        if let Some(mut rook) = next.take(rook_from) {
            rook.has_moved = true;
            next.set(
                Position {
                    row: from.row,
                    col: rook_to,
                },
                Some(rook),
            );
        }
    }

    let captured = next.take(to);
    next.take(from);
    next.set(
        to,
        Some(Piece {
            kind: promote_to,
            has_moved: true,
            ..piece
        }),
    );

    Some(AppliedMove {
        board: next,
        piece,
        captured,
        is_castling,
    })
}

/// Returns true if `turn` has at least one legal move anywhere on the board.
pub fn has_legal_move(board: &Board, turn: Color) -> bool {
    board
        .pieces_of(turn)
        .any(|(from, _)| !legal_moves(board, from, turn).is_empty())
}

/// Classifies the position for the side to move.
///
/// `Playing` if `turn` has any legal move; otherwise `Checkmate` when its
/// king is in check and `Draw` when it is not. Stalemate is the only draw
/// this detects.
pub fn game_status(board: &Board, turn: Color) -> EngineStatus {
    if has_legal_move(board, turn) {
        EngineStatus::Playing
    } else if is_king_in_check(board, turn) {
        EngineStatus::Checkmate
    } else {
        EngineStatus::Draw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(s: &str) -> Position {
        Position::from_algebraic(s).unwrap()
    }

    fn targets(list: &MoveList) -> Vec<String> {
        let mut names: Vec<_> = list.as_slice().iter().map(|p| p.to_algebraic()).collect();
        names.sort();
        names
    }

    #[test]
    fn movelist_push_and_iterate() {
        let mut list = MoveList::new();
        assert!(list.is_empty());

        list.push(pos("e3"));
        list.push(pos("e4"));

        assert_eq!(list.len(), 2);
        assert_eq!(list[0], pos("e3"));
        assert_eq!(list[1], pos("e4"));
        assert!(list.contains(pos("e4")));
        assert_eq!((&list).into_iter().count(), 2);
    }

    #[test]
    fn movelist_retain() {
        let mut list = MoveList::new();
        list.push(pos("e3"));
        list.push(pos("e4"));
        list.push(pos("d3"));

        list.retain(|p| p.col == 4);
        assert_eq!(list.len(), 2);
        assert!(!list.contains(pos("d3")));
    }

    #[test]
    fn startpos_counts() {
        let board = Board::standard();
        let total: usize = board
            .pieces_of(Color::White)
            .map(|(from, _)| legal_moves(&board, from, Color::White).len())
            .sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn wrong_turn_or_empty_cell_has_no_moves() {
        let board = Board::standard();
        assert!(legal_moves(&board, pos("e7"), Color::White).is_empty());
        assert!(legal_moves(&board, pos("e4"), Color::White).is_empty());
    }

    #[test]
    fn pawn_pushes_and_captures() {
        let board = Board::from_fen("4k3/8/8/8/8/3p1p2/4P3/4K3").unwrap();
        let moves = legal_moves(&board, pos("e2"), Color::White);
        assert_eq!(targets(&moves), vec!["d3", "e3", "e4", "f3"]);
    }

    #[test]
    fn pawn_double_step_needs_both_cells_empty() {
        let blocked_far = Board::from_fen("4k3/8/8/8/4n3/8/4P3/4K3").unwrap();
        assert_eq!(
            targets(&legal_moves(&blocked_far, pos("e2"), Color::White)),
            vec!["e3"]
        );

        let blocked_near = Board::from_fen("4k3/8/8/8/8/4n3/4P3/4K3").unwrap();
        assert!(legal_moves(&blocked_near, pos("e2"), Color::White).is_empty());
    }

    #[test]
    fn pawn_double_step_only_from_start_row() {
        let board = Board::from_fen("4k3/8/8/8/8/4P3/8/4K3").unwrap();
        assert_eq!(
            targets(&legal_moves(&board, pos("e3"), Color::White)),
            vec!["e4"]
        );
    }

    #[test]
    fn black_pawn_moves_down() {
        let board = Board::from_fen("4k3/4p3/8/8/8/8/8/4K3 b").unwrap();
        assert_eq!(
            targets(&legal_moves(&board, pos("e7"), Color::Black)),
            vec!["e5", "e6"]
        );
    }

    #[test]
    fn knight_in_corner() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/N3K3").unwrap();
        assert_eq!(
            targets(&legal_moves(&board, pos("a1"), Color::White)),
            vec!["b3", "c2"]
        );
    }

    #[test]
    fn rook_rays_stop_at_pieces() {
        let board = Board::from_fen("4k3/8/8/8/r7/8/8/R3K3").unwrap();
        let moves = legal_moves(&board, pos("a1"), Color::White);
        assert_eq!(
            targets(&moves),
            vec!["a2", "a3", "a4", "b1", "c1", "d1"]
        );
    }

    #[test]
    fn queen_in_open_board() {
        let board = Board::from_fen("k7/8/8/8/3Q4/8/8/7K").unwrap();
        assert_eq!(legal_moves(&board, pos("d4"), Color::White).len(), 27);
    }

    #[test]
    fn pinned_piece_cannot_leave_line() {
        let board = Board::from_fen("4r1k1/8/8/8/8/8/4B3/4K3").unwrap();
        assert!(legal_moves(&board, pos("e2"), Color::White).is_empty());
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let board = Board::from_fen("3r2k1/8/8/8/8/8/8/4K3").unwrap();
        let moves = legal_moves(&board, pos("e1"), Color::White);
        assert!(!moves.contains(pos("d1")));
        assert!(!moves.contains(pos("d2")));
        assert!(moves.contains(pos("f1")));
    }

    #[test]
    fn castling_both_sides() {
        let board = Board::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq").unwrap();
        let moves = legal_moves(&board, pos("e1"), Color::White);
        assert!(moves.contains(pos("g1")));
        assert!(moves.contains(pos("c1")));
    }

    #[test]
    fn no_castling_through_check() {
        // The rook on f8 covers f1, the square the king crosses.
        let board = Board::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ").unwrap();
        let moves = legal_moves(&board, pos("e1"), Color::White);
        assert!(!moves.contains(pos("g1")));
        assert!(moves.contains(pos("c1")));
    }

    #[test]
    fn no_castling_into_check() {
        let board = Board::from_fen("4k1r1/8/8/8/8/8/8/R3K2R w KQ").unwrap();
        let moves = legal_moves(&board, pos("e1"), Color::White);
        assert!(!moves.contains(pos("g1")));
    }

    #[test]
    fn no_castling_out_of_check() {
        let board = Board::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ").unwrap();
        let moves = legal_moves(&board, pos("e1"), Color::White);
        assert!(!moves.contains(pos("g1")));
        assert!(!moves.contains(pos("c1")));
    }

    #[test]
    fn no_castling_with_piece_between() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/RN2K1NR w KQ").unwrap();
        let moves = legal_moves(&board, pos("e1"), Color::White);
        assert!(!moves.contains(pos("g1")));
        assert!(!moves.contains(pos("c1")));
    }

    #[test]
    fn castling_gated_by_moved_flags() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ").unwrap();
        let mut rook = board.get(pos("h1")).unwrap();
        rook.has_moved = true;
        board.set(pos("h1"), Some(rook));
        let moves = pseudo_legal_moves(&board, pos("e1"));
        assert!(!moves.contains(pos("g1")));
        assert!(moves.contains(pos("c1")));

        let mut king = board.get(pos("e1")).unwrap();
        king.has_moved = true;
        board.set(pos("e1"), Some(king));
        let moves = pseudo_legal_moves(&board, pos("e1"));
        assert!(!moves.contains(pos("c1")));
    }

    #[test]
    fn queenside_castle_allows_attacked_b_file() {
        // b1 is attacked but the king never crosses it.
        let board = Board::from_fen("1r2k3/8/8/8/8/8/8/R3K3 w Q").unwrap();
        let moves = legal_moves(&board, pos("e1"), Color::White);
        assert!(moves.contains(pos("c1")));
    }

    #[test]
    fn apply_castle_moves_rook() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K2R w KQ").unwrap();
        let applied = apply_move(&board, pos("e1"), pos("g1"), PieceKind::King).unwrap();
        assert!(applied.is_castling);
        let king = applied.board.get(pos("g1")).unwrap();
        let rook = applied.board.get(pos("f1")).unwrap();
        assert!(king.is(PieceKind::King, Color::White) && king.has_moved);
        assert!(rook.is(PieceKind::Rook, Color::White) && rook.has_moved);
        assert!(applied.board.is_empty(pos("e1")));
        assert!(applied.board.is_empty(pos("h1")));

        let queenside = apply_move(&board, pos("e1"), pos("c1"), PieceKind::King).unwrap();
        assert!(queenside.board.get(pos("d1")).unwrap().is(PieceKind::Rook, Color::White));
        assert!(queenside.board.is_empty(pos("a1")));
    }

    #[test]
    fn apply_capture_and_promotion() {
        let board = Board::from_fen("1r2k3/P7/8/8/8/8/8/4K3").unwrap();
        let applied = apply_move(&board, pos("a7"), pos("b8"), PieceKind::Queen).unwrap();
        assert_eq!(applied.captured.map(|p| p.kind), Some(PieceKind::Rook));
        assert_eq!(applied.piece.kind, PieceKind::Pawn);
        let queen = applied.board.get(pos("b8")).unwrap();
        assert_eq!(queen.kind, PieceKind::Queen);
        assert_eq!(queen.id, applied.piece.id);
        assert!(queen.has_moved);
        // The source board is untouched.
        assert_eq!(board.get(pos("a7")).unwrap().kind, PieceKind::Pawn);
    }

    #[test]
    fn apply_from_empty_cell() {
        assert!(apply_move(&Board::standard(), pos("e4"), pos("e5"), PieceKind::Pawn).is_none());
    }

    #[test]
    fn promotion_detection() {
        let board = Board::from_fen("4k3/P7/8/8/8/8/p7/4K3").unwrap();
        assert!(is_promotion_move(&board, pos("a7"), pos("a8")));
        assert!(is_promotion_move(&board, pos("a2"), pos("a1")));
        assert!(!is_promotion_move(&board, pos("e1"), pos("e2")));
    }

    #[test]
    fn status_playing_at_start() {
        assert_eq!(game_status(&Board::standard(), Color::White), EngineStatus::Playing);
    }

    #[test]
    fn status_checkmate() {
        // Back-rank mate.
        let board = Board::from_fen("3R2k1/5ppp/8/8/8/8/8/6K1 b").unwrap();
        assert_eq!(game_status(&board, Color::Black), EngineStatus::Checkmate);
    }

    #[test]
    fn status_stalemate_is_draw() {
        let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b").unwrap();
        assert_eq!(game_status(&board, Color::Black), EngineStatus::Draw);
    }
}
