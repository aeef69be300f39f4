//! Whole-game scenarios played through the public API.

use chess_core::{Color, PieceKind, Position, Promotion};
use chess_engine::{
    game_status, movegen, Board, ClockConfig, EngineStatus, GameError, GameMode, GameState,
    GameStatus, MoveOutcome,
};

fn sq(s: &str) -> Position {
    Position::from_algebraic(s).unwrap()
}

fn new_game() -> GameState {
    GameState::new(GameMode::Local, &ClockConfig::default())
}

fn from_fen(fen: &str) -> GameState {
    GameState::from_fen(fen, GameMode::Local, &ClockConfig::default()).unwrap()
}

fn play(state: &mut GameState, moves: &[(&str, &str)]) {
    for &(from, to) in moves {
        assert!(
            state.make_move(sq(from), sq(to)),
            "{}{} should be legal",
            from,
            to
        );
    }
}

#[test]
fn fools_mate() {
    let mut state = new_game();
    play(
        &mut state,
        &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")],
    );

    assert_eq!(game_status(state.board(), Color::White), EngineStatus::Checkmate);
    assert_eq!(state.status(), GameStatus::Checkmate);
    assert_eq!(state.winner(), Some(Color::Black));
    assert_eq!(state.turn(), Color::White);

    let notations: Vec<_> = state.history().iter().map(|m| m.notation.as_str()).collect();
    assert_eq!(notations, vec!["Pf3", "Pe5", "Pg4", "Qh4"]);
    let last = state.last_move().unwrap();
    assert!(last.is_check && last.is_checkmate);
    assert!(state.history()[..3].iter().all(|m| !m.is_checkmate));
}

#[test]
fn stalemate_is_a_draw() {
    // Black king boxed in on h8 by the queen on f7 and king on g6.
    let board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b").unwrap();
    assert_eq!(game_status(&board, Color::Black), EngineStatus::Draw);

    // Reaching it by a move ends the game the same way.
    let mut state = from_fen("7k/8/6K1/8/8/8/8/5Q2 w");
    play(&mut state, &[("f1", "f7")]);
    assert_eq!(state.status(), GameStatus::Draw);
    assert_eq!(state.winner(), None);
}

#[test]
fn promotion_round_trip() {
    let mut state = from_fen("4k3/1P6/8/8/8/8/8/4K3 w - -");
    let before = *state.board();
    let pawn = before.get(sq("b7")).unwrap();

    assert_eq!(
        state.try_make_move(sq("b7"), sq("b8")),
        Ok(MoveOutcome::PromotionPending)
    );
    assert_eq!(state.status(), GameStatus::PromotionPending);
    assert_eq!(state.board(), &before);
    assert_eq!(state.turn(), Color::White);
    assert!(state.history().is_empty());

    state.promote_pawn(Promotion::Queen);
    let queen = state.board().get(sq("b8")).unwrap();
    assert_eq!(queen.kind, PieceKind::Queen);
    assert_eq!(queen.color, Color::White);
    assert_eq!(queen.id, pawn.id);
    assert!(queen.has_moved);
    assert!(state.board().is_empty(sq("b7")));
    assert_eq!(state.board().count(PieceKind::Pawn, Color::White), 0);
    assert_eq!(state.turn(), Color::Black);
    assert_eq!(state.promotion_position(), None);
    assert_eq!(state.status(), GameStatus::Playing);

    let record = state.last_move().unwrap();
    assert_eq!(record.piece.kind, PieceKind::Pawn);
    assert_eq!(record.promotion, Some(PieceKind::Queen));
    assert!(record.is_check);
}

#[test]
fn promotion_by_capture() {
    let mut state = from_fen("r3k3/1P6/8/8/8/8/8/4K3 w - -");
    assert_eq!(
        state.try_make_move(sq("b7"), sq("a8")),
        Ok(MoveOutcome::PromotionPending)
    );
    state.try_promote_pawn(Promotion::Rook).unwrap();

    let record = state.last_move().unwrap();
    assert!(record.is_capture());
    assert_eq!(record.captured.unwrap().kind, PieceKind::Rook);
    assert_eq!(state.board().get(sq("a8")).unwrap().kind, PieceKind::Rook);
}

#[test]
fn kingside_castle_moves_king_and_rook() {
    let mut state = new_game();
    play(
        &mut state,
        &[("e2", "e4"), ("e7", "e5"), ("g1", "f3"), ("b8", "c6"), ("f1", "c4"), ("g8", "f6")],
    );
    play(&mut state, &[("e1", "g1")]);

    let board = state.board();
    let king = board.get(sq("g1")).unwrap();
    let rook = board.get(sq("f1")).unwrap();
    assert!(king.is(PieceKind::King, Color::White) && king.has_moved);
    assert!(rook.is(PieceKind::Rook, Color::White) && rook.has_moved);
    assert!(board.is_empty(sq("e1")));
    assert!(board.is_empty(sq("h1")));

    let record = state.last_move().unwrap();
    assert!(record.is_castling);
    assert_eq!(record.notation, "Kg1");
    assert_eq!(state.history().len(), 7);
}

#[test]
fn queenside_castle_for_black() {
    let mut state = from_fen("r3k3/8/8/8/8/8/8/4K3 b q");
    play(&mut state, &[("e8", "c8")]);
    let board = state.board();
    assert!(board.get(sq("c8")).unwrap().is(PieceKind::King, Color::Black));
    assert!(board.get(sq("d8")).unwrap().is(PieceKind::Rook, Color::Black));
    assert!(board.is_empty(sq("a8")));
}

#[test]
fn castling_gated_by_moved_flags_not_squares() {
    // The rook leaves and comes back: same squares, but castling is gone.
    let mut state = from_fen("4k3/p7/8/8/8/8/8/4K2R w K");
    play(&mut state, &[("h1", "h2"), ("a7", "a6"), ("h2", "h1"), ("a6", "a5")]);
    assert!(!state.legal_moves(sq("e1")).contains(sq("g1")));

    // Same for the king.
    let mut state = from_fen("4k3/p7/8/8/8/8/8/4K2R w K");
    play(&mut state, &[("e1", "f1"), ("a7", "a6"), ("f1", "e1"), ("a6", "a5")]);
    assert!(!state.legal_moves(sq("e1")).contains(sq("g1")));

    let fresh = from_fen("4k3/p7/8/8/8/8/8/4K2R w K");
    assert!(fresh.legal_moves(sq("e1")).contains(sq("g1")));
}

#[test]
fn castling_through_attacked_square_is_rejected() {
    let mut state = from_fen("5rk1/8/8/8/8/8/8/4K2R w K");
    assert_eq!(
        state.try_make_move(sq("e1"), sq("g1")),
        Err(GameError::IllegalMove {
            from: sq("e1"),
            to: sq("g1")
        })
    );
}

#[test]
fn history_snapshots_survive_later_moves() {
    let mut state = new_game();
    play(&mut state, &[("e2", "e4")]);
    let first = state.history()[0].clone();
    play(&mut state, &[("d7", "d5"), ("e4", "d5")]);

    assert_eq!(state.history()[0], first);
    assert!(!state.history()[0].piece.has_moved);
    assert!(state.history()[2].piece.has_moved);
}

#[test]
fn resign_ends_game_for_side_to_move() {
    let mut state = new_game();
    play(&mut state, &[("e2", "e4"), ("e7", "e5")]);
    state.resign().unwrap();

    assert_eq!(state.status(), GameStatus::Resigned);
    assert_eq!(state.winner(), Some(Color::Black));
    assert!(!state.make_move(sq("d2"), sq("d4")));
    assert_eq!(state.resign(), Err(GameError::GameAlreadyOver));
}

#[test]
fn resign_while_promotion_pending() {
    let mut state = from_fen("4k3/1P6/8/8/8/8/8/4K3 w - -");
    state.try_make_move(sq("b7"), sq("b8")).unwrap();
    state.resign().unwrap();
    assert_eq!(state.winner(), Some(Color::Black));
    assert_eq!(state.promotion_position(), None);
    state.promote_pawn(Promotion::Queen);
    assert_eq!(state.status(), GameStatus::Resigned);
}

#[test]
fn time_forfeit_is_distinct_from_checkmate() {
    let config = ClockConfig {
        initial_secs: 3,
        tick_millis: 1000,
    };
    let mut state = GameState::new(GameMode::Local, &config);
    play(&mut state, &[("e2", "e4")]);

    while state.tick() {}

    assert_eq!(state.status(), GameStatus::TimeForfeit);
    assert_eq!(state.winner(), Some(Color::White));
    assert_eq!(state.clocks().black, 0);
    assert_eq!(state.clocks().white, 3);
    assert!(state.active_clock().is_none());
}

#[test]
fn snapshot_round_trips_through_json() {
    let mut state = new_game();
    play(&mut state, &[("e2", "e4"), ("d7", "d5"), ("e4", "d5"), ("d8", "d5")]);

    let json = serde_json::to_string(&state).unwrap();
    assert!(json.contains(r#""status":"playing""#));
    assert!(json.contains(r#""hasMoved":true"#));
    let restored: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);

    let mut restored = restored;
    play(&mut restored, &[("b1", "c3")]);
    assert_eq!(restored.history().len(), 5);
}

#[test]
fn perft_from_start() {
    let board = Board::standard();
    assert_eq!(movegen::perft::perft(&board, Color::White, 1), 20);
    assert_eq!(movegen::perft::perft(&board, Color::White, 2), 400);
}
