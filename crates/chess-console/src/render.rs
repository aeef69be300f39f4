//! Text rendering of game state for the terminal.

use chess_core::{Color, Move};
use chess_engine::{Clocks, GameState, GameStatus, MoveList};
use std::fmt::Write;

/// Formats seconds as `m:ss`.
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// One line with both clocks, marking the one that is running.
pub fn clocks_line(clocks: Clocks, running: Option<Color>) -> String {
    let mark = |color: Color| if running == Some(color) { "*" } else { " " };
    format!(
        "White {}{}  Black {}{}",
        format_clock(clocks.white),
        mark(Color::White),
        format_clock(clocks.black),
        mark(Color::Black)
    )
}

/// Describes the status from the players' point of view.
pub fn status_line(state: &GameState) -> String {
    let winner = state
        .winner()
        .map_or_else(|| "nobody".to_string(), |color| color.to_string());
    match state.status() {
        GameStatus::Landing => "No game in progress. Type 'new' to start.".to_string(),
        GameStatus::Playing if state.is_check() => format!("{} to move (check)", state.turn()),
        GameStatus::Playing => format!("{} to move", state.turn()),
        GameStatus::PromotionPending => {
            "Promote to which piece? Type 'promote q|r|b|n'.".to_string()
        }
        GameStatus::Checkmate => format!("Checkmate. {} wins.", winner),
        GameStatus::Draw => "Stalemate. The game is drawn.".to_string(),
        GameStatus::Resigned => format!("{} resigned. {} wins.", state.turn(), winner),
        GameStatus::TimeForfeit => format!("{} ran out of time. {} wins.", state.turn(), winner),
    }
}

/// Describes the last executed move ("Nf3", "Pd5 captures Pawn").
pub fn move_line(mov: &Move) -> String {
    let mut line = mov.notation.clone();
    if mov.is_castling {
        line.push_str(" (castles)");
    }
    if let Some(captured) = mov.captured {
        let _ = write!(line, " captures {}", captured.kind);
    }
    if let Some(kind) = mov.promotion {
        let _ = write!(line, " promotes to {}", kind);
    }
    if mov.is_check {
        line.push_str(" check");
    }
    line
}

/// Numbered move list, one full move per line ("1. Pe4 Pe5").
pub fn history(moves: &[Move]) -> String {
    let mut out = String::new();
    for (number, pair) in moves.chunks(2).enumerate() {
        let _ = write!(out, "{}. {}", number + 1, pair[0].notation);
        if let Some(reply) = pair.get(1) {
            let _ = write!(out, " {}", reply.notation);
        }
        out.push('\n');
    }
    out
}

/// Space-separated destination squares.
pub fn destinations(moves: &MoveList) -> String {
    let squares: Vec<String> = moves.as_slice().iter().map(|pos| pos.to_string()).collect();
    if squares.is_empty() {
        "no legal moves".to_string()
    } else {
        squares.join(" ")
    }
}
