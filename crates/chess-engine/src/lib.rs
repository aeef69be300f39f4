//! Chess rules engine.
//!
//! This crate provides:
//! - [`Board`] - the 8×8 grid of pieces, a plain `Copy` value
//! - attack detection and check detection over a board snapshot
//! - [`movegen`] - pseudo-legal generation with a self-check filter, plus perft
//! - [`RuleSet`] - the seam the game state machine asks every board question through
//! - [`GameState`] - the game state machine: moves, promotion, resignation, clocks
//! - [`GameController`] - serialized ownership of a game with a Tokio-driven clock
//!
//! # Architecture
//!
//! Layers are stacked leaves first. The attack model only reads boards. The
//! move generator probes each candidate on a copied board and keeps it only
//! if the mover's king is safe afterwards. The game state machine is the only
//! thing that writes, and it swaps in a whole new board per executed move, so
//! pieces recorded in the history never change.
//!
//! En passant, the fifty-move rule and repetition are not implemented. The
//! only draw detected is stalemate.
//!
//! # Example
//!
//! ```
//! use chess_core::Position;
//! use chess_engine::{ClockConfig, GameMode, GameState, GameStatus};
//!
//! let sq = |s: &str| Position::from_algebraic(s).unwrap();
//! let mut game = GameState::new(GameMode::Local, &ClockConfig::default());
//!
//! for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
//!     assert!(game.make_move(sq(from), sq(to)));
//! }
//! assert_eq!(game.status(), GameStatus::Checkmate);
//! ```

mod attacks;
mod board;
mod clock;
mod controller;
mod game;
pub mod movegen;
pub mod rules;

pub use attacks::{can_attack, is_king_in_check, is_path_clear, is_square_attacked};
pub use board::Board;
pub use clock::{ClockConfig, Clocks};
pub use controller::GameController;
pub use game::{GameError, GameMode, GameState, GameStatus, MoveOutcome, PendingPromotion};
pub use movegen::{game_status, legal_moves, MoveList};
pub use rules::{EngineStatus, RuleSet, StandardChess};
