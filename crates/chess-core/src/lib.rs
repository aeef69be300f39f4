//! Core types for chess.
//!
//! This crate provides the value types shared by the rules engine and its
//! front ends:
//! - [`Piece`], [`PieceKind`], [`PieceId`] and [`Color`] for piece representation
//! - [`Position`] for board coordinates (row 0 is Black's back rank)
//! - [`Promotion`] for the pieces a pawn may become
//! - [`Move`] for executed moves kept in a game's history
//! - FEN piece-placement parsing
//!
//! Every type is plain data and implements `serde` traits, so a front end can
//! snapshot or transmit it without any engine handles.

mod color;
mod fen;
mod mov;
mod piece;
mod position;

pub use color::Color;
pub use fen::{FenError, FenParser, PlacementCell};
pub use mov::Move;
pub use piece::{Piece, PieceId, PieceKind, Promotion};
pub use position::Position;
