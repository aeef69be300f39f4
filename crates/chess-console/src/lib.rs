//! Terminal front end for the chess rules engine.
//!
//! The console is an outside collaborator of the engine: it reads typed
//! commands, calls the [`chess_engine::GameController`] operations and
//! prints the resulting state.
//!
//! # Modules
//!
//! - [`command`] - parsing of typed commands
//! - [`config`] - `chess.toml` loading
//! - [`render`] - text rendering of boards, clocks and move lists

pub mod command;
pub mod config;
pub mod render;
