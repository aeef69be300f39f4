//! Console command parsing.

use chess_core::{Position, Promotion};
use chess_engine::{GameMode, GameState};
use thiserror::Error;

/// Errors from parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("invalid square '{0}'")]
    InvalidSquare(String),

    #[error("invalid promotion piece '{0}' (expected q, r, b or n)")]
    InvalidPromotion(String),

    #[error("invalid mode: {0}")]
    InvalidMode(String),

    #[error("{from}{to} is not a promotion; drop the piece letter")]
    NotAPromotion { from: Position, to: Position },

    #[error("missing argument for '{0}'")]
    MissingArgument(&'static str),

    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
}

/// Commands typed at the console prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move a piece: "e2e4", "e2 e4", or "e7e8q" with the promotion piece.
    Move {
        from: Position,
        to: Position,
        promotion: Option<Promotion>,
    },
    /// Answer a pending promotion.
    Promote(Promotion),
    /// List legal destinations for a square.
    Moves(Position),
    Resign,
    Reset,
    /// Start a new game in the given mode.
    New(GameMode),
    Board,
    History,
    Clocks,
    Help,
    Quit,
    /// Blank line.
    Empty,
}

impl Command {
    /// Parse one input line.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();
        let mut parts = input.split_whitespace();

        let Some(cmd) = parts.next() else {
            return Ok(Command::Empty);
        };
        let arg = parts.next();

        match cmd.to_ascii_lowercase().as_str() {
            "promote" => {
                let arg = arg.ok_or(CommandError::MissingArgument("promote"))?;
                Ok(Command::Promote(parse_promotion(arg)?))
            }
            "moves" => {
                let arg = arg.ok_or(CommandError::MissingArgument("moves"))?;
                Ok(Command::Moves(parse_square(arg)?))
            }
            "new" => {
                let mode = match arg {
                    Some(mode) => mode.parse().map_err(CommandError::InvalidMode)?,
                    None => GameMode::Local,
                };
                Ok(Command::New(mode))
            }
            "resign" => Ok(Command::Resign),
            "reset" => Ok(Command::Reset),
            "board" => Ok(Command::Board),
            "history" => Ok(Command::History),
            "clocks" => Ok(Command::Clocks),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Self::parse_move(cmd, arg).ok_or_else(|| CommandError::Unknown(input.to_string())),
        }
    }

    /// Checks a parsed command against the current game before it runs.
    ///
    /// A promotion letter is only accepted on a pawn move to the last rank.
    pub fn validate(&self, state: &GameState) -> Result<(), CommandError> {
        match *self {
            Command::Move {
                from,
                to,
                promotion: Some(_),
            } if !state.needs_promotion(from, to) => Err(CommandError::NotAPromotion { from, to }),
            _ => Ok(()),
        }
    }

        /// Accepts "e2e4", "e7e8q", "e2 e4" and "e7 e8q".
    fn parse_move(first: &str, second: Option<&str>) -> Option<Self> {
        let joined;
        let text = match second {
            Some(second) => {
                joined = format!("{}{}", first, second);
                joined.as_str()
            }
            None => first,
        };
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return None;
        }

        let from = Position::from_algebraic(&text[0..2])?;
        let to = Position::from_algebraic(&text[2..4])?;
        let promotion = match text[4..].chars().next() {
            Some(c) => Some(Promotion::from_char(c)?),
            None => None,
        };
        Some(Command::Move {
            from,
            to,
            promotion,
        })
    }
}

fn parse_square(s: &str) -> Result<Position, CommandError> {
    Position::from_algebraic(&s.to_ascii_lowercase())
        .ok_or_else(|| CommandError::InvalidSquare(s.to_string()))
}

fn parse_promotion(s: &str) -> Result<Promotion, CommandError> {
    let piece = match s.to_ascii_lowercase().as_str() {
        "queen" => Some(Promotion::Queen),
        "rook" => Some(Promotion::Rook),
        "bishop" => Some(Promotion::Bishop),
        "knight" => Some(Promotion::Knight),
        short if short.len() == 1 => short.chars().next().and_then(Promotion::from_char),
        _ => None,
    };
    piece.ok_or_else(|| CommandError::InvalidPromotion(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Position {
        Position::from_algebraic(s).unwrap()
    }

    #[test]
    fn parse_moves() {
        let expected = Command::Move {
            from: sq("e2"),
            to: sq("e4"),
            promotion: None,
        };
        assert_eq!(Command::parse("e2e4"), Ok(expected));
        assert_eq!(Command::parse("  e2 e4 "), Ok(expected));
    }

    #[test]
    fn parse_move_with_promotion() {
        assert_eq!(
            Command::parse("e7e8n"),
            Ok(Command::Move {
                from: sq("e7"),
                to: sq("e8"),
                promotion: Some(Promotion::Knight),
            })
        );
        assert_eq!(
            Command::parse("e7 e8q"),
            Ok(Command::Move {
                from: sq("e7"),
                to: sq("e8"),
                promotion: Some(Promotion::Queen),
            })
        );
    }

    #[test]
    fn parse_promote() {
        assert_eq!(Command::parse("promote q"), Ok(Command::Promote(Promotion::Queen)));
        assert_eq!(Command::parse("promote Knight"), Ok(Command::Promote(Promotion::Knight)));
        assert_eq!(
            Command::parse("promote k"),
            Err(CommandError::InvalidPromotion("k".to_string()))
        );
        assert_eq!(
            Command::parse("promote"),
            Err(CommandError::MissingArgument("promote"))
        );
    }

    #[test]
    fn parse_simple_commands() {
        assert_eq!(Command::parse("moves E2"), Ok(Command::Moves(sq("e2"))));
        assert_eq!(Command::parse("resign"), Ok(Command::Resign));
        assert_eq!(Command::parse("RESET"), Ok(Command::Reset));
        assert_eq!(Command::parse("new ai"), Ok(Command::New(GameMode::Ai)));
        assert_eq!(Command::parse("new"), Ok(Command::New(GameMode::Local)));
        assert_eq!(Command::parse("board"), Ok(Command::Board));
        assert_eq!(Command::parse("history"), Ok(Command::History));
        assert_eq!(Command::parse("clocks"), Ok(Command::Clocks));
        assert_eq!(Command::parse("exit"), Ok(Command::Quit));
        assert_eq!(Command::parse(""), Ok(Command::Empty));
    }

    #[test]
    fn promotion_letter_needs_a_promotion_move() {
        let state = GameState::from_fen(
            "4k3/P7/8/8/8/8/4P3/4K3 w - -",
            GameMode::Local,
            &chess_engine::ClockConfig::default(),
        )
        .unwrap();

        let bogus = Command::parse("e2e4q").unwrap();
        assert_eq!(
            bogus.validate(&state),
            Err(CommandError::NotAPromotion {
                from: sq("e2"),
                to: sq("e4")
            })
        );
        assert_eq!(
            bogus.validate(&state).unwrap_err().to_string(),
            "e2e4 is not a promotion; drop the piece letter"
        );
        assert_eq!(Command::parse("a7a8q").unwrap().validate(&state), Ok(()));
        assert_eq!(Command::parse("e2e4").unwrap().validate(&state), Ok(()));
        assert_eq!(Command::Resign.validate(&state), Ok(()));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(Command::parse("new blitz"), Err(CommandError::InvalidMode(_))));
        assert!(matches!(Command::parse("moves z9"), Err(CommandError::InvalidSquare(_))));
        assert!(matches!(Command::parse("e2e9"), Err(CommandError::Unknown(_))));
        assert!(matches!(Command::parse("castle"), Err(CommandError::Unknown(_))));
        assert!(matches!(Command::parse("e7e8x"), Err(CommandError::Unknown(_))));
    }
}
