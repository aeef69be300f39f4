//! The game state machine.
//!
//! [`GameState`] is the single owner of a game: board, side to move, move
//! history, status and clocks. Every board-level question is delegated to
//! the [`RuleSet`]; the only place the state changes after a move is
//! accepted is the private `execute_move`.
//!
//! Status flows `landing → playing → {checkmate, draw, resigned,
//! time-forfeit}`, with `promotion-pending` entered when a pawn reaches the
//! last rank and left by the next executed move.

use crate::clock::{ClockConfig, Clocks};
use crate::movegen::apply_move;
use crate::rules::{EngineStatus, RuleSet, StandardChess};
use crate::{Board, MoveList};
use chess_core::{Color, FenError, FenParser, Move, Position, Promotion};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

const RULES: StandardChess = StandardChess;

/// Where a game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameStatus {
    /// No game has been started yet.
    #[default]
    Landing,
    Playing,
    /// A pawn reached the last rank; waiting for the piece choice.
    PromotionPending,
    Checkmate,
    /// No legal move and not in check.
    Draw,
    Resigned,
    /// The side to move ran out of time.
    TimeForfeit,
}

impl GameStatus {
    /// Returns true for statuses from which no further move can be made.
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate | GameStatus::Draw | GameStatus::Resigned | GameStatus::TimeForfeit
        )
    }

    /// Returns true while a game is underway, including a pending promotion.
    pub const fn is_in_progress(self) -> bool {
        matches!(self, GameStatus::Playing | GameStatus::PromotionPending)
    }

    /// Returns the wire name of the status ("promotion-pending").
    pub const fn as_str(self) -> &'static str {
        match self {
            GameStatus::Landing => "landing",
            GameStatus::Playing => "playing",
            GameStatus::PromotionPending => "promotion-pending",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Draw => "draw",
            GameStatus::Resigned => "resigned",
            GameStatus::TimeForfeit => "time-forfeit",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EngineStatus> for GameStatus {
    fn from(status: EngineStatus) -> Self {
        match status {
            EngineStatus::Playing => GameStatus::Playing,
            EngineStatus::Checkmate => GameStatus::Checkmate,
            EngineStatus::Draw => GameStatus::Draw,
        }
    }
}

/// How the game is being played. The engine treats every mode the same;
/// front ends use it to decide who supplies the moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Local,
    Online,
    Ai,
}

impl GameMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            GameMode::Local => "local",
            GameMode::Online => "online",
            GameMode::Ai => "ai",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(GameMode::Local),
            "online" => Ok(GameMode::Online),
            "ai" => Ok(GameMode::Ai),
            other => Err(format!("unknown game mode '{}'", other)),
        }
    }
}

/// The move waiting for a promotion choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PendingPromotion {
    pub from: Position,
    pub to: Position,
}

/// The local player's seat: a side, or watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Seat {
    White,
    Black,
    Spectator,
}

impl Seat {
    fn color(self) -> Option<Color> {
        match self {
            Seat::White => Some(Color::White),
            Seat::Black => Some(Color::Black),
            Seat::Spectator => None,
        }
    }
}

/// Error type for game operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The operation needs a game in progress.
    #[error("no game in progress (status: {0})")]
    NotInProgress(GameStatus),

    #[error("no piece at {0}")]
    NoPieceAt(Position),

    /// The piece belongs to the side not on move.
    #[error("the piece at {0} belongs to the other side")]
    NotYourPiece(Position),

    #[error("illegal move: {from} to {to}")]
    IllegalMove { from: Position, to: Position },

    #[error("no promotion is pending")]
    NoPendingPromotion,

    /// The game has already ended.
    #[error("game has already ended")]
    GameAlreadyOver,
}

/// What an accepted move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was played and the turn passed.
    Executed,
    /// The move reaches the last rank with a pawn and waits for
    /// [`GameState::promote_pawn`]. The board is unchanged.
    PromotionPending,
}

/// The authoritative state of one game.
///
/// Serializes to a plain value (board grid plus scalar fields) that can be
/// stored or sent and restored as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    board: Board,
    turn: Color,
    history: Vec<Move>,
    status: GameStatus,
    winner: Option<Color>,
    mode: GameMode,
    my_color: Seat,
    last_move: Option<Move>,
    clocks: Clocks,
    promotion_position: Option<PendingPromotion>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::landing()
    }
}

impl GameState {
    /// Creates the state shown before any game starts.
    pub fn landing() -> Self {
        GameState {
            board: RULES.initial_board(),
            turn: Color::White,
            history: Vec::new(),
            status: GameStatus::Landing,
            winner: None,
            mode: GameMode::Local,
            my_color: Seat::White,
            last_move: None,
            clocks: Clocks::default(),
            promotion_position: None,
        }
    }

    /// Starts a new game from the standard position.
    pub fn new(mode: GameMode, clock: &ClockConfig) -> Self {
        let mut state = Self::landing();
        state.create_room(mode, clock);
        state
    }

    /// Starts a game from a FEN position.
    ///
    /// The side to move comes from the FEN's active-color field. A position
    /// that is already mate or stalemate starts in that terminal status.
    pub fn from_fen(fen: &str, mode: GameMode, clock: &ClockConfig) -> Result<Self, FenError> {
        let parsed = FenParser::parse(fen)?;
        let mut state = Self::new(mode, clock);
        state.board = Board::from_parsed(&parsed);
        state.turn = parsed.active_color;
        state.status = RULES.status(&state.board, state.turn).into();
        if state.status == GameStatus::Checkmate {
            state.winner = Some(state.turn.opposite());
        }
        state.warn_missing_kings();
        Ok(state)
    }

    /// Sides with no king on the board. Check detection treats such a side
    /// as never in check.
    fn kingless_sides(&self) -> impl Iterator<Item = Color> + '_ {
        Color::ALL
            .into_iter()
            .filter(|&color| self.board.find_king(color).is_none())
    }

    /// Logs once per loaded position, rather than once per check probe.
    pub(crate) fn warn_missing_kings(&self) {
        for color in self.kingless_sides() {
            warn!(%color, "position has no king; that side can never be in check");
        }
    }

    /// Reinitializes to the standard starting position and starts playing.
    pub fn create_room(&mut self, mode: GameMode, clock: &ClockConfig) {
        *self = GameState {
            board: RULES.initial_board(),
            turn: Color::White,
            history: Vec::new(),
            status: GameStatus::Playing,
            winner: None,
            mode,
            my_color: Seat::White,
            last_move: None,
            clocks: clock.clocks(),
            promotion_position: None,
        };
        info!(%mode, initial_secs = clock.initial_secs, "new game started");
    }

    /// Starts over in the current mode.
    pub fn reset(&mut self, clock: &ClockConfig) {
        self.create_room(self.mode, clock);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Returns the executed moves, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Returns the local player's side; `None` for a spectator.
    pub fn my_color(&self) -> Option<Color> {
        self.my_color.color()
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.last_move.as_ref()
    }

    pub fn clocks(&self) -> Clocks {
        self.clocks
    }

    pub fn promotion_position(&self) -> Option<PendingPromotion> {
        self.promotion_position
    }

    /// Returns the legal destinations for the piece on `from`.
    ///
    /// Empty unless a game is being played and the piece belongs to the side
    /// to move.
    pub fn legal_moves(&self, from: Position) -> MoveList {
        if self.status != GameStatus::Playing {
            return MoveList::new();
        }
        RULES.legal_moves(&self.board, from, self.turn)
    }

    /// Returns true if moving the piece on `from` to `to` would stop for a
    /// promotion choice.
    pub fn needs_promotion(&self, from: Position, to: Position) -> bool {
        RULES.needs_promotion(&self.board, from, to)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        RULES.is_check(&self.board, self.turn)
    }

    /// Returns the side whose clock should be running, if any.
    ///
    /// Clocks run only while playing; a pending promotion pauses them.
    pub fn active_clock(&self) -> Option<Color> {
        (self.status == GameStatus::Playing).then_some(self.turn)
    }

    /// Attempts a move for the side to move.
    ///
    /// On any error the state is unchanged. A pawn move to the last rank is
    /// accepted but only recorded as pending; see [`Self::promote_pawn`].
    pub fn try_make_move(&mut self, from: Position, to: Position) -> Result<MoveOutcome, GameError> {
        if self.status != GameStatus::Playing {
            debug!(%from, %to, status = %self.status, "move rejected: not playing");
            return Err(GameError::NotInProgress(self.status));
        }

        let piece = self.board.get(from).ok_or(GameError::NoPieceAt(from))?;
        if piece.color != self.turn {
            return Err(GameError::NotYourPiece(from));
        }
        if !RULES.is_legal(&self.board, from, to, self.turn) {
            debug!(%from, %to, "move rejected: illegal");
            return Err(GameError::IllegalMove { from, to });
        }

        if RULES.needs_promotion(&self.board, from, to) {
            self.status = GameStatus::PromotionPending;
            self.promotion_position = Some(PendingPromotion { from, to });
            debug!(%from, %to, "awaiting promotion choice");
            return Ok(MoveOutcome::PromotionPending);
        }

        self.execute_move(from, to, None)?;
        Ok(MoveOutcome::Executed)
    }

    /// Boolean form of [`Self::try_make_move`]: true if the move was accepted.
    pub fn make_move(&mut self, from: Position, to: Position) -> bool {
        self.try_make_move(from, to).is_ok()
    }

    /// Completes a pending promotion with the chosen piece.
    ///
    /// If the pending move can no longer be played (a restored state whose
    /// pawn is gone), it is discarded and the game returns to `playing`
    /// with the same side to move.
    pub fn try_promote_pawn(&mut self, choice: Promotion) -> Result<(), GameError> {
        let pending = self
            .promotion_position
            .filter(|_| self.status == GameStatus::PromotionPending)
            .ok_or(GameError::NoPendingPromotion)?;
        let played = self
            .check_pending(pending)
            .and_then(|()| self.execute_move(pending.from, pending.to, Some(choice)));
        if let Err(err) = played {
            warn!(from = %pending.from, to = %pending.to, %err, "pending promotion discarded");
            self.promotion_position = None;
            self.status = GameStatus::Playing;
            return Err(err);
        }
        Ok(())
    }

    /// Re-validates a pending promotion against the current board, which may
    /// have come from a restored snapshot.
    fn check_pending(&self, pending: PendingPromotion) -> Result<(), GameError> {
        let PendingPromotion { from, to } = pending;
        let piece = self.board.get(from).ok_or(GameError::NoPieceAt(from))?;
        if piece.color != self.turn {
            return Err(GameError::NotYourPiece(from));
        }
        if !RULES.needs_promotion(&self.board, from, to)
            || !RULES.is_legal(&self.board, from, to, self.turn)
        {
            return Err(GameError::IllegalMove { from, to });
        }
        Ok(())
    }

    /// Completes a pending promotion. Does nothing if none is pending.
    pub fn promote_pawn(&mut self, choice: Promotion) {
        // Nothing pending is not an error at this surface.
        let _ = self.try_promote_pawn(choice);
    }

    /// Plays an already validated move and derives the new status.
    ///
    /// Fails without touching the state if `from` is empty or the move
    /// cannot be applied.
    fn execute_move(
        &mut self,
        from: Position,
        to: Position,
        promotion: Option<Promotion>,
    ) -> Result<(), GameError> {
        let mover = self.board.get(from).ok_or(GameError::NoPieceAt(from))?;
        let promote_to = promotion.map_or(mover.kind, Promotion::kind);
        let applied = apply_move(&self.board, from, to, promote_to)
            .ok_or(GameError::IllegalMove { from, to })?;

        let mover_color = self.turn;
        let next_turn = mover_color.opposite();
        let engine_status = RULES.status(&applied.board, next_turn);

        let record = Move {
            from,
            to,
            piece: applied.piece,
            captured: applied.captured,
            is_castling: applied.is_castling,
            promotion: promotion.map(Promotion::kind),
            is_check: RULES.is_check(&applied.board, next_turn),
            is_checkmate: engine_status == EngineStatus::Checkmate,
            timestamp: chrono::Utc::now().timestamp_millis(),
            notation: Move::notation_for(applied.piece.kind, to),
        };
        debug!(
            notation = %record.notation,
            coordinate = %record.to_coordinate(),
            capture = record.is_capture(),
            "move executed"
        );

        self.board = applied.board;
        self.turn = next_turn;
        self.history.push(record.clone());
        self.last_move = Some(record);
        self.promotion_position = None;
        self.status = engine_status.into();
        self.winner = match engine_status {
            EngineStatus::Checkmate => Some(mover_color),
            _ => None,
        };

        if self.status.is_terminal() {
            info!(status = %self.status, winner = ?self.winner, moves = self.history.len(), "game over");
        }
        Ok(())
    }

    /// Resigns for the side to move; the other side wins.
    pub fn resign(&mut self) -> Result<(), GameError> {
        if self.status.is_terminal() {
            return Err(GameError::GameAlreadyOver);
        }
        if !self.status.is_in_progress() {
            return Err(GameError::NotInProgress(self.status));
        }

        self.status = GameStatus::Resigned;
        self.winner = Some(self.turn.opposite());
        self.promotion_position = None;
        info!(loser = %self.turn, "game resigned");
        Ok(())
    }

    /// Removes one second from the running clock.
    ///
    /// Returns false when no clock is running. When the clock reaches zero
    /// the game ends in a time forfeit for the side to move.
    pub fn tick(&mut self) -> bool {
        let Some(color) = self.active_clock() else {
            return false;
        };

        let remaining = self.clocks.get_mut(color);
        *remaining = remaining.saturating_sub(1);
        tracing::trace!(%color, remaining = *remaining, "clock tick");

        if *remaining == 0 {
            self.status = GameStatus::TimeForfeit;
            self.winner = Some(color.opposite());
            info!(flagged = %color, "game over on time");
        }
        true
    }
}
