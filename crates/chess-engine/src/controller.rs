//! Serialized ownership of a game and its running clock.
//!
//! [`GameController`] keeps the [`GameState`] behind a mutex shared with a
//! single Tokio clock task. Every mutation runs under that lock, so a move
//! and a clock tick can never interleave. The clock task only exists while
//! the game is being played and is replaced whenever the side to move
//! changes. Starting a new game bumps an epoch so a tick from the previous
//! game is discarded even if it was already in flight.

use crate::clock::ClockConfig;
use crate::game::{GameError, GameMode, GameState, MoveOutcome};
use crate::MoveList;
use chess_core::{Color, Position, Promotion};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::debug;

struct Shared {
    state: GameState,
    /// Incremented each time a new game replaces the current one.
    epoch: u64,
}

/// The running clock task and the side it counts down.
struct ClockTask {
    color: Color,
    handle: JoinHandle<()>,
}

/// Owns one game and drives its clock.
///
/// Construct inside a Tokio runtime to get a self-running clock. Outside
/// one, the clock only moves through [`GameController::tick`].
pub struct GameController {
    shared: Arc<Mutex<Shared>>,
    clock: ClockConfig,
    runtime: Option<Handle>,
    task: Option<ClockTask>,
}

impl GameController {
    /// Creates a controller in the landing state.
    pub fn new(clock: ClockConfig) -> Self {
        Self::restore(GameState::landing(), clock)
    }

    /// Creates a controller around an existing state, such as a
    /// deserialized snapshot. The clock starts if that game is being played.
    pub fn restore(state: GameState, clock: ClockConfig) -> Self {
        state.warn_missing_kings();
        let mut controller = GameController {
            shared: Arc::new(Mutex::new(Shared { state, epoch: 0 })),
            clock,
            runtime: Handle::try_current().ok(),
            task: None,
        };
        controller.sync_clock();
        controller
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        lock_shared(&self.shared)
    }

    /// Runs `f` against the current state under the lock.
    pub fn with_state<R>(&self, f: impl FnOnce(&GameState) -> R) -> R {
        f(&self.lock().state)
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> GameState {
        self.with_state(GameState::clone)
    }

    pub fn clock_config(&self) -> &ClockConfig {
        &self.clock
    }

    /// Returns true if a clock task is currently counting down.
    pub fn is_clock_running(&self) -> bool {
        self.task
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    pub fn legal_moves(&self, from: Position) -> MoveList {
        self.with_state(|state| state.legal_moves(from))
    }

    /// Starts a new game in the given mode, replacing the current one.
    pub fn create_room(&mut self, mode: GameMode) {
        self.replace_game(|state, clock| state.create_room(mode, clock));
    }

    /// Starts a new game in the current mode.
    pub fn reset_game(&mut self) {
        self.replace_game(|state, clock| state.reset(clock));
    }

    fn replace_game(&mut self, init: impl FnOnce(&mut GameState, &ClockConfig)) {
        self.stop_clock();
        {
            let mut shared = self.lock();
            shared.epoch += 1;
            init(&mut shared.state, &self.clock);
        }
        self.sync_clock();
    }

    pub fn try_make_move(&mut self, from: Position, to: Position) -> Result<MoveOutcome, GameError> {
        let outcome = self.lock().state.try_make_move(from, to);
        self.sync_clock();
        outcome
    }

    /// Returns true if the move was accepted.
    pub fn make_move(&mut self, from: Position, to: Position) -> bool {
        self.try_make_move(from, to).is_ok()
    }

    pub fn try_promote_pawn(&mut self, choice: Promotion) -> Result<(), GameError> {
        let result = self.lock().state.try_promote_pawn(choice);
        self.sync_clock();
        result
    }

    /// Completes a pending promotion. Does nothing if none is pending.
    pub fn promote_pawn(&mut self, choice: Promotion) {
        let _ = self.try_promote_pawn(choice);
    }

    pub fn resign(&mut self) -> Result<(), GameError> {
        let result = self.lock().state.resign();
        self.sync_clock();
        result
    }

    /// Removes one second from the running clock by hand.
    pub fn tick(&mut self) -> bool {
        let ticked = self.lock().state.tick();
        self.sync_clock();
        ticked
    }

    /// Makes the clock task match the state: one task for the side to move
    /// while playing, none otherwise.
    fn sync_clock(&mut self) {
        let (active, epoch) = {
            let shared = self.lock();
            (shared.state.active_clock(), shared.epoch)
        };

        let Some(color) = active else {
            self.stop_clock();
            return;
        };
        if self
            .task
            .as_ref()
            .is_some_and(|task| task.color == color && !task.handle.is_finished())
        {
            return;
        }

        self.stop_clock();
        let Some(runtime) = self.runtime.as_ref() else {
            return;
        };
        let period = self.clock.tick_interval();
        let handle = runtime.spawn(run_clock(Arc::clone(&self.shared), epoch, color, period));
        debug!(%color, ?period, "clock started");
        self.task = Some(ClockTask { color, handle });
    }

    fn stop_clock(&mut self) {
        if let Some(task) = self.task.take() {
            task.handle.abort();
            debug!(color = %task.color, "clock stopped");
        }
    }
}

impl Drop for GameController {
    fn drop(&mut self) {
        self.stop_clock();
    }
}

fn lock_shared(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    // The state is always left consistent between statements, so a panic
    // elsewhere does not invalidate it.
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Ticks `color`'s clock every `period` until the game stops being played
/// with `color` to move, or a newer game replaces it.
async fn run_clock(shared: Arc<Mutex<Shared>>, epoch: u64, color: Color, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    loop {
        ticker.tick().await;

        let mut guard = lock_shared(&shared);
        if guard.epoch != epoch || guard.state.active_clock() != Some(color) {
            break;
        }
        guard.state.tick();
        if guard.state.active_clock().is_none() {
            break;
        }
    }
}
