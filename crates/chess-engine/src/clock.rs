//! Game clocks and their configuration.

use chess_core::Color;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remaining time for each side, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clocks {
    pub white: u32,
    pub black: u32,
}

impl Clocks {
    /// Creates clocks with the same time on both sides.
    pub const fn new(secs: u32) -> Self {
        Clocks {
            white: secs,
            black: secs,
        }
    }

    /// Returns the remaining seconds for a side.
    #[inline]
    pub const fn get(&self, color: Color) -> u32 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, color: Color) -> &mut u32 {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

impl Default for Clocks {
    fn default() -> Self {
        Clocks::new(ClockConfig::DEFAULT_INITIAL_SECS)
    }
}

/// Clock settings for new games.
///
/// Both fields fall back to their defaults when absent, so an empty
/// `[clock]` table is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Seconds each side starts with.
    #[serde(default = "default_initial_secs")]
    pub initial_secs: u32,
    /// Milliseconds between clock ticks. Each tick removes one second.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

fn default_initial_secs() -> u32 {
    ClockConfig::DEFAULT_INITIAL_SECS
}

fn default_tick_millis() -> u64 {
    ClockConfig::DEFAULT_TICK_MILLIS
}

impl ClockConfig {
    /// Ten minutes per side.
    pub const DEFAULT_INITIAL_SECS: u32 = 600;
    pub const DEFAULT_TICK_MILLIS: u64 = 1000;

    /// Returns the period of the clock task. A zero setting is clamped to
    /// one millisecond.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1))
    }

    /// Returns fresh clocks for a new game.
    pub fn clocks(&self) -> Clocks {
        Clocks::new(self.initial_secs)
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            initial_secs: Self::DEFAULT_INITIAL_SECS,
            tick_millis: Self::DEFAULT_TICK_MILLIS,
        }
    }
}
