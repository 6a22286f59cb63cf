//! Room configuration and round phase.

use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration for a room instance.
///
/// The defaults are the external contract the reference clients were
/// built against; tests and demos shrink `round_seconds` and
/// `tick_interval` to keep runs short.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Maximum players allowed in the room.
    pub max_players: usize,

    /// Number of selectable boxes. The elimination draw is uniform
    /// over `0..total_boxes`.
    pub total_boxes: usize,

    /// Countdown value at the start of every round, in ticks.
    pub round_seconds: u32,

    /// Selections are ignored once the countdown is at or below this.
    pub lockout_seconds: u32,

    /// Wall-clock duration of one countdown tick.
    pub tick_interval: Duration,

    /// Seed for the elimination draw. `None` seeds from OS entropy;
    /// set it for reproducible runs.
    pub rng_seed: Option<u64>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_players: 10,
            total_boxes: 4,
            round_seconds: 20,
            lockout_seconds: 3,
            tick_interval: Duration::from_secs(1),
            rng_seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomPhase
// ---------------------------------------------------------------------------

/// The coordinator's phase.
///
/// ```text
/// Idle ⇄ RoundInProgress
/// ```
///
/// - **Idle**: no players, clock disarmed.
/// - **RoundInProgress**: clock armed, countdown ticking. Rounds chain
///   into each other through resets without leaving this phase; the
///   room only returns to Idle when the last player disconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomPhase {
    Idle,
    RoundInProgress,
}

impl RoomPhase {
    /// Returns `true` if a round cycle is currently running.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::RoundInProgress)
    }
}

impl std::fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::RoundInProgress => write!(f, "RoundInProgress"),
        }
    }
}
