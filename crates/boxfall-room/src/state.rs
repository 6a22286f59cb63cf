//! Authoritative room state: players, countdown, and round bookkeeping.
//!
//! Pure data plus validation — no channels, no timers, no randomness.
//! Every mutation goes through the coordinator actor, which is the
//! single serialization point; nothing here is shared or locked.

use std::collections::HashMap;

use boxfall_protocol::{PlayerId, PlayerSnapshot, RoomSnapshot};

use crate::{RoomConfig, RoomError};

/// Score delta applied on elimination: survivors who picked a box gain
/// it, occupants of the drawn box lose it.
const ELIMINATION_POINTS: i64 = 10;

/// One player's server-side record.
#[derive(Debug, Clone)]
pub struct Player {
    /// Display name supplied at join time.
    pub username: String,
    /// The box the player occupies this round, if any.
    pub position: Option<usize>,
    /// Cumulative score across rounds. May go negative.
    pub score: i64,
    /// Cleared by an elimination, restored by the round reset.
    pub alive: bool,
}

impl Player {
    fn new(username: String) -> Self {
        Self {
            username,
            position: None,
            score: 0,
            alive: true,
        }
    }
}

/// Who an elimination draw affected.
///
/// Players who never picked a box this round appear in neither list and
/// are untouched.
#[derive(Debug, Clone)]
pub struct EliminationOutcome {
    /// The drawn box.
    pub box_index: usize,
    /// Players who occupied the drawn box: now dead, score reduced.
    pub eliminated: Vec<PlayerId>,
    /// Players who occupied any other box: score increased.
    pub scored: Vec<PlayerId>,
}

/// The authoritative mapping of connection identity to player record,
/// plus the round countdown.
#[derive(Debug)]
pub struct RoomState {
    config: RoomConfig,
    players: HashMap<PlayerId, Player>,
    countdown: u32,
}

impl RoomState {
    /// Creates an empty room with a full countdown.
    pub fn new(config: RoomConfig) -> Self {
        let countdown = config.round_seconds;
        Self {
            config,
            players: HashMap::new(),
            countdown,
        }
    }

    /// Inserts a new player with no selection, zero score, alive.
    ///
    /// # Errors
    /// Returns [`RoomError::RoomFull`] if the room is at capacity;
    /// the state is unchanged in that case.
    pub fn add_player(
        &mut self,
        player_id: PlayerId,
        username: impl Into<String>,
    ) -> Result<(), RoomError> {
        if self.players.len() >= self.config.max_players {
            return Err(RoomError::RoomFull);
        }
        self.players.insert(player_id, Player::new(username.into()));
        Ok(())
    }

    /// Removes a player. Idempotent; returns whether they were present.
    pub fn remove_player(&mut self, player_id: PlayerId) -> bool {
        self.players.remove(&player_id).is_some()
    }

    /// Places a player on a box, overwriting any earlier pick.
    ///
    /// # Errors
    /// [`RoomError::UnknownPlayer`] if the identity is not in the room,
    /// [`RoomError::InvalidBox`] if the index is out of range. The
    /// player's existing pick survives a failed call.
    pub fn select_box(
        &mut self,
        player_id: PlayerId,
        box_index: usize,
    ) -> Result<(), RoomError> {
        let total = self.config.total_boxes;
        let player = self
            .players
            .get_mut(&player_id)
            .ok_or(RoomError::UnknownPlayer(player_id))?;
        if box_index >= total {
            return Err(RoomError::InvalidBox {
                index: box_index,
                total,
            });
        }
        player.position = Some(box_index);
        Ok(())
    }

    /// Whether selections are currently accepted (countdown above the
    /// lockout threshold).
    pub fn selection_open(&self) -> bool {
        self.countdown > self.config.lockout_seconds
    }

    /// Decrements the countdown, flooring at zero, and returns the new
    /// value.
    pub fn decrement_countdown(&mut self) -> u32 {
        self.countdown = self.countdown.saturating_sub(1);
        self.countdown
    }

    /// Starts a fresh round: every player back to alive and unselected,
    /// countdown refilled. Scores carry over.
    pub fn reset_round(&mut self) {
        for player in self.players.values_mut() {
            player.position = None;
            player.alive = true;
        }
        self.countdown = self.config.round_seconds;
    }

    /// Applies an elimination draw for `box_index`.
    ///
    /// Alive occupants of the drawn box die and lose points; alive
    /// players on any other box gain points; players without a pick are
    /// untouched. Dead players (already eliminated this round) are
    /// skipped entirely.
    pub fn apply_elimination(&mut self, box_index: usize) -> EliminationOutcome {
        let mut eliminated = Vec::new();
        let mut scored = Vec::new();

        for (id, player) in &mut self.players {
            if !player.alive {
                continue;
            }
            match player.position {
                Some(position) if position == box_index => {
                    player.alive = false;
                    player.score -= ELIMINATION_POINTS;
                    eliminated.push(*id);
                }
                Some(_) => {
                    player.score += ELIMINATION_POINTS;
                    scored.push(*id);
                }
                None => {}
            }
        }

        EliminationOutcome {
            box_index,
            eliminated,
            scored,
        }
    }

    /// The broadcast-ready snapshot of every player.
    pub fn snapshot(&self) -> RoomSnapshot {
        self.players
            .iter()
            .map(|(id, player)| {
                (
                    *id,
                    PlayerSnapshot {
                        username: player.username.clone(),
                        position: player.position,
                        score: player.score,
                        alive: player.alive,
                    },
                )
            })
            .collect()
    }

    /// Current countdown value.
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Number of connected players.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Whether the room has no players.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Looks up a player's record.
    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.get(&player_id)
    }

    /// The room's configuration.
    pub fn config(&self) -> &RoomConfig {
        &self.config
    }
}

// =========================================================================
// Tests
// =========================================================================
