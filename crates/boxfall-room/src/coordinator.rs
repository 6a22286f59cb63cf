//! Room coordinator: an isolated Tokio task that owns the room state.
//!
//! The coordinator is the single serialization point the design
//! requires: client intents arrive as commands on an mpsc channel, the
//! round clock ticks inside the same `select!` loop, and each message
//! is applied to the state to completion before the next — no two
//! mutations ever interleave, no locks involved.
//!
//! Broadcasts are fire-and-forget: every connected player registers an
//! unbounded [`EventSink`] at join time, and the coordinator pushes
//! [`ServerEvent`]s into it without waiting for delivery.

use std::collections::HashMap;

use boxfall_clock::Clock;
use boxfall_protocol::{PlayerId, ServerEvent};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tokio::sync::{mpsc, oneshot};

use crate::{RoomConfig, RoomError, RoomPhase, RoomState};

/// Command channel depth. Fills only if intents arrive faster than the
/// actor drains them, at which point senders briefly wait.
const CHANNEL_SIZE: usize = 64;

/// Per-player outbound event channel, provided by the transport layer
/// at join time. The coordinator writes, the transport adapter drains.
pub type EventSink = mpsc::UnboundedSender<ServerEvent>;

/// Commands sent to the coordinator through its channel.
enum RoomCommand {
    /// Add a player and register their event sink.
    Join {
        player_id: PlayerId,
        username: String,
        sink: EventSink,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Remove a player (transport closure or explicit leave).
    Leave { player_id: PlayerId },

    /// A player picks a box for the current round.
    SelectBox {
        player_id: PlayerId,
        box_index: usize,
    },

    /// Request a metadata snapshot.
    GetInfo { reply: oneshot::Sender<RoomInfo> },

    /// Stop the actor and release the clock.
    Shutdown,
}

/// A snapshot of room metadata (not the player records themselves).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    /// Number of connected players.
    pub player_count: usize,
    /// Maximum players allowed.
    pub max_players: usize,
    /// Current countdown value.
    pub countdown: u32,
    /// Whether a round cycle is running.
    pub phase: RoomPhase,
}

/// Handle to a running room. Cheap to clone — one per transport
/// connection is the expected usage.
#[derive(Clone)]
pub struct RoomHandle {
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Joins a player, registering `sink` for their outbound events.
    ///
    /// # Errors
    /// [`RoomError::RoomFull`] if there is no free slot (the rejected
    /// client's sink also receives a unicast `error` event), or
    /// [`RoomError::Unavailable`] if the room has shut down.
    pub async fn join(
        &self,
        player_id: PlayerId,
        username: impl Into<String>,
        sink: EventSink,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player_id,
                username: username.into(),
                sink,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)?
    }

    /// Removes a player. Idempotent and fire-and-forget: leaving twice
    /// or leaving while never joined is not an error.
    pub async fn leave(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Leave { player_id })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Submits a box selection (fire-and-forget). Out-of-range indices
    /// and unknown players are silently dropped by the coordinator.
    pub async fn select_box(
        &self,
        player_id: PlayerId,
        box_index: usize,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::SelectBox {
                player_id,
                box_index,
            })
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// Requests current room metadata.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable)?;
        reply_rx.await.map_err(|_| RoomError::Unavailable)
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable)
    }
}

/// The internal coordinator state. Runs inside a Tokio task.
struct RoomActor {
    state: RoomState,
    phase: RoomPhase,
    clock: Clock,
    /// Per-player outbound channels.
    sinks: HashMap<PlayerId, EventSink>,
    /// Elimination draw source. Seeded from config for reproducible
    /// runs, from OS entropy otherwise.
    rng: StdRng,
}

impl RoomActor {
    /// Runs the actor loop until shutdown or until every handle drops.
    async fn run(mut self, mut receiver: mpsc::Receiver<RoomCommand>) {
        tracing::info!("room coordinator started");

        loop {
            tokio::select! {
                cmd = receiver.recv() => match cmd {
                    Some(RoomCommand::Join { player_id, username, sink, reply }) => {
                        let result = self.handle_join(player_id, username, sink);
                        let _ = reply.send(result);
                    }
                    Some(RoomCommand::Leave { player_id }) => {
                        self.handle_leave(player_id);
                    }
                    Some(RoomCommand::SelectBox { player_id, box_index }) => {
                        self.handle_select(player_id, box_index);
                    }
                    Some(RoomCommand::GetInfo { reply }) => {
                        let _ = reply.send(self.info());
                    }
                    Some(RoomCommand::Shutdown) | None => break,
                },
                // Pends forever while the clock is disarmed.
                _ = self.clock.tick() => self.handle_tick(),
            }
        }

        self.clock.stop();
        tracing::info!("room coordinator stopped");
    }

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        username: String,
        sink: EventSink,
    ) -> Result<(), RoomError> {
        if let Err(err) = self.state.add_player(player_id, username) {
            tracing::info!(%player_id, "join rejected: {err}");
            // Unicast the rejection before the sink is dropped.
            let _ = sink.send(ServerEvent::Error {
                message: err.to_string(),
            });
            return Err(err);
        }
        self.sinks.insert(player_id, sink);
        tracing::info!(
            %player_id,
            players = self.state.player_count(),
            "player joined"
        );

        // First player arms the clock; everyone learns the countdown
        // before the membership snapshot lands.
        if !self.clock.is_running() {
            self.clock.start();
            self.phase = RoomPhase::RoundInProgress;
            tracing::info!(countdown = self.state.countdown(), "round cycle started");
            self.broadcast(ServerEvent::Timer {
                seconds_remaining: self.state.countdown(),
            });
        }

        self.broadcast_snapshot();
        Ok(())
    }

    fn handle_leave(&mut self, player_id: PlayerId) {
        let was_present = self.state.remove_player(player_id);
        self.sinks.remove(&player_id);
        if was_present {
            tracing::info!(
                %player_id,
                players = self.state.player_count(),
                "player left"
            );
        }

        // The snapshot goes out even for an unknown identity: remaining
        // clients resync either way.
        self.broadcast_snapshot();

        if self.state.is_empty() && self.clock.is_running() {
            self.clock.stop();
            self.state.reset_round();
            self.phase = RoomPhase::Idle;
            tracing::info!("room empty, clock stopped and round reset");
        }
    }

    fn handle_select(&mut self, player_id: PlayerId, box_index: usize) {
        if !self.state.selection_open() {
            tracing::debug!(
                %player_id,
                box_index,
                countdown = self.state.countdown(),
                "selection window closed, dropping pick"
            );
            return;
        }

        match self.state.select_box(player_id, box_index) {
            Ok(()) => {
                tracing::debug!(%player_id, box_index, "box selected");
                self.broadcast_snapshot();
            }
            Err(err) => {
                // Stale or malformed picks are dropped without client
                // feedback, matching the room's silent-ignore policy.
                tracing::debug!(%player_id, "pick dropped: {err}");
            }
        }
    }

    /// One countdown step. The elimination and reset checks run against
    /// the post-decrement value; with a sane `round_seconds` the three
    /// branches are mutually exclusive per tick.
    fn handle_tick(&mut self) {
        let countdown = self.state.decrement_countdown();

        if countdown > 1 {
            self.broadcast(ServerEvent::Timer {
                seconds_remaining: countdown,
            });
        } else if countdown == 1 {
            let box_index = self.rng.random_range(0..self.state.config().total_boxes);
            let outcome = self.state.apply_elimination(box_index);
            tracing::info!(
                box_index,
                eliminated = outcome.eliminated.len(),
                scored = outcome.scored.len(),
                "elimination"
            );
            self.broadcast(ServerEvent::Elimination { box_index });
            self.broadcast_snapshot();
        } else {
            self.state.reset_round();
            tracing::info!(countdown = self.state.countdown(), "round reset");
            self.broadcast_snapshot();
            self.broadcast(ServerEvent::Timer {
                seconds_remaining: self.state.countdown(),
            });
        }
    }

    /// Sends an event to every connected player. Holders whose receiver
    /// is gone are silently skipped; the Leave command cleans them up.
    fn broadcast(&self, event: ServerEvent) {
        for sink in self.sinks.values() {
            let _ = sink.send(event.clone());
        }
    }

    fn broadcast_snapshot(&self) {
        self.broadcast(ServerEvent::RoomUpdate {
            players: self.state.snapshot(),
        });
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            player_count: self.state.player_count(),
            max_players: self.state.config().max_players,
            countdown: self.state.countdown(),
            phase: self.phase,
        }
    }
}

/// Spawns a room coordinator task and returns a handle to it.
///
/// The room starts in [`RoomPhase::Idle`] with the clock disarmed; the
/// first join arms it.
pub fn spawn_room(config: RoomConfig) -> RoomHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);

    let rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let clock = Clock::idle(config.tick_interval);

    let actor = RoomActor {
        state: RoomState::new(config),
        phase: RoomPhase::Idle,
        clock,
        sinks: HashMap::new(),
        rng,
    };

    tokio::spawn(actor.run(rx));

    RoomHandle { sender: tx }
}
