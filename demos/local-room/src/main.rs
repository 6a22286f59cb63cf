//! Runs one room with two scripted bots over in-process channels.
//!
//! No network involved — this is the wiring a transport adapter would
//! do, with bots standing in for connected clients. Rounds are
//! shortened so two full cycles finish in a few seconds.
//!
//! ```text
//! RUST_LOG=debug cargo run -p local-room
//! ```

use std::time::Duration;

use boxfall_protocol::{PlayerId, ServerEvent};
use boxfall_room::{RoomConfig, RoomHandle, spawn_room};
use rand::Rng;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// A bot that picks a random box at the start of every round and
/// narrates what it sees.
async fn bot(
    name: &'static str,
    player_id: PlayerId,
    room: RoomHandle,
    mut events: mpsc::UnboundedReceiver<ServerEvent>,
) {
    while let Some(event) = events.recv().await {
        match event {
            ServerEvent::Timer { seconds_remaining } if seconds_remaining >= 4 => {
                let pick = rand::rng().random_range(0..4);
                tracing::info!(bot = name, seconds_remaining, pick, "picking a box");
                if room.select_box(player_id, pick).await.is_err() {
                    break;
                }
            }
            ServerEvent::Timer { .. } => {}
            ServerEvent::Elimination { box_index } => {
                tracing::info!(bot = name, box_index, "box dropped");
            }
            ServerEvent::RoomUpdate { players } => {
                if let Some(me) = players.get(&player_id) {
                    tracing::debug!(
                        bot = name,
                        score = me.score,
                        alive = me.alive,
                        "snapshot"
                    );
                }
            }
            ServerEvent::Error { message } => {
                tracing::warn!(bot = name, message, "rejected");
                break;
            }
        }
    }
    tracing::info!(bot = name, "disconnected");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let room = spawn_room(RoomConfig {
        round_seconds: 5,
        tick_interval: Duration::from_millis(400),
        ..RoomConfig::default()
    });

    let mut handles = Vec::new();
    for (id, name) in [(1, "ana"), (2, "brook")] {
        let player_id = PlayerId(id);
        let (tx, rx) = mpsc::unbounded_channel();
        room.join(player_id, name, tx).await?;
        handles.push(tokio::spawn(bot(name, player_id, room.clone(), rx)));
    }

    // Two full rounds of 5 ticks at 400ms, plus slack.
    tokio::time::sleep(Duration::from_secs(5)).await;

    let info = room.info().await?;
    tracing::info!(players = info.player_count, countdown = info.countdown, "wrapping up");

    room.shutdown().await?;
    for handle in handles {
        let _ = handle.await;
    }
    Ok(())
}
