//! Room state and round coordination for Boxfall.
//!
//! One room runs as an isolated Tokio task (actor model) owning the
//! authoritative player map and countdown. Transport adapters talk to
//! it through a [`RoomHandle`] and receive broadcasts on per-player
//! [`EventSink`] channels.
//!
//! # Key types
//!
//! - [`spawn_room`] — start a room actor, get a handle
//! - [`RoomHandle`] — submit join/leave/select intents
//! - [`RoomState`] — the player map and countdown (pure data)
//! - [`RoomConfig`] — constants (player cap, boxes, round length)
//! - [`RoomError`] — what can be rejected and why

mod config;
mod coordinator;
mod error;
mod state;

pub use config::{RoomConfig, RoomPhase};
pub use coordinator::{EventSink, RoomHandle, RoomInfo, spawn_room};
pub use error::RoomError;
pub use state::{EliminationOutcome, Player, RoomState};
