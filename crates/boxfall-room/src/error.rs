//! Error types for the room layer.

use boxfall_protocol::PlayerId;

/// Errors that can occur during room operations.
///
/// None of these are fatal. `RoomFull` is reported back to the joining
/// client; `UnknownPlayer` and `InvalidBox` are logged and dropped,
/// matching the room's silent-ignore policy for stale or malformed
/// selections.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room has no free player slots.
    #[error("room is full")]
    RoomFull,

    /// The player is not in the room (e.g. already disconnected).
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    /// The box index is outside `0..total_boxes`.
    #[error("box {index} out of range (room has {total} boxes)")]
    InvalidBox { index: usize, total: usize },

    /// The room's command channel is closed — the actor has shut down.
    #[error("room is unavailable")]
    Unavailable,
}
