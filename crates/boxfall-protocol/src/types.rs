//! The event schema clients and the room coordinator exchange.
//!
//! Every type here has an explicit JSON shape. Tag and field names are
//! camelCase because that is what the browser clients consume; the
//! tests at the bottom of this module pin the exact wire format.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Opaque connection identifier, assigned by the transport layer.
///
/// Unique per connected client for the lifetime of the connection.
/// Serializes as a plain number thanks to `#[serde(transparent)]`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// One player's entry in a room snapshot.
///
/// `position` is nullable but never omitted: clients distinguish
/// "has not picked a box" (`null`) from a picked index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    /// Display name supplied at join time. Not validated for uniqueness.
    pub username: String,
    /// The box the player currently occupies, if any.
    pub position: Option<usize>,
    /// Cumulative score. May go negative.
    pub score: i64,
    /// `false` only between an elimination and the following round reset.
    pub alive: bool,
}

/// Full room snapshot: player identity mapped to their current record.
///
/// A `BTreeMap` keeps the JSON key order stable, which makes snapshots
/// diffable in logs and deterministic in tests.
pub type RoomSnapshot = BTreeMap<PlayerId, PlayerSnapshot>;

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// Intents a connected client can submit.
///
/// Disconnects are implicit: the transport layer reports connection
/// closure directly to the coordinator, there is no wire message for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientIntent {
    /// Enter the room under the given display name.
    Join { username: String },

    /// Occupy a box for the current round. Re-selection is allowed
    /// while the selection window is open.
    SelectBox { box_index: usize },
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Events the coordinator emits, broadcast to the room or unicast to
/// one client (only [`ServerEvent::Error`] is ever unicast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// Full room snapshot. Sent whenever membership, selections, or
    /// scores change — clients render from this, never from deltas.
    RoomUpdate { players: RoomSnapshot },

    /// Countdown value for the current round.
    Timer { seconds_remaining: u32 },

    /// The box drawn at the end of a round. Everyone standing on it
    /// was just eliminated; the snapshot that follows has the results.
    Elimination { box_index: usize },

    /// Unicast rejection notice (currently only "room is full").
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Wire-format tests. Browser clients parse these exact shapes, so
    //! a serde attribute change that alters the JSON is a breaking bug
    //! these tests are meant to catch.

    use super::*;

    fn snapshot_with(id: u64, player: PlayerSnapshot) -> RoomSnapshot {
        let mut players = RoomSnapshot::new();
        players.insert(PlayerId(id), player);
        players
    }

    // =====================================================================
    // PlayerId
    // =====================================================================

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_deserializes_from_plain_number() {
        let pid: PlayerId = serde_json::from_str("42").unwrap();
        assert_eq!(pid, PlayerId(42));
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    // =====================================================================
    // ServerEvent — one shape test per variant
    // =====================================================================

    #[test]
    fn test_room_update_json_format() {
        let event = ServerEvent::RoomUpdate {
            players: snapshot_with(
                7,
                PlayerSnapshot {
                    username: "ana".into(),
                    position: Some(2),
                    score: 10,
                    alive: true,
                },
            ),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "roomUpdate");
        // Map keys are numeric PlayerIds, serialized as JSON strings.
        assert_eq!(json["players"]["7"]["username"], "ana");
        assert_eq!(json["players"]["7"]["position"], 2);
        assert_eq!(json["players"]["7"]["score"], 10);
        assert_eq!(json["players"]["7"]["alive"], true);
    }

    #[test]
    fn test_room_update_position_is_null_not_omitted() {
        let event = ServerEvent::RoomUpdate {
            players: snapshot_with(
                3,
                PlayerSnapshot {
                    username: "brook".into(),
                    position: None,
                    score: -10,
                    alive: false,
                },
            ),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        let entry = json["players"]["3"].as_object().unwrap();
        assert!(entry.contains_key("position"), "position must be present");
        assert!(entry["position"].is_null());
        assert_eq!(entry["score"], -10);
        assert_eq!(entry["alive"], false);
    }

    #[test]
    fn test_timer_json_format() {
        let event = ServerEvent::Timer {
            seconds_remaining: 20,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "timer");
        assert_eq!(json["secondsRemaining"], 20);
    }

    #[test]
    fn test_elimination_json_format() {
        let event = ServerEvent::Elimination { box_index: 3 };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "elimination");
        assert_eq!(json["boxIndex"], 3);
    }

    #[test]
    fn test_error_json_format() {
        let event = ServerEvent::Error {
            message: "room is full".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["event"], "error");
        assert_eq!(json["message"], "room is full");
    }

    #[test]
    fn test_server_event_round_trip() {
        let event = ServerEvent::RoomUpdate {
            players: snapshot_with(
                1,
                PlayerSnapshot {
                    username: "cleo".into(),
                    position: None,
                    score: 0,
                    alive: true,
                },
            ),
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    // =====================================================================
    // ClientIntent
    // =====================================================================

    #[test]
    fn test_join_intent_json_format() {
        let intent = ClientIntent::Join {
            username: "ana".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&intent).unwrap();

        assert_eq!(json["intent"], "join");
        assert_eq!(json["username"], "ana");
    }

    #[test]
    fn test_select_box_intent_json_format() {
        let intent = ClientIntent::SelectBox { box_index: 0 };
        let json: serde_json::Value = serde_json::to_value(&intent).unwrap();

        assert_eq!(json["intent"], "selectBox");
        assert_eq!(json["boxIndex"], 0);
    }

    #[test]
    fn test_client_intent_decodes_from_wire_form() {
        let json = r#"{"intent": "selectBox", "boxIndex": 2}"#;
        let intent: ClientIntent = serde_json::from_str(json).unwrap();
        assert_eq!(intent, ClientIntent::SelectBox { box_index: 2 });
    }

    #[test]
    fn test_unknown_intent_tag_is_rejected() {
        let json = r#"{"intent": "teleport", "boxIndex": 9}"#;
        let result: Result<ClientIntent, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
