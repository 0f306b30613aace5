//! Request/response bodies for the HTTP surface and the realtime frames.
//!
//! Field names follow the external interface exactly (`playerAddress`,
//! `roomCode`, `currentTurn`), so every DTO is `camelCase` on the wire
//! regardless of its Rust spelling.

use serde::{Deserialize, Serialize};

use crate::{
    AttackRange, BattleLogEntry, Fighter, PlayerRef, Room, RoomCode,
    RoomStatus,
};

/// Log entries returned when the caller does not pass `limit`.
pub const DEFAULT_LOG_LIMIT: usize = 10;

/// Upper bound on `limit`; larger requests are clamped, not rejected.
pub const MAX_LOG_LIMIT: usize = 50;

// ---------------------------------------------------------------------------
// POST /lobby
// ---------------------------------------------------------------------------

/// Body of `POST /lobby`. Stats are optional; omitted ones fall back to
/// the standard sheet (100 health, 20..=80 range).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    pub player_address: PlayerRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_range: Option<AttackRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomResponse {
    pub code: RoomCode,
    pub data: Room,
}

// ---------------------------------------------------------------------------
// PATCH /lobby
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LobbyAction {
    Join,
    Leave,
}

/// Body of `PATCH /lobby`. The stat fields only matter for `join`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLobbyRequest {
    pub code: RoomCode,
    pub player_address: PlayerRef,
    pub action: LobbyAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attack_range: Option<AttackRange>,
}

/// A join answers with the updated room, a leave with a plain message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpdateLobbyResponse {
    Joined { data: Room },
    Left { message: String },
}

// ---------------------------------------------------------------------------
// GET /battle/status, GET /realtime
// ---------------------------------------------------------------------------

/// Query string carrying a single `roomCode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomQuery {
    pub room_code: RoomCode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: RoomStatus,
    #[serde(rename = "player1")]
    pub player_one: Fighter,
    #[serde(rename = "player2")]
    pub player_two: Option<Fighter>,
    #[serde(rename = "currentTurn")]
    pub current_turn: Option<PlayerRef>,
}

impl From<Room> for StatusResponse {
    fn from(room: Room) -> Self {
        Self {
            status: room.status,
            player_one: room.player_one,
            player_two: room.player_two,
            current_turn: room.current_turn,
        }
    }
}

// ---------------------------------------------------------------------------
// POST /battle/attack
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackRequest {
    pub room_code: RoomCode,
    pub attacker: PlayerRef,
    pub damage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackResponse {
    pub success: bool,
    pub new_health: u32,
    pub target_player: PlayerRef,
    pub game_over: bool,
}

// ---------------------------------------------------------------------------
// GET /battle/logs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsQuery {
    pub room_code: RoomCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsResponse {
    /// Newest first.
    pub logs: Vec<BattleLogEntry>,
    pub last_attacker: Option<PlayerRef>,
}

// ---------------------------------------------------------------------------
// Realtime frames
// ---------------------------------------------------------------------------

/// One frame on a room's realtime channel, tagged with its originating
/// entity so subscribers can tell a room update from a log insertion.
///
/// The change feed emits `Room`, `RoomDeleted`, and `Log` in commit
/// order. `Resync` is synthesized for a subscriber that fell behind:
/// treat it as "state may have changed, re-read", never as a delta.
/// `Broadcast` carries the ephemeral side channel (cosmetic payloads,
/// nothing persisted) when the feed is multiplexed over one socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity", content = "data", rename_all = "snake_case")]
pub enum RoomEvent {
    Room(Room),
    RoomDeleted(RoomCode),
    Log(BattleLogEntry),
    Resync,
    Broadcast(serde_json::Value),
}

// =========================================================================
// Tests
// =========================================================================
