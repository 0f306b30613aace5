//! Core domain types shared by every layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::GameError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Length of a lobby code.
pub const CODE_LEN: usize = 4;

/// The lobby code alphabet: the 26 uppercase Latin letters.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A 4-letter lobby code addressing one room.
///
/// Codes are unique among rooms whose status is not terminal; a
/// `Completed` room's code may be recycled by a later create. The
/// newtype validates on construction, so a `RoomCode` in hand is
/// always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Parses a candidate code, rejecting anything that is not exactly
    /// [`CODE_LEN`] uppercase ASCII letters.
    pub fn parse(s: &str) -> Result<Self, GameError> {
        if s.len() == CODE_LEN && s.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(s.to_owned()))
        } else {
            Err(GameError::validation(format!(
                "room code must be {CODE_LEN} uppercase letters, got {s:?}"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RoomCode {
    type Error = GameError;

    fn try_from(s: String) -> Result<Self, GameError> {
        Self::parse(&s)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> String {
        code.0
    }
}

/// An opaque participant identifier.
///
/// Upstream this is a wallet address; the core never looks inside it,
/// it only compares for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerRef(String);

impl PlayerRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PlayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Battle sheet
// ---------------------------------------------------------------------------

/// Inclusive damage bounds a fighter declares at entry.
///
/// Purely informational to the core: damage values arriving with an
/// attack are trusted and clamped, never re-checked against the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRange {
    pub min: u32,
    pub max: u32,
}

impl AttackRange {
    pub fn new(min: u32, max: u32) -> Result<Self, GameError> {
        let range = Self { min, max };
        range.validate()?;
        Ok(range)
    }

    /// Deserialized ranges bypass [`new`](Self::new); the wire boundary
    /// calls this before accepting one.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.min <= self.max {
            Ok(())
        } else {
            Err(GameError::validation(format!(
                "attack range min {} exceeds max {}",
                self.min, self.max
            )))
        }
    }
}

/// One participant's battle sheet inside a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fighter {
    pub player: PlayerRef,
    /// Cosmetic label, never used in logic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub health: u32,
    pub attack_range: AttackRange,
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// Lifecycle status of a room.
///
/// ```text
/// open ──→ ready ──→ playing ──→ completed
///   ▲        │          │
///   └────────┴──────────┘   (player two leaves)
/// ```
///
/// `completed` is terminal. Deletion (the creator leaving) is a terminal
/// removal, not a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Open,
    Ready,
    Playing,
    Completed,
}

impl RoomStatus {
    /// A terminal room no longer holds its code against reuse.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Open => "open",
            Self::Ready => "ready",
            Self::Playing => "playing",
            Self::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// One match: two fighters at most, addressed by a lobby code.
///
/// `current_turn` is the stored arbiter of turn order. It names the
/// participant permitted to attack next, starts as player one, swaps to
/// the defender after every applied attack, and clears when the room
/// completes. The battle log's newest entry always agrees with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub code: RoomCode,
    pub status: RoomStatus,
    #[serde(rename = "player1")]
    pub player_one: Fighter,
    #[serde(rename = "player2")]
    pub player_two: Option<Fighter>,
    #[serde(rename = "currentTurn")]
    pub current_turn: Option<PlayerRef>,
}

impl Room {
    /// A fresh room in `open`, waiting for an opponent. Player one moves
    /// first, so the turn is theirs from the start.
    pub fn new(code: RoomCode, player_one: Fighter) -> Self {
        let current_turn = Some(player_one.player.clone());
        Self {
            code,
            status: RoomStatus::Open,
            player_one,
            player_two: None,
            current_turn,
        }
    }

    pub fn is_participant(&self, player: &PlayerRef) -> bool {
        self.fighter(player).is_some()
    }

    pub fn fighter(&self, player: &PlayerRef) -> Option<&Fighter> {
        [Some(&self.player_one), self.player_two.as_ref()]
            .into_iter()
            .flatten()
            .find(|f| &f.player == player)
    }

    pub fn fighter_mut(&mut self, player: &PlayerRef) -> Option<&mut Fighter> {
        [Some(&mut self.player_one), self.player_two.as_mut()]
            .into_iter()
            .flatten()
            .find(|f| &f.player == player)
    }

    /// The participant who is not `player`, if both are present.
    pub fn opponent_of(&self, player: &PlayerRef) -> Option<&Fighter> {
        let two = self.player_two.as_ref()?;
        if &self.player_one.player == player {
            Some(two)
        } else if &two.player == player {
            Some(&self.player_one)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Battle log
// ---------------------------------------------------------------------------

/// One recorded attack. Created only by the attack transaction, never
/// mutated or deleted.
///
/// `seq` is monotonically increasing per room and totally orders the
/// log; the newest entry's attacker is the evidence for whose turn
/// follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleLogEntry {
    pub room_code: RoomCode,
    pub attacker: PlayerRef,
    pub damage: u32,
    pub seq: u64,
}

/// What an applied attack did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackOutcome {
    pub new_health: u32,
    pub target_player: PlayerRef,
    pub game_over: bool,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fighter(id: &str, health: u32) -> Fighter {
        Fighter {
            player: PlayerRef::new(id),
            display_name: None,
            health,
            attack_range: AttackRange { min: 20, max: 80 },
        }
    }

    #[test]
    fn test_room_code_accepts_four_uppercase_letters() {
        let code = RoomCode::parse("ABCD").unwrap();
        assert_eq!(code.as_str(), "ABCD");
        assert_eq!(code.to_string(), "ABCD");
    }

    #[test]
    fn test_room_code_rejects_bad_shapes() {
        for bad in ["abc", "ABCDE", "AB1D", "ab cd", "", "ÄBCD"] {
            assert!(RoomCode::parse(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_room_code_serializes_as_plain_string() {
        let code = RoomCode::parse("WXYZ").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"WXYZ\"");
    }

    #[test]
    fn test_room_code_deserialization_validates() {
        let ok: Result<RoomCode, _> = serde_json::from_str("\"ABCD\"");
        assert!(ok.is_ok());
        let bad: Result<RoomCode, _> = serde_json::from_str("\"abcd\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_player_ref_serializes_transparently() {
        let p = PlayerRef::new("0xabc");
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"0xabc\"");
    }

    #[test]
    fn test_attack_range_validation() {
        assert!(AttackRange::new(20, 80).is_ok());
        assert!(AttackRange::new(50, 50).is_ok());
        assert!(AttackRange::new(81, 80).is_err());
    }

    #[test]
    fn test_room_status_json_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&RoomStatus::Playing).unwrap(),
            "\"playing\""
        );
        assert_eq!(
            serde_json::to_string(&RoomStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn test_room_status_terminal() {
        assert!(RoomStatus::Completed.is_terminal());
        assert!(!RoomStatus::Open.is_terminal());
        assert!(!RoomStatus::Playing.is_terminal());
        assert!(RoomStatus::Open.is_joinable());
        assert!(!RoomStatus::Ready.is_joinable());
    }

    #[test]
    fn test_new_room_gives_first_turn_to_player_one() {
        let room = Room::new(RoomCode::parse("ABCD").unwrap(), fighter("p1", 100));
        assert_eq!(room.status, RoomStatus::Open);
        assert!(room.player_two.is_none());
        assert_eq!(room.current_turn, Some(PlayerRef::new("p1")));
    }

    #[test]
    fn test_room_json_uses_legacy_field_names() {
        // Clients read `player1`, `player2`, and `currentTurn`.
        let mut room =
            Room::new(RoomCode::parse("ABCD").unwrap(), fighter("p1", 100));
        room.player_two = Some(fighter("p2", 100));
        let json = serde_json::to_value(&room).unwrap();

        assert_eq!(json["code"], "ABCD");
        assert_eq!(json["status"], "open");
        assert_eq!(json["player1"]["player"], "p1");
        assert_eq!(json["player2"]["health"], 100);
        assert_eq!(json["currentTurn"], "p1");
        assert!(json["player1"].get("displayName").is_none());
    }

    #[test]
    fn test_room_opponent_lookup() {
        let mut room =
            Room::new(RoomCode::parse("ABCD").unwrap(), fighter("p1", 100));
        assert!(room.opponent_of(&PlayerRef::new("p1")).is_none());

        room.player_two = Some(fighter("p2", 70));
        let opp = room.opponent_of(&PlayerRef::new("p1")).unwrap();
        assert_eq!(opp.player.as_str(), "p2");
        let opp = room.opponent_of(&PlayerRef::new("p2")).unwrap();
        assert_eq!(opp.player.as_str(), "p1");
        assert!(room.opponent_of(&PlayerRef::new("p3")).is_none());
    }

    #[test]
    fn test_battle_log_entry_json_shape() {
        let entry = BattleLogEntry {
            room_code: RoomCode::parse("ABCD").unwrap(),
            attacker: PlayerRef::new("p1"),
            damage: 30,
            seq: 2,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["roomCode"], "ABCD");
        assert_eq!(json["attacker"], "p1");
        assert_eq!(json["damage"], 30);
        assert_eq!(json["seq"], 2);
    }

    #[test]
    fn test_attack_outcome_round_trip() {
        let outcome = AttackOutcome {
            new_health: 70,
            target_player: PlayerRef::new("p2"),
            game_over: false,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["newHealth"], 70);
        assert_eq!(json["targetPlayer"], "p2");
        assert_eq!(json["gameOver"], false);
        let back: AttackOutcome = serde_json::from_value(json).unwrap();
        assert_eq!(back, outcome);
    }
}
