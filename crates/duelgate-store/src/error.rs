//! Error types for the store layer.
//!
//! These are finer-grained than the wire taxonomy on purpose:
//! `CodeTaken` exists only to drive the allocation retry loop and never
//! crosses the HTTP boundary.

use duelgate_protocol::{PlayerRef, RoomCode};

/// Errors a conditional store operation can return.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// No room at this code.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// A non-terminal room already holds this code. The conditional
    /// insert failed; the caller draws a fresh candidate.
    #[error("code {0} is held by an active room")]
    CodeTaken(RoomCode),

    /// Both fighter slots are occupied.
    #[error("room {0} already has two fighters")]
    RoomFull(RoomCode),

    /// The caller is not one of the room's participants.
    #[error("player {0} is not a participant in room {1}")]
    NotParticipant(PlayerRef, RoomCode),

    /// The compare-and-set on the stored turn failed: the call is stale
    /// or duplicated, and retrying it blindly would apply an illegal
    /// second attack.
    #[error("it is not {0}'s turn in room {1}")]
    OutOfTurn(PlayerRef, RoomCode),

    /// The room's status does not allow this operation.
    #[error("{0}")]
    InvalidState(String),
}
