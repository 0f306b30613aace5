//! The wire-level failure taxonomy.
//!
//! Every crate in the stack maps its internal errors into [`GameError`]
//! before the result crosses a contract boundary. The enum serializes as
//! `{ "code": "...", "error": "..." }`: the `error` string is what users
//! see, the `code` tag is what the resilient facade uses to reconstruct
//! the exact variant after an HTTP round trip.

use serde::{Deserialize, Serialize};

use crate::RoomCode;

/// A failure any endpoint can surface.
#[derive(
    Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize,
)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum GameError {
    /// Missing or malformed request fields. Not retried.
    #[error("{error}")]
    Validation { error: String },

    /// The code does not resolve to an active room.
    #[error("{error}")]
    NotFound { error: String },

    /// The request lost a race or arrived in the wrong state: a join on
    /// a full room, an attack out of turn, a start from `open`. Surfaced
    /// to the user, never silently retried.
    #[error("{error}")]
    Conflict { error: String },

    /// Code allocation gave up after its retry bound. The whole create
    /// may be retried later.
    #[error("{error}")]
    GenerationExhausted { error: String },
}

impl GameError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation { error: msg.into() }
    }

    pub fn not_found(code: &RoomCode) -> Self {
        Self::NotFound {
            error: format!("room {code} not found"),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict { error: msg.into() }
    }

    pub fn generation_exhausted(attempts: usize) -> Self {
        Self::GenerationExhausted {
            error: format!("no unique room code found in {attempts} attempts"),
        }
    }

    /// The HTTP status this error maps to. `Conflict` deliberately rides
    /// 400, not 409: the clients treat both as "show the message and do
    /// not retry".
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation { .. } | Self::Conflict { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::GenerationExhausted { .. } => 500,
        }
    }
}
