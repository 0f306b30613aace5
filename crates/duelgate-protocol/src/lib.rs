//! Shared language of the Duelgate stack.
//!
//! This crate defines everything the other layers agree on:
//!
//! - **Domain types** ([`Room`], [`Fighter`], [`BattleLogEntry`], the
//!   [`RoomCode`] and [`PlayerRef`] newtypes): the shapes that live in
//!   the store and travel on the wire.
//! - **Wire DTOs** ([`CreateRoomRequest`], [`AttackResponse`], etc.):
//!   request/response bodies for every HTTP endpoint, plus the
//!   [`RoomEvent`] frames pushed over the realtime channel.
//! - **Errors** ([`GameError`]): the wire-level failure taxonomy with
//!   its HTTP status mapping.
//!
//! The protocol layer knows nothing about storage, networking, or axum.
//! Both tiers of the resilient facade round-trip [`GameError`] through
//! its serialized form, which is why it carries a machine-readable
//! `code` tag next to the human-readable message.

mod error;
mod types;
mod wire;

pub use error::GameError;
pub use types::{
    AttackOutcome, AttackRange, BattleLogEntry, Fighter, PlayerRef, Room,
    RoomCode, RoomStatus, CODE_ALPHABET, CODE_LEN,
};
pub use wire::{
    AttackRequest, AttackResponse, CreateRoomRequest, CreateRoomResponse,
    LobbyAction, LogsQuery, LogsResponse, RoomEvent, RoomQuery,
    StatusResponse, UpdateLobbyRequest, UpdateLobbyResponse,
    DEFAULT_LOG_LIMIT, MAX_LOG_LIMIT,
};
