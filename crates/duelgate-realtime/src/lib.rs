//! Realtime fan-out for Duelgate.
//!
//! Two delivery surfaces, both keyed by room code:
//!
//! - The **change feed**: every committed room mutation and log
//!   insertion, in commit order, as typed [`RoomEvent`]s. Backed by the
//!   store's per-room broadcast channels; a subscriber that falls
//!   behind gets a `Resync` marker instead of the missed events, so the
//!   contract is always "state may have changed, re-read", never
//!   "authoritative delta".
//! - The **ephemeral channel**: fire-and-forget JSON payloads between
//!   the two participants (a cosmetic asset reference at match start,
//!   say). Nothing is stored; late listeners miss earlier payloads.
//!
//! Subscriptions are plain streams pulled with `next()`. Dropping one
//! unsubscribes; there is no callback registry to tear down.
//!
//! [`RoomEvent`]: duelgate_protocol::RoomEvent

mod hub;
mod subscription;

pub use hub::{RealtimeHub, BROADCAST_CAPACITY};
pub use subscription::{BroadcastSubscription, RoomSubscription};
