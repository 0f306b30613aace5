//! The shared ground truth both players converge on.
//!
//! [`MatchStore`] owns the room table and the battle log behind one
//! async mutex: the in-process stand-in for a remote store's
//! serializable transaction order. Every mutation is a single
//! conditional operation under that lock, and change events are
//! emitted before the lock is released, so each room's feed order
//! equals its commit order.
//!
//! Nothing outside this crate writes health, status, or log rows. The
//! operations layer (`duelgate-battle`) drives the conditional
//! primitives; everyone else reads, or subscribes to the feed.

mod error;
mod store;

pub use error::StoreError;
pub use store::{LeaveOutcome, MatchStore, FEED_CAPACITY};
