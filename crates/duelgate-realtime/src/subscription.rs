//! Subscription handles: typed pull streams over broadcast receivers.

use duelgate_protocol::{RoomCode, RoomEvent};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// A live subscription to one room's change feed.
///
/// Pull events with [`next`](Self::next) until it returns `None` (the
/// room was deleted or the store went away). Dropping the subscription
/// unsubscribes.
pub struct RoomSubscription {
    code: RoomCode,
    rx: broadcast::Receiver<RoomEvent>,
}

impl RoomSubscription {
    pub(crate) fn new(
        code: RoomCode,
        rx: broadcast::Receiver<RoomEvent>,
    ) -> Self {
        Self { code, rx }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// The next event, in commit order.
    ///
    /// A subscriber that fell behind the feed buffer gets one
    /// [`RoomEvent::Resync`] in place of everything it missed and then
    /// continues from the stream's current position. `None` means the
    /// feed is closed for good.
    pub async fn next(&mut self) -> Option<RoomEvent> {
        match self.rx.recv().await {
            Ok(event) => Some(event),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(
                    code = %self.code,
                    skipped,
                    "subscriber lagged, forcing resync"
                );
                Some(RoomEvent::Resync)
            }
            Err(RecvError::Closed) => None,
        }
    }
}

/// A live listener on one room's ephemeral side channel.
pub struct BroadcastSubscription {
    code: RoomCode,
    rx: broadcast::Receiver<serde_json::Value>,
}

impl BroadcastSubscription {
    pub(crate) fn new(
        code: RoomCode,
        rx: broadcast::Receiver<serde_json::Value>,
    ) -> Self {
        Self { code, rx }
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// The next payload. Missed payloads are skipped silently; these
    /// are cosmetic one-shots, not state.
    pub async fn next(&mut self) -> Option<serde_json::Value> {
        loop {
            match self.rx.recv().await {
                Ok(payload) => return Some(payload),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => return None,
            }
        }
    }
}
