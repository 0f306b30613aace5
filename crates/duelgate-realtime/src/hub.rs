//! The hub: hands out subscriptions and relays ephemeral payloads.

use std::collections::HashMap;
use std::sync::Arc;

use duelgate_protocol::RoomCode;
use duelgate_store::MatchStore;
use tokio::sync::{broadcast, Mutex};

use crate::{BroadcastSubscription, RoomSubscription};

/// Buffered payloads per ephemeral channel. These are cosmetic
/// one-shots, so the buffer is small.
pub const BROADCAST_CAPACITY: usize = 16;

/// Fan-out hub for one process.
///
/// Change-feed subscriptions go straight to the store's per-room
/// channels; the hub adds the ephemeral channels on top and owns their
/// senders.
pub struct RealtimeHub {
    store: Arc<MatchStore>,
    ephemeral: Mutex<HashMap<RoomCode, broadcast::Sender<serde_json::Value>>>,
}

impl RealtimeHub {
    pub fn new(store: Arc<MatchStore>) -> Self {
        Self {
            store,
            ephemeral: Mutex::new(HashMap::new()),
        }
    }

    /// Opens a typed subscription to a room's change feed. Subscribing
    /// before the room exists is fine; events flow once writes commit.
    pub async fn subscribe(&self, code: &RoomCode) -> RoomSubscription {
        let rx = self.store.subscribe(code).await;
        tracing::debug!(%code, "room subscription opened");
        RoomSubscription::new(code.clone(), rx)
    }

    /// Publishes an ephemeral payload to a room's side channel and
    /// returns how many listeners it reached. Zero listeners is not an
    /// error; the payload is simply gone.
    pub async fn publish(
        &self,
        code: &RoomCode,
        payload: serde_json::Value,
    ) -> usize {
        let mut channels = self.ephemeral.lock().await;
        let tx = channels
            .entry(code.clone())
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0);
        tx.send(payload).unwrap_or(0)
    }

    /// Attaches a listener to a room's ephemeral side channel. Only
    /// payloads published while the listener is live are delivered.
    pub async fn listen(&self, code: &RoomCode) -> BroadcastSubscription {
        let mut channels = self.ephemeral.lock().await;
        let rx = channels
            .entry(code.clone())
            .or_insert_with(|| broadcast::channel(BROADCAST_CAPACITY).0)
            .subscribe();
        BroadcastSubscription::new(code.clone(), rx)
    }
}
