//! Shared application state handed to every handler.

use std::sync::Arc;

use duelgate_battle::{BattleService, LobbyService};
use duelgate_realtime::RealtimeHub;
use duelgate_store::MatchStore;

/// One store, one set of services, cloned cheaply into each handler.
#[derive(Clone)]
pub struct AppState {
    pub lobby: Arc<LobbyService>,
    pub battle: Arc<BattleService>,
    pub realtime: Arc<RealtimeHub>,
}

impl AppState {
    /// Wires the full service stack over an injected store. The caller
    /// owns the store's lifecycle; nothing here is global.
    pub fn new(store: Arc<MatchStore>) -> Self {
        Self {
            lobby: Arc::new(LobbyService::new(Arc::clone(&store))),
            battle: Arc::new(BattleService::new(Arc::clone(&store))),
            realtime: Arc::new(RealtimeHub::new(store)),
        }
    }
}
