//! # Duelgate
//!
//! Coordination service for two-player, turn-based battles between
//! clients that share no direct connection. The clients converge
//! through a shared store and a per-room change feed; this crate is
//! the HTTP face over that core:
//!
//! - `POST /lobby`: create a room (code allocation included)
//! - `PATCH /lobby`: join or leave by code
//! - `GET /battle/status`: current room state
//! - `POST /battle/attack`: apply one attack
//! - `GET /battle/logs`: recent battle history
//! - `GET /realtime`: the WebSocket carrying the change feed out and
//!   ephemeral broadcasts in
//!
//! Every component is constructed by the process entry point and
//! injected through [`AppState`]; there are no module-level store
//! handles anywhere in the stack.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use duelgate::{router, AppState};
//! use duelgate_store::MatchStore;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MatchStore::new());
//! let app = router(AppState::new(store));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod extract;
mod routes;
mod state;
mod ws;

pub use error::ApiError;
pub use extract::{ApiJson, ApiQuery};
pub use routes::router;
pub use state::AppState;

pub mod prelude {
    pub use crate::{router, ApiError, AppState};
    pub use duelgate_battle::{BattleService, LobbyService};
    pub use duelgate_protocol::{
        AttackOutcome, BattleLogEntry, Fighter, GameError, PlayerRef, Room,
        RoomCode, RoomEvent, RoomStatus,
    };
    pub use duelgate_realtime::RealtimeHub;
    pub use duelgate_store::MatchStore;
}
