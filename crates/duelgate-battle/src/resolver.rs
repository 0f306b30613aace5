//! Combat: the attack call and the battle reads.

use std::sync::Arc;

use duelgate_protocol::{
    AttackOutcome, AttackRequest, GameError, LogsResponse, RoomCode,
    StatusResponse, DEFAULT_LOG_LIMIT, MAX_LOG_LIMIT,
};
use duelgate_store::MatchStore;

use crate::map_store_err;

/// Turn/damage resolution over an injected store handle.
///
/// Damage arrives from the attacking client (rolled from its declared
/// range upstream) and is applied as-is, clamped at zero. The store's
/// compare-and-set on the stored turn is what rejects stale or
/// duplicated attacks.
pub struct BattleService {
    store: Arc<MatchStore>,
}

impl BattleService {
    pub fn new(store: Arc<MatchStore>) -> Self {
        Self { store }
    }

    /// Applies one attack as a single store transaction.
    pub async fn attack(
        &self,
        req: &AttackRequest,
    ) -> Result<AttackOutcome, GameError> {
        if req.attacker.is_empty() {
            return Err(GameError::validation("attacker is required"));
        }
        self.store
            .commit_attack(&req.room_code, &req.attacker, req.damage)
            .await
            .map_err(|err| {
                tracing::debug!(
                    code = %req.room_code,
                    attacker = %req.attacker,
                    %err,
                    "attack rejected"
                );
                map_store_err(err)
            })
    }

    /// Current state of the room at `code`.
    pub async fn status(
        &self,
        code: &RoomCode,
    ) -> Result<StatusResponse, GameError> {
        self.store
            .room(code)
            .await
            .map(StatusResponse::from)
            .map_err(map_store_err)
    }

    /// Recent battle history, newest first. `limit` defaults to
    /// [`DEFAULT_LOG_LIMIT`] and is clamped to [`MAX_LOG_LIMIT`].
    pub async fn logs(
        &self,
        code: &RoomCode,
        limit: Option<usize>,
    ) -> Result<LogsResponse, GameError> {
        let limit = limit.unwrap_or(DEFAULT_LOG_LIMIT).min(MAX_LOG_LIMIT);
        let logs = self
            .store
            .recent_logs(code, limit)
            .await
            .map_err(map_store_err)?;
        let last_attacker = self
            .store
            .last_attacker(code)
            .await
            .map_err(map_store_err)?;
        Ok(LogsResponse {
            logs,
            last_attacker,
        })
    }
}
