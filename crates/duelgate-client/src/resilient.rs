//! The two-tier wrapper: primary first, direct path on transport loss.

use duelgate_protocol::{
    AttackRequest, AttackResponse, CreateRoomRequest, CreateRoomResponse,
    LogsResponse, RoomCode, StatusResponse, UpdateLobbyRequest,
    UpdateLobbyResponse,
};

use crate::{GatewayApi, GatewayError};

/// Tries `primary`; on a transport-level failure, retries exactly once
/// via `fallback`. Domain errors pass through untouched on either tier.
///
/// Keeps gameplay alive when the request layer is down but the store
/// is not. The one-retry bound matters: the fallback is the same
/// ground truth, so if it also fails there is nothing further to try.
/// And only transport failures qualify, because replaying a `Conflict`
/// through another path would apply a now-illegal move.
pub struct Resilient<P, F> {
    primary: P,
    fallback: F,
}

impl<P: GatewayApi, F: GatewayApi> Resilient<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    fn note_fallback(op: &str, reason: &str) {
        tracing::warn!(op, reason, "primary path failed, taking direct store path");
    }
}

impl<P: GatewayApi, F: GatewayApi> GatewayApi for Resilient<P, F> {
    async fn create_room(
        &self,
        req: CreateRoomRequest,
    ) -> Result<CreateRoomResponse, GatewayError> {
        match self.primary.create_room(req.clone()).await {
            Err(GatewayError::Transport(reason)) => {
                Self::note_fallback("create_room", &reason);
                self.fallback.create_room(req).await
            }
            other => other,
        }
    }

    async fn update_lobby(
        &self,
        req: UpdateLobbyRequest,
    ) -> Result<UpdateLobbyResponse, GatewayError> {
        match self.primary.update_lobby(req.clone()).await {
            Err(GatewayError::Transport(reason)) => {
                Self::note_fallback("update_lobby", &reason);
                self.fallback.update_lobby(req).await
            }
            other => other,
        }
    }

    async fn battle_status(
        &self,
        code: &RoomCode,
    ) -> Result<StatusResponse, GatewayError> {
        match self.primary.battle_status(code).await {
            Err(GatewayError::Transport(reason)) => {
                Self::note_fallback("battle_status", &reason);
                self.fallback.battle_status(code).await
            }
            other => other,
        }
    }

    async fn attack(
        &self,
        req: AttackRequest,
    ) -> Result<AttackResponse, GatewayError> {
        match self.primary.attack(req.clone()).await {
            Err(GatewayError::Transport(reason)) => {
                Self::note_fallback("attack", &reason);
                self.fallback.attack(req).await
            }
            other => other,
        }
    }

    async fn battle_logs(
        &self,
        code: &RoomCode,
        limit: Option<usize>,
    ) -> Result<LogsResponse, GatewayError> {
        match self.primary.battle_logs(code, limit).await {
            Err(GatewayError::Transport(reason)) => {
                Self::note_fallback("battle_logs", &reason);
                self.fallback.battle_logs(code, limit).await
            }
            other => other,
        }
    }
}
