//! The fallback path: the same operations straight against the store.

use std::sync::Arc;

use duelgate_battle::{BattleService, LobbyService};
use duelgate_protocol::{
    AttackRequest, AttackResponse, CreateRoomRequest, CreateRoomResponse,
    LogsResponse, RoomCode, StatusResponse, UpdateLobbyRequest,
    UpdateLobbyResponse,
};
use duelgate_store::MatchStore;

use crate::{GatewayApi, GatewayError};

/// The direct tier: in-process services over the shared store. Not a
/// cache of the primary path but the same ground truth reached without
/// the request layer in between.
pub struct DirectGateway {
    lobby: LobbyService,
    battle: BattleService,
}

impl DirectGateway {
    pub fn new(store: Arc<MatchStore>) -> Self {
        Self {
            lobby: LobbyService::new(Arc::clone(&store)),
            battle: BattleService::new(store),
        }
    }
}

impl GatewayApi for DirectGateway {
    async fn create_room(
        &self,
        req: CreateRoomRequest,
    ) -> Result<CreateRoomResponse, GatewayError> {
        let room = self.lobby.create(req).await?;
        Ok(CreateRoomResponse {
            code: room.code.clone(),
            data: room,
        })
    }

    async fn update_lobby(
        &self,
        req: UpdateLobbyRequest,
    ) -> Result<UpdateLobbyResponse, GatewayError> {
        Ok(self.lobby.update(req).await?)
    }

    async fn battle_status(
        &self,
        code: &RoomCode,
    ) -> Result<StatusResponse, GatewayError> {
        Ok(self.battle.status(code).await?)
    }

    async fn attack(
        &self,
        req: AttackRequest,
    ) -> Result<AttackResponse, GatewayError> {
        let outcome = self.battle.attack(&req).await?;
        Ok(AttackResponse {
            success: true,
            new_health: outcome.new_health,
            target_player: outcome.target_player,
            game_over: outcome.game_over,
        })
    }

    async fn battle_logs(
        &self,
        code: &RoomCode,
        limit: Option<usize>,
    ) -> Result<LogsResponse, GatewayError> {
        Ok(self.battle.logs(code, limit).await?)
    }
}
