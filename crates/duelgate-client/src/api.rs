//! The one contract both facade tiers implement.

use duelgate_protocol::{
    AttackRequest, AttackResponse, CreateRoomRequest, CreateRoomResponse,
    GameError, LogsResponse, RoomCode, StatusResponse, UpdateLobbyRequest,
    UpdateLobbyResponse,
};

/// A failure surfaced by a gateway.
///
/// The split is what makes the fallback decision: `Game` is the
/// system answering "no", `Transport` is the system not answering.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// A domain failure with the exact wire taxonomy. Identical on
    /// both paths; never triggers a fallback.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The primary path could not be reached or did not produce a
    /// decodable answer.
    #[error("transport failure: {0}")]
    Transport(String),
}

impl GatewayError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// The five operations of the battle surface, one contract over both
/// execution paths.
pub trait GatewayApi {
    async fn create_room(
        &self,
        req: CreateRoomRequest,
    ) -> Result<CreateRoomResponse, GatewayError>;

    async fn update_lobby(
        &self,
        req: UpdateLobbyRequest,
    ) -> Result<UpdateLobbyResponse, GatewayError>;

    async fn battle_status(
        &self,
        code: &RoomCode,
    ) -> Result<StatusResponse, GatewayError>;

    async fn attack(
        &self,
        req: AttackRequest,
    ) -> Result<AttackResponse, GatewayError>;

    async fn battle_logs(
        &self,
        code: &RoomCode,
        limit: Option<usize>,
    ) -> Result<LogsResponse, GatewayError>;
}
