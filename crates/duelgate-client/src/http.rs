//! The primary path: a JSON client against the HTTP surface.

use duelgate_protocol::{
    AttackRequest, AttackResponse, CreateRoomRequest, CreateRoomResponse,
    GameError, LogsResponse, RoomCode, StatusResponse, UpdateLobbyRequest,
    UpdateLobbyResponse,
};
use serde::de::DeserializeOwned;

use crate::{GatewayApi, GatewayError};

/// JSON client for the five battle endpoints.
pub struct HttpGateway {
    base: String,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Reuse an existing `reqwest::Client` (connection pool and all).
    pub fn with_client(
        base_url: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        let mut base = base_url.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Splits a response into the three cases that matter: a success
    /// body, a domain error body, or a transport failure.
    async fn decode<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = resp.status();
        if status.is_success() {
            return resp.json::<T>().await.map_err(transport);
        }
        let bytes = resp.bytes().await.map_err(transport)?;
        match serde_json::from_slice::<GameError>(&bytes) {
            // The server said no; that verdict is final on any path.
            Ok(err) => Err(GatewayError::Game(err)),
            // Gateway timeouts, proxy pages, half-written bodies: the
            // request layer itself is unwell.
            Err(_) => Err(GatewayError::Transport(format!(
                "unexpected {status} response from request layer"
            ))),
        }
    }
}

fn transport(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport(err.to_string())
}

impl GatewayApi for HttpGateway {
    async fn create_room(
        &self,
        req: CreateRoomRequest,
    ) -> Result<CreateRoomResponse, GatewayError> {
        let resp = self
            .client
            .post(self.url("/lobby"))
            .json(&req)
            .send()
            .await
            .map_err(transport)?;
        Self::decode(resp).await
    }

    async fn update_lobby(
        &self,
        req: UpdateLobbyRequest,
    ) -> Result<UpdateLobbyResponse, GatewayError> {
        let resp = self
            .client
            .patch(self.url("/lobby"))
            .json(&req)
            .send()
            .await
            .map_err(transport)?;
        Self::decode(resp).await
    }

    async fn battle_status(
        &self,
        code: &RoomCode,
    ) -> Result<StatusResponse, GatewayError> {
        let resp = self
            .client
            .get(self.url("/battle/status"))
            .query(&[("roomCode", code.as_str())])
            .send()
            .await
            .map_err(transport)?;
        Self::decode(resp).await
    }

    async fn attack(
        &self,
        req: AttackRequest,
    ) -> Result<AttackResponse, GatewayError> {
        let resp = self
            .client
            .post(self.url("/battle/attack"))
            .json(&req)
            .send()
            .await
            .map_err(transport)?;
        Self::decode(resp).await
    }

    async fn battle_logs(
        &self,
        code: &RoomCode,
        limit: Option<usize>,
    ) -> Result<LogsResponse, GatewayError> {
        let mut query = vec![("roomCode".to_owned(), code.to_string())];
        if let Some(limit) = limit {
            query.push(("limit".to_owned(), limit.to_string()));
        }
        let resp = self
            .client
            .get(self.url("/battle/logs"))
            .query(&query)
            .send()
            .await
            .map_err(transport)?;
        Self::decode(resp).await
    }
}
