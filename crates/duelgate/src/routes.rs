//! HTTP handlers for the lobby and battle endpoints.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use duelgate_protocol::{
    AttackRequest, AttackResponse, CreateRoomRequest, CreateRoomResponse,
    LogsQuery, LogsResponse, RoomQuery, StatusResponse, UpdateLobbyRequest,
    UpdateLobbyResponse,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::extract::{ApiJson, ApiQuery};
use crate::ws::realtime_handler;
use crate::{ApiError, AppState};

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/lobby", post(create_lobby).patch(update_lobby))
        .route("/battle/status", get(battle_status))
        .route("/battle/attack", post(battle_attack))
        .route("/battle/logs", get(battle_logs))
        .route("/realtime", get(realtime_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn create_lobby(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateRoomRequest>,
) -> Result<Json<CreateRoomResponse>, ApiError> {
    let room = state.lobby.create(req).await?;
    Ok(Json(CreateRoomResponse {
        code: room.code.clone(),
        data: room,
    }))
}

async fn update_lobby(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UpdateLobbyRequest>,
) -> Result<Json<UpdateLobbyResponse>, ApiError> {
    Ok(Json(state.lobby.update(req).await?))
}

async fn battle_status(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RoomQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    Ok(Json(state.battle.status(&query.room_code).await?))
}

async fn battle_attack(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AttackRequest>,
) -> Result<Json<AttackResponse>, ApiError> {
    let outcome = state.battle.attack(&req).await?;
    Ok(Json(AttackResponse {
        success: true,
        new_health: outcome.new_health,
        target_player: outcome.target_player,
        game_over: outcome.game_over,
    }))
}

async fn battle_logs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LogsQuery>,
) -> Result<Json<LogsResponse>, ApiError> {
    Ok(Json(
        state.battle.logs(&query.room_code, query.limit).await?,
    ))
}
