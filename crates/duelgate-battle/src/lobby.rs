//! The lobby lifecycle: create, join, leave, start.

use std::sync::Arc;

use duelgate_protocol::{
    AttackRange, CreateRoomRequest, Fighter, GameError, LobbyAction,
    PlayerRef, Room, RoomCode, UpdateLobbyRequest, UpdateLobbyResponse,
};
use duelgate_store::{LeaveOutcome, MatchStore, StoreError};

use crate::codes::{CodeSource, RandomCodes, MAX_CODE_ATTEMPTS};
use crate::map_store_err;

/// Health a fighter enters with when the request does not say.
pub const DEFAULT_HEALTH: u32 = 100;

/// Attack range a fighter declares when the request does not say.
pub const DEFAULT_ATTACK_RANGE: AttackRange = AttackRange { min: 20, max: 80 };

/// Room lifecycle operations over an injected store handle.
///
/// Generic over the code source so tests can script collisions; the
/// default draws random codes.
pub struct LobbyService<C: CodeSource = RandomCodes> {
    store: Arc<MatchStore>,
    codes: C,
}

impl LobbyService<RandomCodes> {
    pub fn new(store: Arc<MatchStore>) -> Self {
        Self::with_code_source(store, RandomCodes)
    }
}

impl<C: CodeSource> LobbyService<C> {
    pub fn with_code_source(store: Arc<MatchStore>, codes: C) -> Self {
        Self { store, codes }
    }

    /// Creates a room for `player_address` and hands back the fresh
    /// room, code included.
    ///
    /// Allocation and creation are one conditional insert: draw a
    /// candidate, attempt the insert, redraw on an active collision.
    /// After [`MAX_CODE_ATTEMPTS`] failed candidates the whole create
    /// fails with `GenerationExhausted`; the caller may retry later.
    pub async fn create(
        &self,
        req: CreateRoomRequest,
    ) -> Result<Room, GameError> {
        let fighter = fighter_from(
            req.player_address,
            req.display_name,
            req.health,
            req.attack_range,
        )?;

        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = self.codes.next_code();
            let room = Room::new(code.clone(), fighter.clone());
            match self.store.insert_room(room.clone()).await {
                Ok(()) => {
                    tracing::info!(
                        %code,
                        player = %room.player_one.player,
                        "lobby created"
                    );
                    return Ok(room);
                }
                Err(StoreError::CodeTaken(code)) => {
                    tracing::debug!(%code, "code collision, redrawing");
                }
                Err(err) => return Err(map_store_err(err)),
            }
        }

        tracing::warn!("code allocation exhausted after {MAX_CODE_ATTEMPTS} attempts");
        Err(GameError::generation_exhausted(MAX_CODE_ATTEMPTS))
    }

    /// Seats a second fighter; the room advances to `ready`.
    pub async fn join(
        &self,
        code: &RoomCode,
        player: PlayerRef,
        display_name: Option<String>,
        health: Option<u32>,
        attack_range: Option<AttackRange>,
    ) -> Result<Room, GameError> {
        let fighter = fighter_from(player, display_name, health, attack_range)?;
        self.store
            .join_room(code, fighter)
            .await
            .map_err(map_store_err)
    }

    /// Removes a participant. See the store for the exact semantics;
    /// leaves are idempotent and never fail for non-participants.
    pub async fn leave(
        &self,
        code: &RoomCode,
        player: &PlayerRef,
    ) -> Result<LeaveOutcome, GameError> {
        if player.is_empty() {
            return Err(GameError::validation("playerAddress is required"));
        }
        self.store
            .leave_room(code, player)
            .await
            .map_err(map_store_err)
    }

    /// Client-driven `ready` to `playing` transition, idempotent once
    /// the match is running.
    pub async fn start(&self, code: &RoomCode) -> Result<Room, GameError> {
        self.store.start_room(code).await.map_err(map_store_err)
    }

    /// Dispatches a `PATCH /lobby` body to [`join`](Self::join) or
    /// [`leave`](Self::leave) and shapes the wire response.
    pub async fn update(
        &self,
        req: UpdateLobbyRequest,
    ) -> Result<UpdateLobbyResponse, GameError> {
        match req.action {
            LobbyAction::Join => {
                let room = self
                    .join(
                        &req.code,
                        req.player_address,
                        req.display_name,
                        req.health,
                        req.attack_range,
                    )
                    .await?;
                Ok(UpdateLobbyResponse::Joined { data: room })
            }
            LobbyAction::Leave => {
                let outcome =
                    self.leave(&req.code, &req.player_address).await?;
                let message = match outcome {
                    LeaveOutcome::Deleted => {
                        format!("room {} closed", req.code)
                    }
                    LeaveOutcome::Reverted(_) | LeaveOutcome::NoOp(_) => {
                        format!("left room {}", req.code)
                    }
                };
                Ok(UpdateLobbyResponse::Left { message })
            }
        }
    }
}

/// Builds a fighter from wire-level parts, applying the standard sheet
/// where the request is silent.
fn fighter_from(
    player: PlayerRef,
    display_name: Option<String>,
    health: Option<u32>,
    attack_range: Option<AttackRange>,
) -> Result<Fighter, GameError> {
    if player.is_empty() {
        return Err(GameError::validation("playerAddress is required"));
    }
    let health = health.unwrap_or(DEFAULT_HEALTH);
    if health == 0 {
        return Err(GameError::validation("health must be positive"));
    }
    let attack_range = match attack_range {
        Some(range) => {
            range.validate()?;
            range
        }
        None => DEFAULT_ATTACK_RANGE,
    };
    Ok(Fighter {
        player,
        display_name,
        health,
        attack_range,
    })
}
