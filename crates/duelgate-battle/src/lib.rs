//! The operations layer: every write to a match goes through here.
//!
//! - [`LobbyService`] owns the room lifecycle: create (with code
//!   allocation folded into the conditional insert), join, leave, start.
//! - [`BattleService`] owns combat: the attack call that rides the
//!   store's compare-and-set transaction, plus the status and log reads.
//!
//! Both services hold an injected [`MatchStore`] handle and translate
//! store errors into the wire taxonomy before anything crosses a
//! contract boundary.

mod codes;
mod lobby;
mod resolver;

pub use codes::{random_code, CodeSource, RandomCodes, MAX_CODE_ATTEMPTS};
pub use lobby::{LobbyService, DEFAULT_ATTACK_RANGE, DEFAULT_HEALTH};
pub use resolver::BattleService;

use duelgate_protocol::GameError;
use duelgate_store::StoreError;

/// Maps a store failure onto the wire taxonomy. `CodeTaken` is handled
/// inside the allocation loop and is mapped as a conflict only if it
/// ever escapes one.
fn map_store_err(err: StoreError) -> GameError {
    match err {
        StoreError::NotFound(code) => GameError::not_found(&code),
        StoreError::RoomFull(code) => {
            GameError::conflict(format!("room {code} is full"))
        }
        StoreError::CodeTaken(_)
        | StoreError::NotParticipant(..)
        | StoreError::OutOfTurn(..) => GameError::conflict(err.to_string()),
        StoreError::InvalidState(msg) => GameError::conflict(msg),
    }
}
