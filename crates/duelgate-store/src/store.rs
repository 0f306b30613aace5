//! The match store: room table, battle log, and per-room change feed.

use std::collections::HashMap;

use duelgate_protocol::{
    AttackOutcome, BattleLogEntry, Fighter, PlayerRef, Room, RoomCode,
    RoomEvent, RoomStatus,
};
use tokio::sync::{broadcast, Mutex};

use crate::StoreError;

/// Buffered events per room feed. A subscriber that falls more than
/// this far behind sees `Resync` instead of the missed events.
pub const FEED_CAPACITY: usize = 64;

/// What a `leave` did to the room.
#[derive(Debug, Clone, PartialEq)]
pub enum LeaveOutcome {
    /// The creator left; the room and its log are gone.
    Deleted,
    /// Player two left; the room reverted to `open`.
    Reverted(Room),
    /// The caller was not (or no longer) a participant. Leaves are
    /// idempotent, so this is a success, not an error.
    NoOp(Room),
}

/// Per-room slice of the battle log.
#[derive(Default)]
struct LogShard {
    entries: Vec<BattleLogEntry>,
    next_seq: u64,
}

struct Inner {
    rooms: HashMap<RoomCode, Room>,
    logs: HashMap<RoomCode, LogShard>,
    /// Change feeds, keyed by room code. Created lazily on first
    /// subscribe; a sender with no receivers is kept and written to
    /// anyway (the send result is ignored).
    feeds: HashMap<RoomCode, broadcast::Sender<RoomEvent>>,
}

impl Inner {
    fn room(&self, code: &RoomCode) -> Result<&Room, StoreError> {
        self.rooms
            .get(code)
            .ok_or_else(|| StoreError::NotFound(code.clone()))
    }

    fn emit(&self, code: &RoomCode, event: RoomEvent) {
        if let Some(tx) = self.feeds.get(code) {
            let _ = tx.send(event);
        }
    }
}

/// The single shared mutable resource of the system.
///
/// Constructed once by the process entry point and handed to each
/// component as an `Arc` (no module-level singletons). All mutations to
/// one room are totally ordered by the inner lock; no await happens
/// while it is held.
pub struct MatchStore {
    inner: Mutex<Inner>,
    feed_capacity: usize,
}

impl MatchStore {
    pub fn new() -> Self {
        Self::with_feed_capacity(FEED_CAPACITY)
    }

    /// A store whose feeds buffer `capacity` events. Mostly useful for
    /// exercising the lag path in tests.
    pub fn with_feed_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                rooms: HashMap::new(),
                logs: HashMap::new(),
                feeds: HashMap::new(),
            }),
            feed_capacity: capacity,
        }
    }

    // -----------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------

    /// Snapshot of the room at `code`.
    pub async fn room(&self, code: &RoomCode) -> Result<Room, StoreError> {
        let inner = self.inner.lock().await;
        inner.room(code).cloned()
    }

    /// The newest `limit` log entries for a room, newest first.
    pub async fn recent_logs(
        &self,
        code: &RoomCode,
        limit: usize,
    ) -> Result<Vec<BattleLogEntry>, StoreError> {
        let inner = self.inner.lock().await;
        inner.room(code)?;
        let entries = match inner.logs.get(code) {
            Some(shard) => {
                shard.entries.iter().rev().take(limit).cloned().collect()
            }
            None => Vec::new(),
        };
        Ok(entries)
    }

    /// Who moved last, if anyone has.
    pub async fn last_attacker(
        &self,
        code: &RoomCode,
    ) -> Result<Option<PlayerRef>, StoreError> {
        let inner = self.inner.lock().await;
        inner.room(code)?;
        Ok(inner
            .logs
            .get(code)
            .and_then(|shard| shard.entries.last())
            .map(|entry| entry.attacker.clone()))
    }

    /// Number of rooms currently held (terminal ones included until
    /// their code is recycled).
    pub async fn room_count(&self) -> usize {
        self.inner.lock().await.rooms.len()
    }

    /// Codes of all non-terminal rooms.
    pub async fn active_codes(&self) -> Vec<RoomCode> {
        let inner = self.inner.lock().await;
        inner
            .rooms
            .values()
            .filter(|r| !r.status.is_terminal())
            .map(|r| r.code.clone())
            .collect()
    }

    // -----------------------------------------------------------------
    // Change feed
    // -----------------------------------------------------------------

    /// Subscribes to a room's change feed. Subscribing before the room
    /// exists is allowed; events start flowing once something commits.
    pub async fn subscribe(
        &self,
        code: &RoomCode,
    ) -> broadcast::Receiver<RoomEvent> {
        let mut inner = self.inner.lock().await;
        let capacity = self.feed_capacity;
        inner
            .feeds
            .entry(code.clone())
            .or_insert_with(|| broadcast::channel(capacity).0)
            .subscribe()
    }

    // -----------------------------------------------------------------
    // Conditional writes
    // -----------------------------------------------------------------

    /// Inserts a new room if its code is free.
    ///
    /// "Free" means no room, or a terminal one: a `Completed` room is
    /// evicted (along with its stale log) so its code can be recycled.
    /// An active occupant fails the insert with [`StoreError::CodeTaken`],
    /// which is what drives the allocation retry loop. There is no
    /// separate check-then-act window.
    pub async fn insert_room(&self, room: Room) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().await;
        let code = room.code.clone();

        if let Some(existing) = inner.rooms.get(&code) {
            if !existing.status.is_terminal() {
                return Err(StoreError::CodeTaken(code));
            }
            inner.logs.remove(&code);
        }

        inner.rooms.insert(code.clone(), room.clone());
        inner.emit(&code, RoomEvent::Room(room));
        tracing::info!(%code, "room created");
        Ok(())
    }

    /// Seats `fighter` as player two and advances the room to `ready`.
    pub async fn join_room(
        &self,
        code: &RoomCode,
        fighter: Fighter,
    ) -> Result<Room, StoreError> {
        let mut inner = self.inner.lock().await;
        let room = inner.room(code)?;

        if room.player_one.player == fighter.player {
            return Err(StoreError::InvalidState(format!(
                "player {} created room {code} and cannot join it",
                fighter.player
            )));
        }
        if room.player_two.is_some() {
            return Err(StoreError::RoomFull(code.clone()));
        }
        if !room.status.is_joinable() {
            return Err(StoreError::InvalidState(format!(
                "room {code} is not joinable while {}",
                room.status
            )));
        }

        let player = fighter.player.clone();
        let room = inner
            .rooms
            .get_mut(code)
            .expect("room looked up above");
        room.player_two = Some(fighter);
        room.status = RoomStatus::Ready;
        let snapshot = room.clone();

        inner.emit(code, RoomEvent::Room(snapshot.clone()));
        tracing::info!(%code, %player, "player joined, room ready");
        Ok(snapshot)
    }

    /// `ready` to `playing`; a no-op when the match already started.
    pub async fn start_room(
        &self,
        code: &RoomCode,
    ) -> Result<Room, StoreError> {
        let mut inner = self.inner.lock().await;
        let status = inner.room(code)?.status;

        match status {
            RoomStatus::Playing => inner.room(code).cloned(),
            RoomStatus::Ready => {
                let room = inner
                    .rooms
                    .get_mut(code)
                    .expect("room looked up above");
                room.status = RoomStatus::Playing;
                let snapshot = room.clone();
                inner.emit(code, RoomEvent::Room(snapshot.clone()));
                tracing::info!(%code, "match started");
                Ok(snapshot)
            }
            status => Err(StoreError::InvalidState(format!(
                "room {code} cannot start while {status}"
            ))),
        }
    }

    /// Removes `player` from the room.
    ///
    /// The creator leaving deletes the room outright; no partial state
    /// survives. Player two leaving reverts the room to `open` with a
    /// cleared log and the turn back on player one, so the next match
    /// at this code starts clean. Anyone else leaving is a no-op.
    pub async fn leave_room(
        &self,
        code: &RoomCode,
        player: &PlayerRef,
    ) -> Result<LeaveOutcome, StoreError> {
        let mut inner = self.inner.lock().await;
        let room = inner.room(code)?.clone();

        if room.player_one.player == *player {
            inner.rooms.remove(code);
            inner.logs.remove(code);
            inner.emit(code, RoomEvent::RoomDeleted(code.clone()));
            // Dropping the sender closes the feed once subscribers have
            // drained the deletion event.
            inner.feeds.remove(code);
            tracing::info!(%code, %player, "creator left, room deleted");
            return Ok(LeaveOutcome::Deleted);
        }

        let is_player_two = room
            .player_two
            .as_ref()
            .is_some_and(|f| f.player == *player);
        if !is_player_two || room.status.is_terminal() {
            return Ok(LeaveOutcome::NoOp(room));
        }

        inner.logs.remove(code);
        let room = inner
            .rooms
            .get_mut(code)
            .expect("room looked up above");
        room.player_two = None;
        room.status = RoomStatus::Open;
        room.current_turn = Some(room.player_one.player.clone());
        let snapshot = room.clone();

        inner.emit(code, RoomEvent::Room(snapshot.clone()));
        tracing::info!(%code, %player, "player two left, room reopened");
        Ok(LeaveOutcome::Reverted(snapshot))
    }

    /// The attack transaction: turn check, log append, health write,
    /// turn swap, and completion detection as one conditional operation.
    ///
    /// The compare-and-set on `current_turn` is what makes two
    /// simultaneous attacks safe: both may read the same state, but the
    /// lock serializes their commits and the second one's expected turn
    /// no longer matches. At most one of two racing calls succeeds.
    pub async fn commit_attack(
        &self,
        code: &RoomCode,
        attacker: &PlayerRef,
        damage: u32,
    ) -> Result<AttackOutcome, StoreError> {
        let mut inner = self.inner.lock().await;
        let room = inner.room(code)?;

        match room.status {
            RoomStatus::Playing | RoomStatus::Ready => {}
            status => {
                return Err(StoreError::InvalidState(format!(
                    "room {code} is not in combat while {status}"
                )));
            }
        }
        if !room.is_participant(attacker) {
            return Err(StoreError::NotParticipant(
                attacker.clone(),
                code.clone(),
            ));
        }
        match &room.current_turn {
            Some(turn) if turn == attacker => {}
            _ => {
                return Err(StoreError::OutOfTurn(
                    attacker.clone(),
                    code.clone(),
                ));
            }
        }
        let defender = room
            .opponent_of(attacker)
            .ok_or_else(|| {
                StoreError::InvalidState(format!(
                    "room {code} has no opponent to attack"
                ))
            })?
            .player
            .clone();

        // Checks passed; commit everything before releasing the lock.
        let shard = inner.logs.entry(code.clone()).or_default();
        shard.next_seq += 1;
        let entry = BattleLogEntry {
            room_code: code.clone(),
            attacker: attacker.clone(),
            damage,
            seq: shard.next_seq,
        };
        shard.entries.push(entry.clone());

        let room = inner
            .rooms
            .get_mut(code)
            .expect("room looked up above");
        // A first strike while both clients are still counting down
        // starts the match; the store is the arbiter of that race.
        if room.status == RoomStatus::Ready {
            room.status = RoomStatus::Playing;
        }

        let target = room
            .fighter_mut(&defender)
            .expect("defender resolved above");
        let new_health = target.health.saturating_sub(damage);
        target.health = new_health;

        let game_over = new_health == 0;
        if game_over {
            room.status = RoomStatus::Completed;
            room.current_turn = None;
        } else {
            room.current_turn = Some(defender.clone());
        }
        let snapshot = room.clone();

        inner.emit(code, RoomEvent::Room(snapshot));
        inner.emit(code, RoomEvent::Log(entry));
        tracing::info!(
            %code,
            %attacker,
            damage,
            new_health,
            game_over,
            "attack applied"
        );

        Ok(AttackOutcome {
            new_health,
            target_player: defender,
            game_over,
        })
    }
}

impl Default for MatchStore {
    fn default() -> Self {
        Self::new()
    }
}
