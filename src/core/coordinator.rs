//! Aggregate state behind the dispatcher boundary
//!
//! Owns the registry, the waiting queue and the session store. Every
//! operation takes `&mut self` and never awaits, so one write guard
//! covers each full check-then-act sequence and no handler can observe
//! a stale precondition. Outbound delivery goes through unbounded
//! channels whose send is synchronous, keeping sends inside the guard.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, info};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;
use warp::ws::Message;

use crate::constants::{ANONYMOUS_NAME, SEARCHING_MESSAGE, SEARCH_TIMEOUT_MESSAGE};
use crate::core::game::{GameSession, Symbol};
use crate::core::matchmaker::{EvictionTimer, Matchmaker, WaitingEntry};
use crate::core::message_types::ServerMessage;
use crate::core::registry::Registry;
use crate::error::{GridMatchError, Result};

pub struct Coordinator {
    registry: Registry,
    matchmaker: Matchmaker,
    sessions: HashMap<String, GameSession>,
    search_timeout: Duration,
}

// Thread-safe coordinator wrapper
pub type SharedCoordinator = Arc<RwLock<Coordinator>>;

// Create a new thread-safe coordinator
pub fn create_coordinator(search_timeout: Duration) -> SharedCoordinator {
    Arc::new(RwLock::new(Coordinator::new(search_timeout)))
}

/// Arm the eviction task for a queue entry about to be created.
///
/// The task re-validates under the write guard that the same entry is
/// still queued before evicting, so a timer that outlives its entry
/// fires as a no-op.
pub fn spawn_eviction_timer(
    coordinator: SharedCoordinator,
    player_id: String,
    entry_id: Uuid,
) -> EvictionTimer {
    let handle = tokio::spawn(async move {
        let timeout = { coordinator.read().await.search_timeout() };
        tokio::time::sleep(timeout).await;
        coordinator.write().await.expire_waiting(&player_id, entry_id);
    });
    EvictionTimer::new(handle)
}

impl Coordinator {
    pub fn new(search_timeout: Duration) -> Self {
        Self {
            registry: Registry::new(),
            matchmaker: Matchmaker::new(),
            sessions: HashMap::new(),
            search_timeout,
        }
    }

    pub fn search_timeout(&self) -> Duration {
        self.search_timeout
    }

    /// Admit a fresh connection: allocate its identity, confirm it to the
    /// client and publish the new online count
    pub fn connect(&mut self, sender: mpsc::UnboundedSender<Message>) -> String {
        let player_id = self.registry.register(sender);
        self.registry.send_to(
            &player_id,
            &ServerMessage::Connected {
                user_id: player_id.clone(),
            },
        );
        self.broadcast_user_count();
        player_id
    }

    /// Set a display name, then queue for a match in the same step
    pub fn register(
        &mut self,
        player_id: &str,
        username: &str,
        entry_id: Uuid,
        timer: EvictionTimer,
    ) -> Result<()> {
        self.registry.set_display_name(player_id, username)?;
        info!("Client {} registered as {}", player_id, username);
        self.broadcast_user_count();
        self.find_game(player_id, entry_id, timer)
    }

    /// Queue for a match, or pair immediately with the longest waiter.
    ///
    /// `timer` must already be armed for `entry_id`; it is stored with
    /// the entry when the requester ends up waiting and dropped, which
    /// aborts the task, on every other path.
    pub fn find_game(
        &mut self,
        player_id: &str,
        entry_id: Uuid,
        timer: EvictionTimer,
    ) -> Result<()> {
        if self.session_of(player_id).is_some() {
            return Err(GridMatchError::GameStateError(
                "Already in an active game".to_string(),
            ));
        }

        // A repeated request keeps the original entry and its timer
        if self.matchmaker.contains(player_id) {
            self.registry.send_to(
                player_id,
                &ServerMessage::Searching {
                    message: SEARCHING_MESSAGE.to_string(),
                },
            );
            return Ok(());
        }

        match self.matchmaker.pop_oldest() {
            Some(waiting) => {
                let waited = Utc::now().signed_duration_since(waiting.enqueued_at);
                let session = GameSession::new(waiting.player_id.clone(), player_id.to_string());
                info!(
                    "Paired {} with {} in game {} after {}ms in queue",
                    waiting.player_id,
                    player_id,
                    session.id,
                    waited.num_milliseconds()
                );
                self.announce_pairing(&session);
                self.sessions.insert(session.id.clone(), session);
            }
            None => {
                self.registry.send_to(
                    player_id,
                    &ServerMessage::Searching {
                        message: SEARCHING_MESSAGE.to_string(),
                    },
                );
                self.matchmaker
                    .enqueue(WaitingEntry::new(player_id.to_string(), entry_id, timer));
                debug!("Client {} is waiting for an opponent", player_id);
            }
        }
        Ok(())
    }

    /// Apply a move in the caller's active session and notify both sides
    pub fn apply_move(&mut self, player_id: &str, row: usize, col: usize) -> Result<()> {
        let session = self
            .sessions
            .values_mut()
            .find(|session| session.has_player(player_id))
            .ok_or_else(|| GridMatchError::GameStateError("No active game".to_string()))?;

        let symbol = session.apply_move(player_id, row, col)?;
        let game_id = session.id.clone();
        let next_turn = session.current_turn.clone();
        let participants = [session.player_x.clone(), session.player_o.clone()];

        debug!(
            "Game {}: {} placed {:?} at ({}, {})",
            game_id, player_id, symbol, row, col
        );

        for participant in &participants {
            self.registry.send_to(
                participant,
                &ServerMessage::Move {
                    row,
                    col,
                    symbol,
                    next_turn: *participant == next_turn,
                },
            );
        }
        Ok(())
    }

    /// Tear down everything associated with a departing identity:
    /// active session, waiting entry and registry record, in that order
    pub fn disconnect(&mut self, player_id: &str) {
        let session_id = self
            .sessions
            .iter()
            .find(|(_, session)| session.has_player(player_id))
            .map(|(id, _)| id.clone());

        if let Some(session_id) = session_id {
            if let Some(mut session) = self.sessions.remove(&session_id) {
                session.abandon();
                if let Some(opponent) = session.opponent_of(player_id) {
                    self.registry.send_to(opponent, &ServerMessage::OpponentLeft);
                }
                info!("Game {} abandoned after {} left", session_id, player_id);
            }
        }

        if self.matchmaker.remove(player_id).is_some() {
            debug!("Removed waiting entry for departing client {}", player_id);
        }

        self.registry.remove(player_id);
        self.broadcast_user_count();
    }

    /// Evict a waiting entry when its timer fires, if it still is the
    /// entry the timer was armed for
    pub fn expire_waiting(&mut self, player_id: &str, entry_id: Uuid) {
        if self.matchmaker.entry_id_of(player_id) != Some(entry_id) {
            debug!("Ignoring stale eviction timer for {}", player_id);
            return;
        }
        self.matchmaker.remove(player_id);
        self.registry.send_to(
            player_id,
            &ServerMessage::SearchTimeout {
                message: SEARCH_TIMEOUT_MESSAGE.to_string(),
            },
        );
        info!("Search timed out for {}", player_id);
    }

    /// Convert a rejected request into a client-visible error reply
    pub fn send_error(&self, player_id: &str, error: &GridMatchError) {
        self.registry.send_to(
            player_id,
            &ServerMessage::Error {
                message: error.to_string(),
            },
        );
    }

    pub fn client_count(&self) -> usize {
        self.registry.client_count()
    }

    pub fn waiting_count(&self) -> usize {
        self.matchmaker.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_waiting(&self, player_id: &str) -> bool {
        self.matchmaker.contains(player_id)
    }

    /// The session this identity participates in, if any.
    /// Linear scan; fine at the session counts this server handles.
    pub fn session_of(&self, player_id: &str) -> Option<&GameSession> {
        self.sessions
            .values()
            .find(|session| session.has_player(player_id))
    }

    fn announce_pairing(&self, session: &GameSession) {
        let x_name = self.display_name_or_anonymous(&session.player_x);
        let o_name = self.display_name_or_anonymous(&session.player_o);

        self.registry.send_to(
            &session.player_x,
            &ServerMessage::GameStart {
                game_id: session.id.clone(),
                opponent: o_name,
                symbol: Symbol::X,
            },
        );
        self.registry.send_to(
            &session.player_o,
            &ServerMessage::GameStart {
                game_id: session.id.clone(),
                opponent: x_name,
                symbol: Symbol::O,
            },
        );
    }

    fn display_name_or_anonymous(&self, player_id: &str) -> String {
        self.registry
            .display_name(player_id)
            .unwrap_or(ANONYMOUS_NAME)
            .to_string()
    }

    fn broadcast_user_count(&self) {
        let count = self.registry.public_count();
        self.registry.broadcast(&ServerMessage::UserCount { count });
    }
}
