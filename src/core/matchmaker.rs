//! Matchmaking queue with timeout eviction
//! Strict FIFO: the longest waiting player is always paired first

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Guard for a pending eviction task; aborts the task when dropped,
/// so cancellation is atomic with removing the entry that owns it
pub struct EvictionTimer {
    handle: JoinHandle<()>,
}

impl EvictionTimer {
    pub fn new(handle: JoinHandle<()>) -> Self {
        Self { handle }
    }
}

impl Drop for EvictionTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A queued identity waiting to be paired.
/// The entry id distinguishes this enqueue from any earlier or later
/// enqueue by the same identity, so a stale timer cannot evict a
/// fresh entry.
pub struct WaitingEntry {
    pub player_id: String,
    pub entry_id: Uuid,
    pub enqueued_at: DateTime<Utc>,
    _timer: EvictionTimer,
}

impl WaitingEntry {
    pub fn new(player_id: String, entry_id: Uuid, timer: EvictionTimer) -> Self {
        Self {
            player_id,
            entry_id,
            enqueued_at: Utc::now(),
            _timer: timer,
        }
    }
}

/// Ordered set of identities waiting for an opponent
pub struct Matchmaker {
    queue: VecDeque<WaitingEntry>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, entry: WaitingEntry) {
        self.queue.push_back(entry);
    }

    /// Pop the entry that has waited longest
    pub fn pop_oldest(&mut self) -> Option<WaitingEntry> {
        self.queue.pop_front()
    }

    /// Remove an identity from the queue; absent entries are a no-op.
    /// Dropping the returned entry cancels its eviction timer.
    pub fn remove(&mut self, player_id: &str) -> Option<WaitingEntry> {
        let index = self
            .queue
            .iter()
            .position(|entry| entry.player_id == player_id)?;
        self.queue.remove(index)
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.queue.iter().any(|entry| entry.player_id == player_id)
    }

    /// Entry id currently queued for this identity, if any
    pub fn entry_id_of(&self, player_id: &str) -> Option<Uuid> {
        self.queue
            .iter()
            .find(|entry| entry.player_id == player_id)
            .map(|entry| entry.entry_id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
