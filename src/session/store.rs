use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::errors::SessionError;
use super::models::{PlayerSession, ServerStats};
use crate::shared::{Clock, PlayerId, SystemClock};

/// Trait for session store operations
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Opens a session for `player_id` and counts it as served
    async fn on_join(&self, player_id: PlayerId) -> Result<PlayerSession, SessionError>;

    /// Closes the session for `player_id`, returning it if one existed
    async fn on_leave(&self, player_id: PlayerId) -> Option<PlayerSession>;

    /// Adds one elimination to `attacker_id` and returns the new total
    async fn record_kill(&self, attacker_id: PlayerId) -> Result<u32, SessionError>;

    /// Snapshot of the session for `player_id`
    async fn get_session(&self, player_id: PlayerId) -> Result<PlayerSession, SessionError>;

    /// Number of sessions currently open
    async fn active_sessions(&self) -> usize;

    /// Closes every open session, returning how many were dropped
    ///
    /// The served counter is cumulative and is left untouched.
    async fn clear(&self) -> usize;

    fn stats(&self) -> ServerStats;
}

/// In-memory session store
///
/// Every read and mutation goes through one `RwLock` over the session map, so an
/// increment and the read of its result for a player can never interleave with
/// another operation. The served counter is bumped while the write lock is held,
/// which keeps it at or above the number of open sessions at all times.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<PlayerId, PlayerSession>>,
    total_players_served: AtomicU64,
    clock: Arc<dyn Clock>,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl InMemorySessionStore {
    /// Creates a new empty store that stamps sessions with `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            total_players_served: AtomicU64::new(0),
            clock,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    #[instrument(skip(self))]
    async fn on_join(&self, player_id: PlayerId) -> Result<PlayerSession, SessionError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&player_id) {
            warn!(player_id, "Session already exists, keeping the existing one");
            return Err(SessionError::DuplicateSession(player_id));
        }

        let session = PlayerSession::new(player_id, self.clock.now());
        sessions.insert(player_id, session.clone());
        let served = self.total_players_served.fetch_add(1, Ordering::SeqCst) + 1;

        debug!(player_id, total_players_served = served, "Session opened");
        Ok(session)
    }

    #[instrument(skip(self))]
    async fn on_leave(&self, player_id: PlayerId) -> Option<PlayerSession> {
        let removed = self.sessions.write().await.remove(&player_id);

        match &removed {
            Some(session) => {
                debug!(player_id, kill_count = session.kill_count, "Session closed")
            }
            None => debug!(player_id, "No session to close"),
        }

        removed
    }

    #[instrument(skip(self))]
    async fn record_kill(&self, attacker_id: PlayerId) -> Result<u32, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&attacker_id)
            .ok_or(SessionError::NoSuchSession(attacker_id))?;

        session.kill_count = session.kill_count.saturating_add(1);

        debug!(player_id = attacker_id, kill_count = session.kill_count, "Kill recorded");
        Ok(session.kill_count)
    }

    async fn get_session(&self, player_id: PlayerId) -> Result<PlayerSession, SessionError> {
        self.sessions
            .read()
            .await
            .get(&player_id)
            .cloned()
            .ok_or(SessionError::NotFound(player_id))
    }

    async fn active_sessions(&self) -> usize {
        self.sessions.read().await.len()
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let closed = sessions.len();
        sessions.clear();

        debug!(closed, "Cleared all sessions");
        closed
    }

    fn stats(&self) -> ServerStats {
        ServerStats {
            total_players_served: self.total_players_served.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::ManualClock;

    fn store() -> InMemorySessionStore {
        InMemorySessionStore::new(Arc::new(ManualClock::default()))
    }

    #[tokio::test]
    async fn test_join_creates_session_and_counts_served() {
        let store = store();

        let session = store.on_join(1).await.unwrap();

        assert_eq!(session.kill_count, 0);
        assert_eq!(store.get_session(1).await.unwrap(), session);
        assert_eq!(store.stats().total_players_served, 1);
        assert_eq!(store.active_sessions().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_join_keeps_existing_session() {
        let store = store();
        store.on_join(1).await.unwrap();
        store.record_kill(1).await.unwrap();

        let result = store.on_join(1).await;

        assert_eq!(result, Err(SessionError::DuplicateSession(1)));
        assert_eq!(store.get_session(1).await.unwrap().kill_count, 1);
        assert_eq!(store.stats().total_players_served, 1);
    }

    #[tokio::test]
    async fn test_leave_removes_session_but_not_served_count() {
        let store = store();
        store.on_join(1).await.unwrap();

        let removed = store.on_leave(1).await;

        assert!(removed.is_some());
        assert_eq!(store.get_session(1).await, Err(SessionError::NotFound(1)));
        assert_eq!(store.stats().total_players_served, 1);
    }

    #[tokio::test]
    async fn test_leave_without_session_is_noop() {
        let store = store();

        assert!(store.on_leave(42).await.is_none());
        assert_eq!(store.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn test_record_kill_increments_only_attacker() {
        let store = store();
        store.on_join(1).await.unwrap();
        store.on_join(2).await.unwrap();

        assert_eq!(store.record_kill(1).await, Ok(1));
        assert_eq!(store.record_kill(1).await, Ok(2));

        assert_eq!(store.get_session(2).await.unwrap().kill_count, 0);
    }

    #[tokio::test]
    async fn test_record_kill_without_session() {
        let store = store();

        assert_eq!(store.record_kill(9).await, Err(SessionError::NoSuchSession(9)));
        assert_eq!(store.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn test_joined_at_uses_clock() {
        let clock = Arc::new(ManualClock::default());
        let store = InMemorySessionStore::new(clock.clone());
        let expected = clock.now();

        let session = store.on_join(5).await.unwrap();
        clock.advance(chrono::Duration::minutes(3));

        assert_eq!(session.joined_at, expected);
        assert_eq!(store.get_session(5).await.unwrap().joined_at, expected);
    }

    #[tokio::test]
    async fn test_concurrent_kills_are_not_lost() {
        let store = Arc::new(store());
        store.on_join(1).await.unwrap();

        let mut tasks = Vec::new();
        for _ in 0..50 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move { store.record_kill(1).await }));
        }

        let mut counts = Vec::new();
        for task in tasks {
            counts.push(task.await.unwrap().unwrap());
        }
        counts.sort_unstable();

        // Every increment observed a distinct value
        assert_eq!(counts, (1..=50).collect::<Vec<u32>>());
        assert_eq!(store.get_session(1).await.unwrap().kill_count, 50);
    }

    #[tokio::test]
    async fn test_concurrent_joins_count_every_player() {
        let store = Arc::new(store());

        let mut tasks = Vec::new();
        for id in 1..=20 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move { store.on_join(id).await }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(store.stats().total_players_served, 20);
        assert_eq!(store.active_sessions().await, 20);
    }

    #[tokio::test]
    async fn test_clear_closes_sessions_but_keeps_served_count() {
        let store = store();
        store.on_join(1).await.unwrap();
        store.on_join(2).await.unwrap();

        assert_eq!(store.clear().await, 2);

        assert_eq!(store.active_sessions().await, 0);
        assert!(store.get_session(1).await.is_err());
        assert_eq!(store.stats().total_players_served, 2);
        assert_eq!(store.clear().await, 0);
    }
}
