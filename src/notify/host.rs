use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info};

use crate::shared::PlayerId;

/// A connected player as the host reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
    /// Round-trip latency in milliseconds; 0 means not measured
    pub latency_ms: u32,
}

impl PlayerInfo {
    pub fn new(id: PlayerId, name: impl Into<String>, latency_ms: u32) -> Self {
        Self {
            id,
            name: name.into(),
            latency_ms,
        }
    }
}

/// The services the engine consumes from the game server that embeds it
///
/// Delivery is fire-and-forget: transport failures stay inside the host and
/// sending to a player who has already disconnected is silently dropped.
#[async_trait]
pub trait ServerHost: Send + Sync {
    async fn online_players(&self) -> Vec<PlayerInfo>;

    async fn player(&self, player_id: PlayerId) -> Option<PlayerInfo>;

    async fn broadcast(&self, channel: u8, payload: &[u8]);

    async fn send_to(&self, player_id: PlayerId, channel: u8, payload: &[u8]);

    /// Operator-facing log sink, not visible to players
    fn log(&self, line: &str);
}

struct Connection {
    info: PlayerInfo,
    sender: mpsc::UnboundedSender<String>,
}

/// Host backed by per-player channels, used by the console binary
pub struct InMemoryHost {
    // player_id -> connection, ordered so listings are stable
    connections: Arc<RwLock<BTreeMap<PlayerId, Connection>>>,
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    pub async fn connect(&self, info: PlayerInfo, sender: mpsc::UnboundedSender<String>) {
        let mut connections = self.connections.write().await;
        connections.insert(info.id, Connection { info, sender });
    }

    pub async fn disconnect(&self, player_id: PlayerId) -> Option<PlayerInfo> {
        let mut connections = self.connections.write().await;
        connections.remove(&player_id).map(|c| c.info)
    }
}

#[async_trait]
impl ServerHost for InMemoryHost {
    async fn online_players(&self) -> Vec<PlayerInfo> {
        let connections = self.connections.read().await;
        connections.values().map(|c| c.info.clone()).collect()
    }

    async fn player(&self, player_id: PlayerId) -> Option<PlayerInfo> {
        let connections = self.connections.read().await;
        connections.get(&player_id).map(|c| c.info.clone())
    }

    async fn broadcast(&self, channel: u8, payload: &[u8]) {
        let text = String::from_utf8_lossy(payload);
        let connections = self.connections.read().await;
        debug!(channel, receivers = connections.len(), "Broadcasting message");
        for connection in connections.values() {
            let _ = connection.sender.send(text.to_string());
        }
    }

    async fn send_to(&self, player_id: PlayerId, channel: u8, payload: &[u8]) {
        let connections = self.connections.read().await;
        match connections.get(&player_id) {
            Some(connection) => {
                let _ = connection
                    .sender
                    .send(String::from_utf8_lossy(payload).to_string());
            }
            None => debug!(player_id, channel, "Dropping message for disconnected player"),
        }
    }

    fn log(&self, line: &str) {
        info!(target: "welcome_engine::host", "{}", line);
    }
}
