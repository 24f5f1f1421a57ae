use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use welcome_engine::{PlayerId, PlayerInfo, ServerHost};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Host that records every delivery and log line for later assertions
#[derive(Default)]
pub struct MockHost {
    connected: Mutex<Vec<PlayerInfo>>,
    broadcasts: Mutex<Vec<(u8, String)>>,
    direct: Mutex<HashMap<PlayerId, Vec<(u8, String)>>>,
    logs: Mutex<Vec<String>>,
    send_delay: Mutex<Option<Duration>>,
}

#[allow(dead_code)]
impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, info: PlayerInfo) {
        self.connected.lock().unwrap().push(info);
    }

    /// Makes every later `send_to` stall for `delay`, like a congested transport
    pub fn set_send_delay(&self, delay: Duration) {
        *self.send_delay.lock().unwrap() = Some(delay);
    }

    pub fn disconnect(&self, player_id: PlayerId) -> Option<PlayerInfo> {
        let mut connected = self.connected.lock().unwrap();
        let index = connected.iter().position(|p| p.id == player_id)?;
        Some(connected.remove(index))
    }

    /// Broadcast texts in delivery order
    pub fn broadcasts(&self) -> Vec<String> {
        self.broadcasts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn broadcast_channels(&self) -> Vec<u8> {
        self.broadcasts
            .lock()
            .unwrap()
            .iter()
            .map(|(channel, _)| *channel)
            .collect()
    }

    pub fn broadcasts_containing(&self, needle: &str) -> usize {
        self.broadcasts()
            .iter()
            .filter(|text| text.contains(needle))
            .count()
    }

    /// Direct messages delivered to `player_id`, in order
    pub fn messages_for(&self, player_id: PlayerId) -> Vec<String> {
        self.direct
            .lock()
            .unwrap()
            .get(&player_id)
            .map(|messages| messages.iter().map(|(_, text)| text.clone()).collect())
            .unwrap_or_default()
    }

    pub fn total_direct_messages(&self) -> usize {
        self.direct.lock().unwrap().values().map(Vec::len).sum()
    }

    pub fn logs(&self) -> Vec<String> {
        self.logs.lock().unwrap().clone()
    }

    pub fn has_log(&self, needle: &str) -> bool {
        self.logs().iter().any(|line| line.contains(needle))
    }

    pub fn clear(&self) {
        self.broadcasts.lock().unwrap().clear();
        self.direct.lock().unwrap().clear();
        self.logs.lock().unwrap().clear();
    }
}

#[async_trait]
impl ServerHost for MockHost {
    async fn online_players(&self) -> Vec<PlayerInfo> {
        self.connected.lock().unwrap().clone()
    }

    async fn player(&self, player_id: PlayerId) -> Option<PlayerInfo> {
        self.connected
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == player_id)
            .cloned()
    }

    async fn broadcast(&self, channel: u8, payload: &[u8]) {
        let text = String::from_utf8(payload.to_vec()).expect("engine sends UTF-8");
        self.broadcasts.lock().unwrap().push((channel, text));
    }

    async fn send_to(&self, player_id: PlayerId, channel: u8, payload: &[u8]) {
        // Mirror a real transport: messages to departed players vanish
        if self.player(player_id).await.is_none() {
            return;
        }
        let delay = *self.send_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let text = String::from_utf8(payload.to_vec()).expect("engine sends UTF-8");
        self.direct
            .lock()
            .unwrap()
            .entry(player_id)
            .or_default()
            .push((channel, text));
    }

    fn log(&self, line: &str) {
        self.logs.lock().unwrap().push(line.to_string());
    }
}
