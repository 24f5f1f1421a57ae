use std::sync::Arc;
use tracing::debug;

use super::host::ServerHost;
use crate::shared::PlayerId;

/// Turns engine text into host deliveries on the engine's message channel
#[derive(Clone)]
pub struct Notifier {
    host: Arc<dyn ServerHost>,
    channel: u8,
}

impl Notifier {
    pub fn new(host: Arc<dyn ServerHost>, channel: u8) -> Self {
        Self { host, channel }
    }

    /// Delivers `text` to every connected player
    pub async fn broadcast(&self, text: &str) {
        debug!(channel = self.channel, text = %text, "Broadcasting to all players");
        self.host.broadcast(self.channel, text.as_bytes()).await;
    }

    /// Delivers `text` to one player; a no-op if they have gone
    pub async fn send_to(&self, player_id: PlayerId, text: &str) {
        debug!(player_id, channel = self.channel, "Sending to player");
        self.host.send_to(player_id, self.channel, text.as_bytes()).await;
    }

    /// Sends each line as its own message, in order
    pub async fn send_lines(&self, player_id: PlayerId, lines: &[String]) {
        for line in lines {
            self.send_to(player_id, line).await;
        }
    }

    /// Writes to the host's operator log
    pub fn log(&self, line: &str) {
        self.host.log(line);
    }

    pub fn log_lines(&self, lines: &[String]) {
        for line in lines {
            self.host.log(line);
        }
    }
}
