use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::shared::{PlayerId, NO_KILLER};

/// The kinds of event a handler can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    PlayerJoined,
    PlayerLeft,
    PlayerDied,
    PlayerChat,
}

/// A chat line sent by a player
///
/// The engine never creates these on its own; it reads `message` and may set the
/// consumed flag so the host stops forwarding the line to other consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub player_id: PlayerId,
    pub message: String,
    consumed: bool,
}

impl ChatMessage {
    pub fn new(player_id: PlayerId, message: impl Into<String>) -> Self {
        Self {
            player_id,
            message: message.into(),
            consumed: false,
        }
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn mark_consumed(&mut self) {
        self.consumed = true;
    }
}

/// Events the host publishes into the engine
///
/// Events represent facts about things that have already happened on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A player finished connecting
    PlayerJoined {
        player_id: PlayerId,
        player_name: String,
    },

    /// A player disconnected
    PlayerLeft {
        player_id: PlayerId,
        player_name: String,
    },

    /// A player was eliminated; `killer_id` is `None` for environmental deaths
    PlayerDied {
        victim_id: PlayerId,
        killer_id: Option<PlayerId>,
    },

    /// A player typed something in chat
    PlayerChat(ChatMessage),
}

impl GameEvent {
    pub fn joined(player_id: PlayerId, player_name: impl Into<String>) -> Self {
        GameEvent::PlayerJoined {
            player_id,
            player_name: player_name.into(),
        }
    }

    pub fn left(player_id: PlayerId, player_name: impl Into<String>) -> Self {
        GameEvent::PlayerLeft {
            player_id,
            player_name: player_name.into(),
        }
    }

    /// Builds a death event from the host's raw ids, where `NO_KILLER` means nobody
    pub fn died(victim_id: PlayerId, raw_killer_id: PlayerId) -> Self {
        let killer_id = (raw_killer_id != NO_KILLER).then_some(raw_killer_id);
        GameEvent::PlayerDied {
            victim_id,
            killer_id,
        }
    }

    pub fn chat(player_id: PlayerId, message: impl Into<String>) -> Self {
        GameEvent::PlayerChat(ChatMessage::new(player_id, message))
    }

    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::PlayerJoined { .. } => EventKind::PlayerJoined,
            GameEvent::PlayerLeft { .. } => EventKind::PlayerLeft,
            GameEvent::PlayerDied { .. } => EventKind::PlayerDied,
            GameEvent::PlayerChat(_) => EventKind::PlayerChat,
        }
    }

    /// The player this event originates from (the victim, for deaths)
    pub fn player_id(&self) -> PlayerId {
        match self {
            GameEvent::PlayerJoined { player_id, .. } => *player_id,
            GameEvent::PlayerLeft { player_id, .. } => *player_id,
            GameEvent::PlayerDied { victim_id, .. } => *victim_id,
            GameEvent::PlayerChat(chat) => chat.player_id,
        }
    }

    /// Whether a chat event was consumed; always false for other kinds
    pub fn is_consumed(&self) -> bool {
        matches!(self, GameEvent::PlayerChat(chat) if chat.is_consumed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_died_maps_sentinel_to_no_killer() {
        assert_eq!(
            GameEvent::died(3, NO_KILLER),
            GameEvent::PlayerDied {
                victim_id: 3,
                killer_id: None
            }
        );
        assert_eq!(
            GameEvent::died(3, 7),
            GameEvent::PlayerDied {
                victim_id: 3,
                killer_id: Some(7)
            }
        );
    }

    #[test]
    fn test_event_kind_display() {
        assert_eq!(EventKind::PlayerJoined.to_string(), "player_joined");
        assert_eq!(GameEvent::chat(1, "hi").kind(), EventKind::PlayerChat);
    }

    #[test]
    fn test_consumed_flag_only_for_chat() {
        let mut event = GameEvent::chat(1, "!help");
        assert!(!event.is_consumed());

        if let GameEvent::PlayerChat(chat) = &mut event {
            chat.mark_consumed();
        }
        assert!(event.is_consumed());
        assert!(!GameEvent::joined(1, "A").is_consumed());
    }
}
