use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::PlayerId;

/// Live state for one connected player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSession {
    pub player_id: PlayerId,
    pub joined_at: DateTime<Utc>, // Set once on join, never touched again
    pub kill_count: u32,
}

impl PlayerSession {
    /// Creates a fresh session with no eliminations
    pub fn new(player_id: PlayerId, joined_at: DateTime<Utc>) -> Self {
        Self {
            player_id,
            joined_at,
            kill_count: 0,
        }
    }

    /// Minutes elapsed between joining and `now`, never negative
    pub fn minutes_played(&self, now: DateTime<Utc>) -> f64 {
        let elapsed = (now - self.joined_at).num_milliseconds().max(0);
        elapsed as f64 / 60_000.0
    }
}

/// Process-wide counters that outlive individual sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStats {
    pub total_players_served: u64,
}
