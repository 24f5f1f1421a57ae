use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading an `EngineConfig`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// A kill count that earns a one-time broadcast
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub kills: u32,
    /// Broadcast text; `{name}` is replaced with the killer's display name
    pub message: String,
}

impl Milestone {
    pub fn new(kills: u32, message: impl Into<String>) -> Self {
        Self {
            kills,
            message: message.into(),
        }
    }

    pub fn render(&self, player_name: &str) -> String {
        self.message.replace("{name}", player_name)
    }
}

/// Tunables and canned content for the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Period of the ambient tip broadcast
    pub announcement_interval_secs: u64,
    /// Category tag attached to every engine-originated message
    pub message_channel: u8,
    /// Upper bound on a single event handler invocation
    pub handler_timeout_ms: u64,
    pub tips: Vec<String>,
    pub milestones: Vec<Milestone>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            announcement_interval_secs: 300, // 5 minutes
            message_channel: 4,
            handler_timeout_ms: 5_000,
            tips: vec![
                "Remember to stay hydrated and take breaks. Your health matters to us!".into(),
                "Working together is the key to survival. Watch each other's backs out there."
                    .into(),
                "Found good loot? Consider sharing with teammates who need it more.".into(),
                "Having a great time? Tell your friends about our server!".into(),
                "Respect your fellow players. We are all here to have fun together.".into(),
            ],
            milestones: vec![
                Milestone::new(
                    5,
                    "[Server] {name} is on fire! 5 eliminations and counting!",
                ),
                Milestone::new(
                    10,
                    "[Server] {name} is unstoppable! A true warrior with 10 eliminations!",
                ),
            ],
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.announcement_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "announcement_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.tips.is_empty() {
            return Err(ConfigError::Invalid("tips must not be empty".to_string()));
        }
        if self.milestones.iter().any(|m| m.kills == 0) {
            return Err(ConfigError::Invalid(
                "milestone kill counts must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn announcement_interval(&self) -> Duration {
        Duration::from_secs(self.announcement_interval_secs)
    }

    pub fn handler_timeout(&self) -> Duration {
        Duration::from_millis(self.handler_timeout_ms)
    }

    /// The milestone reached at exactly `kill_count`, if any
    pub fn milestone_for(&self, kill_count: u32) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.kills == kill_count)
    }
}
