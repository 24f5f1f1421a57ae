use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::event::{EventError, EventHandler, GameEvent};
use crate::notify::{Notifier, ServerHost};
use crate::session::SessionStore;

/// Credits eliminations and announces kill milestones
///
/// A kill counts only when the killer is known to the host and is not the
/// victim; environmental deaths and self-eliminations change nothing.
pub struct PlayerDeathHandler {
    sessions: Arc<dyn SessionStore>,
    host: Arc<dyn ServerHost>,
    notifier: Notifier,
    config: Arc<EngineConfig>,
}

impl PlayerDeathHandler {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        host: Arc<dyn ServerHost>,
        notifier: Notifier,
        config: Arc<EngineConfig>,
    ) -> Self {
        Self {
            sessions,
            host,
            notifier,
            config,
        }
    }
}

#[async_trait]
impl EventHandler for PlayerDeathHandler {
    async fn handle(&self, event: &mut GameEvent) -> Result<(), EventError> {
        let GameEvent::PlayerDied {
            victim_id,
            killer_id,
        } = *event
        else {
            return Ok(());
        };

        let Some(killer_id) = killer_id.filter(|&k| k != victim_id) else {
            debug!(victim_id, "Death without an attributable killer");
            return Ok(());
        };

        let Some(killer) = self.host.player(killer_id).await else {
            debug!(victim_id, killer_id, "Killer is no longer connected");
            return Ok(());
        };

        let kills = match self.sessions.record_kill(killer_id).await {
            Ok(kills) => kills,
            Err(e) => {
                debug!(killer_id, error = %e, "Kill not recorded");
                return Ok(());
            }
        };

        if let Some(milestone) = self.config.milestone_for(kills) {
            info!(killer_id, kills, "Kill milestone reached");
            self.notifier.broadcast(&milestone.render(&killer.name)).await;
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "PlayerDeathHandler"
    }
}
