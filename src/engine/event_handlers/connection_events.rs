use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::event::{EventError, EventHandler, GameEvent};
use crate::notify::{messages, Notifier, ServerHost};
use crate::session::SessionStore;
use crate::shared::Clock;

/// Opens a session and greets the player when they connect
pub struct PlayerJoinHandler {
    sessions: Arc<dyn SessionStore>,
    host: Arc<dyn ServerHost>,
    notifier: Notifier,
}

impl PlayerJoinHandler {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        host: Arc<dyn ServerHost>,
        notifier: Notifier,
    ) -> Self {
        Self {
            sessions,
            host,
            notifier,
        }
    }
}

#[async_trait]
impl EventHandler for PlayerJoinHandler {
    async fn handle(&self, event: &mut GameEvent) -> Result<(), EventError> {
        let GameEvent::PlayerJoined {
            player_id,
            player_name,
        } = event
        else {
            return Ok(());
        };

        if let Err(e) = self.sessions.on_join(*player_id).await {
            warn!(player_id = *player_id, error = %e, "Ignoring duplicate join");
            return Ok(());
        }

        let online = self.host.online_players().await.len();
        info!(player_id = *player_id, online, "Player joined");

        self.notifier.log(&messages::join_greeting(player_name));
        self.notifier.log(&messages::online_count(online));
        self.notifier
            .broadcast(&messages::join_broadcast(player_name))
            .await;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "PlayerJoinHandler"
    }
}

/// Closes the session and says goodbye when the player disconnects
pub struct PlayerLeaveHandler {
    sessions: Arc<dyn SessionStore>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
}

impl PlayerLeaveHandler {
    pub fn new(sessions: Arc<dyn SessionStore>, notifier: Notifier, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions,
            notifier,
            clock,
        }
    }
}

#[async_trait]
impl EventHandler for PlayerLeaveHandler {
    async fn handle(&self, event: &mut GameEvent) -> Result<(), EventError> {
        let GameEvent::PlayerLeft {
            player_id,
            player_name,
        } = event
        else {
            return Ok(());
        };

        // A leave can race with a reset, so a missing session only skips the summary
        if let Some(session) = self.sessions.on_leave(*player_id).await {
            let minutes = session.minutes_played(self.clock.now());
            info!(
                player_id = *player_id,
                minutes_played = minutes,
                kill_count = session.kill_count,
                "Player left"
            );

            self.notifier
                .log_lines(&messages::farewell(player_name, minutes));
            if session.kill_count > 0 {
                self.notifier
                    .log(&messages::farewell_kills(player_name, session.kill_count));
            }
        } else {
            info!(player_id = *player_id, "Player left without a tracked session");
        }

        self.notifier
            .broadcast(&messages::leave_broadcast(player_name))
            .await;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "PlayerLeaveHandler"
    }
}
