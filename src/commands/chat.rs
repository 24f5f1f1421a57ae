use std::sync::Arc;
use strum_macros::{Display, EnumString};
use tracing::{debug, info};

use crate::event::ChatMessage;
use crate::notify::{messages, Notifier, ServerHost};
use crate::session::SessionStore;
use crate::shared::{Clock, PlayerId};

/// Chat commands players can type; matching ignores ASCII case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ChatCommand {
    #[strum(serialize = "!help")]
    Help,
    #[strum(serialize = "!stats")]
    Stats,
    #[strum(serialize = "!online")]
    Online,
    #[strum(serialize = "!time")]
    Time,
}

impl ChatCommand {
    /// Recognizes a whole chat line as a command, ignoring surrounding whitespace
    pub fn parse(text: &str) -> Option<Self> {
        text.trim().parse().ok()
    }
}

/// Where a chat line ended up after routing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Recognized and answered; the message has been marked consumed
    Consumed(ChatCommand),
    /// Not a command; left untouched for other consumers
    Unmatched,
}

/// Answers player chat commands
///
/// Reads session state but never writes it.
pub struct CommandRouter {
    sessions: Arc<dyn SessionStore>,
    host: Arc<dyn ServerHost>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
}

impl CommandRouter {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        host: Arc<dyn ServerHost>,
        notifier: Notifier,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            host,
            notifier,
            clock,
        }
    }

    pub async fn route(&self, chat: &mut ChatMessage) -> CommandOutcome {
        let Some(command) = ChatCommand::parse(&chat.message) else {
            return CommandOutcome::Unmatched;
        };

        info!(player_id = chat.player_id, command = %command, "Chat command matched");
        // Marked before replying so a timed-out reply still suppresses the chat line
        chat.mark_consumed();
        self.execute(command, chat.player_id).await;

        CommandOutcome::Consumed(command)
    }

    async fn execute(&self, command: ChatCommand, player_id: PlayerId) {
        match command {
            ChatCommand::Help => {
                self.notifier.send_lines(player_id, &messages::help()).await;
            }
            ChatCommand::Stats => {
                let kills = self
                    .sessions
                    .get_session(player_id)
                    .await
                    .map_or(0, |s| s.kill_count);
                self.notifier
                    .send_lines(player_id, &messages::stats(kills))
                    .await;
            }
            ChatCommand::Online => {
                let players = self.host.online_players().await;
                self.notifier
                    .send_lines(player_id, &messages::online_list(&players))
                    .await;
            }
            ChatCommand::Time => match self.sessions.get_session(player_id).await {
                Ok(session) => {
                    let minutes = session.minutes_played(self.clock.now());
                    self.notifier
                        .send_lines(player_id, &messages::play_time(minutes))
                        .await;
                }
                Err(e) => debug!(player_id, error = %e, "No session, skipping play time"),
            },
        }
    }
}
