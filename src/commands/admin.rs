use std::sync::Arc;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;
use tracing::info;

use crate::notify::{messages, Notifier, ServerHost};
use crate::session::SessionStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdminError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Empty command line")]
    EmptyCommand,
}

/// Commands available on the operator console (not player chat)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum AdminCommand {
    Welcome,
    ServerStats,
    Broadcast,
}

impl AdminCommand {
    pub fn description(&self) -> &'static str {
        match self {
            AdminCommand::Welcome => "Show welcome message to all players",
            AdminCommand::ServerStats => "Display server statistics",
            AdminCommand::Broadcast => "Send a message to all players",
        }
    }

    /// One `name - description` line per console command
    pub fn usage() -> Vec<String> {
        AdminCommand::iter()
            .map(|command| format!("  {} - {}", command, command.description()))
            .collect()
    }
}

pub struct AdminConsole {
    sessions: Arc<dyn SessionStore>,
    host: Arc<dyn ServerHost>,
    notifier: Notifier,
}

impl AdminConsole {
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

    /// Parses a console line (`name arg...`) and runs it
    pub async fn execute(&self, line: &str) -> Result<AdminCommand, AdminError> {
        let mut parts = line.split_whitespace();
        let name = parts.next().ok_or(AdminError::EmptyCommand)?;
        let command: AdminCommand = name
            .parse()
            .map_err(|_| AdminError::UnknownCommand(name.to_string()))?;
        let args: Vec<&str> = parts.collect();

        self.run(command, &args).await;
        Ok(command)
    }

    pub async fn run(&self, command: AdminCommand, args: &[&str]) {
        info!(command = %command, arg_count = args.len(), "Running admin command");

        match command {
            AdminCommand::Welcome => {
                self.notifier.broadcast(messages::SERVER_WELCOME).await;
                self.notifier.log("Sent welcome message to all players.");
            }
            AdminCommand::ServerStats => {
                let online = self.host.online_players().await.len();
                let active = self.sessions.active_sessions().await;
                let served = self.sessions.stats().total_players_served;
                self.notifier
                    .log_lines(&messages::server_stats(served, online, active));
            }
            AdminCommand::Broadcast => {
                if args.is_empty() {
                    self.notifier.log("Usage: broadcast <message>");
                    return;
                }
                let text = args.join(" ");
                self.notifier.broadcast(&messages::announcement(&text)).await;
                self.notifier.log(&format!("Broadcast sent: {}", text));
            }
        }
    }
}
