use async_trait::async_trait;
use std::sync::Arc;

use crate::commands::CommandRouter;
use crate::event::{EventError, EventHandler, GameEvent};

/// Hands chat lines to the command router
pub struct ChatCommandHandler {
    router: Arc<CommandRouter>,
}

impl ChatCommandHandler {
    pub fn new(router: Arc<CommandRouter>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl EventHandler for ChatCommandHandler {
    async fn handle(&self, event: &mut GameEvent) -> Result<(), EventError> {
        if let GameEvent::PlayerChat(chat) = event {
            self.router.route(chat).await;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ChatCommandHandler"
    }
}
