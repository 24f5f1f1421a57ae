use async_trait::async_trait;
use thiserror::Error;

use super::events::GameEvent;

/// Errors that can occur when handling events or running scheduled jobs
#[derive(Debug, Error)]
pub enum EventError {
    #[error("Handler timed out")]
    Timeout,

    #[error("Handler failed: {0}")]
    Failed(String),

    #[error("Handler panicked: {0}")]
    Panic(String),
}

impl EventError {
    pub fn failed(msg: impl Into<String>) -> Self {
        EventError::Failed(msg.into())
    }

    /// Build a `Panic` error from a caught unwind payload
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        EventError::Panic(msg)
    }
}

/// Trait for components that react to game events
///
/// Handlers are registered on the `EventBus` per `EventKind` and are invoked in
/// registration order on the publisher's task. They receive the event mutably so
/// chat handlers can mark a message consumed.
///
/// Handlers must finish quickly: they share the dispatch path with other host work.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle a game event
    async fn handle(&self, event: &mut GameEvent) -> Result<(), EventError>;

    /// Get a human-readable name for this handler (for logging/debugging)
    fn name(&self) -> &'static str;
}

/// A no-op event handler for testing
pub struct NoOpEventHandler;

#[async_trait]
impl EventHandler for NoOpEventHandler {
    async fn handle(&self, _event: &mut GameEvent) -> Result<(), EventError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "NoOpEventHandler"
    }
}
