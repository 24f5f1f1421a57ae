use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{
    events::{EventKind, GameEvent},
    handler::{EventError, EventHandler},
};

/// Typed publish/subscribe registry between the host and the engine's handlers
///
/// Handlers are kept per `EventKind` in registration order. `publish` runs every
/// handler for the event's kind on the caller's task, one after another, and a
/// failing, panicking or slow handler never stops delivery to the next one.
/// Clones share both the registry and the handler timeout.
#[derive(Clone)]
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<EventKind, Vec<Arc<dyn EventHandler>>>>>,
    handler_timeout_ms: Arc<AtomicU64>,
}

impl EventBus {
    /// Creates an empty event bus with a 5 second per-handler timeout
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            handler_timeout_ms: Arc::new(AtomicU64::new(5_000)),
        }
    }

    /// Set the timeout for individual handler execution
    pub fn with_handler_timeout(self, handler_timeout: Duration) -> Self {
        self.set_handler_timeout(handler_timeout);
        self
    }

    /// Changes the handler timeout for this bus and every clone of it
    pub fn set_handler_timeout(&self, handler_timeout: Duration) {
        let millis = u64::try_from(handler_timeout.as_millis()).unwrap_or(u64::MAX);
        self.handler_timeout_ms.store(millis, Ordering::Relaxed);
    }

    pub fn handler_timeout(&self) -> Duration {
        Duration::from_millis(self.handler_timeout_ms.load(Ordering::Relaxed))
    }

    /// Registers `handler` for events of `kind`
    pub async fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>) {
        info!(event_type = %kind, handler = handler.name(), "Registering event handler");
        let mut handlers = self.handlers.write().await;
        handlers.entry(kind).or_default().push(handler);
    }

    /// Removes `handler` from `kind`; unknown handlers are ignored
    pub async fn unsubscribe(&self, kind: EventKind, handler: &Arc<dyn EventHandler>) {
        let mut handlers = self.handlers.write().await;
        let Some(registered) = handlers.get_mut(&kind) else {
            debug!(event_type = %kind, handler = handler.name(), "No handlers registered for kind");
            return;
        };

        let before = registered.len();
        registered.retain(|h| !Arc::ptr_eq(h, handler));

        if registered.len() < before {
            info!(event_type = %kind, handler = handler.name(), "Unregistered event handler");
        } else {
            debug!(event_type = %kind, handler = handler.name(), "Handler was not registered");
        }

        if registered.is_empty() {
            handlers.remove(&kind);
        }
    }

    /// Number of handlers currently registered for `kind`
    pub async fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers
            .read()
            .await
            .get(&kind)
            .map_or(0, |handlers| handlers.len())
    }

    /// Delivers `event` to every handler registered for its kind
    ///
    /// Returns the event after dispatch so the host can inspect mutations such as
    /// the consumed flag on chat messages.
    pub async fn publish(&self, mut event: GameEvent) -> GameEvent {
        let kind = event.kind();

        // Snapshot so handlers can (un)subscribe while being dispatched
        let handlers: Vec<Arc<dyn EventHandler>> = {
            let registered = self.handlers.read().await;
            registered.get(&kind).cloned().unwrap_or_default()
        };

        debug!(
            event_type = %kind,
            player_id = event.player_id(),
            "Dispatching event to {} handlers",
            handlers.len()
        );

        for handler in &handlers {
            if let Err(e) = self.invoke(handler.as_ref(), &mut event).await {
                warn!(
                    handler = handler.name(),
                    event_type = %kind,
                    error = %e,
                    "Event handler failed"
                );
            }
        }

        event
    }

    async fn invoke(
        &self,
        handler: &dyn EventHandler,
        event: &mut GameEvent,
    ) -> Result<(), EventError> {
        let delivery = timeout(self.handler_timeout(), handler.handle(event));

        match AssertUnwindSafe(delivery).catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(_elapsed)) => Err(EventError::Timeout),
            Err(payload) => Err(EventError::from_panic(payload)),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
