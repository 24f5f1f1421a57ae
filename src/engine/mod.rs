// Engine lifecycle: wires the session store, handlers, announcement task and
// consoles together on load, and tears them down again on unload.

pub mod event_handlers;

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::commands::{AdminConsole, CommandRouter};
use crate::config::{ConfigError, EngineConfig};
use crate::event::{EventBus, EventHandler, EventKind};
use crate::notify::{Notifier, ServerHost};
use crate::scheduler::{AnnouncementJob, Scheduler, TaskHandle};
use crate::session::{InMemorySessionStore, ServerStats, SessionStore};
use crate::shared::{Clock, SystemClock};

use event_handlers::{ChatCommandHandler, PlayerDeathHandler, PlayerJoinHandler, PlayerLeaveHandler};

/// Descriptive metadata the host shows for this extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PluginInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub author: &'static str,
    pub description: &'static str,
}

pub const PLUGIN_INFO: PluginInfo = PluginInfo {
    name: "Welcome Plugin",
    version: env!("CARGO_PKG_VERSION"),
    author: "Duckov Team",
    description:
        "A warm welcome plugin that greets players and provides helpful server utilities.",
};

/// A loaded engine instance
///
/// Owns its session store; nothing is kept in global state. Call `unload`
/// before dropping to detach from the bus and stop the announcement task.
pub struct WelcomeEngine {
    bus: EventBus,
    scheduler: Arc<dyn Scheduler>,
    sessions: Arc<dyn SessionStore>,
    notifier: Notifier,
    admin: AdminConsole,
    subscriptions: Vec<(EventKind, Arc<dyn EventHandler>)>,
    announcement: Mutex<Option<TaskHandle>>,
}

impl WelcomeEngine {
    pub fn builder(
        host: Arc<dyn ServerHost>,
        bus: EventBus,
        scheduler: Arc<dyn Scheduler>,
    ) -> EngineBuilder {
        EngineBuilder::new(host, bus, scheduler)
    }

    /// Detaches every handler, cancels the announcement and closes all sessions
    ///
    /// Safe to call twice.
    #[instrument(skip(self))]
    pub async fn unload(&self) {
        let Some(handle) = self.announcement.lock().await.take() else {
            info!("Engine already unloaded");
            return;
        };

        for (kind, handler) in &self.subscriptions {
            self.bus.unsubscribe(*kind, handler).await;
        }
        self.scheduler.cancel(handle).await;
        let closed = self.sessions.clear().await;

        self.notifier.log("Welcome Plugin unloaded. See you next time!");
        info!(closed_sessions = closed, "Engine unloaded");
    }

    pub async fn is_loaded(&self) -> bool {
        self.announcement.lock().await.is_some()
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    pub fn stats(&self) -> ServerStats {
        self.sessions.stats()
    }

    /// Operator console bound to this engine
    pub fn admin(&self) -> &AdminConsole {
        &self.admin
    }
}

/// Collects the engine's collaborators and optional overrides, then loads it
pub struct EngineBuilder {
    host: Arc<dyn ServerHost>,
    bus: EventBus,
    scheduler: Arc<dyn Scheduler>,
    config: EngineConfig,
    clock: Option<Arc<dyn Clock>>,
    sessions: Option<Arc<dyn SessionStore>>,
    rng_seed: Option<u64>,
}

impl EngineBuilder {
    pub fn new(host: Arc<dyn ServerHost>, bus: EventBus, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            host,
            bus,
            scheduler,
            config: EngineConfig::default(),
            clock: None,
            sessions: None,
            rng_seed: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_session_store(mut self, sessions: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Makes tip selection deterministic
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Registers the handlers, schedules the announcement and returns the engine
    pub async fn load(self) -> Result<WelcomeEngine, ConfigError> {
        self.config.validate()?;

        let config = Arc::new(self.config);
        self.bus.set_handler_timeout(config.handler_timeout());
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let sessions = self
            .sessions
            .unwrap_or_else(|| Arc::new(InMemorySessionStore::new(clock.clone())));
        let notifier = Notifier::new(self.host.clone(), config.message_channel);

        let router = Arc::new(CommandRouter::new(
            sessions.clone(),
            self.host.clone(),
            notifier.clone(),
            clock.clone(),
        ));

        let join: Arc<dyn EventHandler> = Arc::new(PlayerJoinHandler::new(
            sessions.clone(),
            self.host.clone(),
            notifier.clone(),
        ));
        let leave: Arc<dyn EventHandler> = Arc::new(PlayerLeaveHandler::new(
            sessions.clone(),
            notifier.clone(),
            clock.clone(),
        ));
        let death: Arc<dyn EventHandler> = Arc::new(PlayerDeathHandler::new(
            sessions.clone(),
            self.host.clone(),
            notifier.clone(),
            config.clone(),
        ));
        let chat: Arc<dyn EventHandler> = Arc::new(ChatCommandHandler::new(router));

        let subscriptions = vec![
            (EventKind::PlayerJoined, join),
            (EventKind::PlayerLeft, leave),
            (EventKind::PlayerDied, death),
            (EventKind::PlayerChat, chat),
        ];

        for (kind, handler) in &subscriptions {
            self.bus.subscribe(*kind, handler.clone()).await;
        }

        let job = match self.rng_seed {
            Some(seed) => AnnouncementJob::seeded(notifier.clone(), config.tips.clone(), seed),
            None => AnnouncementJob::from_entropy(notifier.clone(), config.tips.clone()),
        };
        let handle = self
            .scheduler
            .schedule_repeating(config.announcement_interval(), Arc::new(job))
            .await;

        notifier.log("Welcome Plugin loaded successfully!");
        notifier.log("Thank you for choosing our server. We hope you have a wonderful experience!");
        info!(
            plugin = PLUGIN_INFO.name,
            version = PLUGIN_INFO.version,
            announcement_task = %handle,
            "Engine loaded"
        );

        let admin = AdminConsole::new(sessions.clone(), self.host.clone(), notifier.clone());

        Ok(WelcomeEngine {
            bus: self.bus,
            scheduler: self.scheduler,
            sessions,
            notifier,
            admin,
            subscriptions,
            announcement: Mutex::new(Some(handle)),
        })
    }
}
