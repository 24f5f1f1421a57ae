use std::sync::Arc;

use welcome_engine::shared::ManualClock;
use welcome_engine::{
    EngineConfig, EventBus, GameEvent, PlayerId, PlayerInfo, TokioScheduler,
    WelcomeEngine,
};

use super::mocks::MockHost;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub host: Arc<MockHost>,
    pub bus: EventBus,
    pub scheduler: Arc<TokioScheduler>,
    pub clock: Arc<ManualClock>,
    pub engine: WelcomeEngine,
}

#[allow(dead_code)]
impl TestSetup {
    /// Connects the player on the host, then publishes the join
    pub async fn join(&self, player_id: PlayerId, name: &str) {
        self.join_with_latency(player_id, name, 0).await;
    }

    pub async fn join_with_latency(&self, player_id: PlayerId, name: &str, latency_ms: u32) {
        self.host
            .connect(PlayerInfo::new(player_id, name, latency_ms));
        self.bus.publish(GameEvent::joined(player_id, name)).await;
    }

    /// Disconnects the player on the host, then publishes the leave
    pub async fn leave(&self, player_id: PlayerId) {
        let name = self
            .host
            .disconnect(player_id)
            .map(|p| p.name)
            .unwrap_or_else(|| format!("player-{}", player_id));
        self.bus.publish(GameEvent::left(player_id, name)).await;
    }

    pub async fn kill(&self, victim_id: PlayerId, raw_killer_id: PlayerId) {
        self.bus
            .publish(GameEvent::died(victim_id, raw_killer_id))
            .await;
    }

    pub async fn chat(&self, player_id: PlayerId, text: &str) -> GameEvent {
        self.bus.publish(GameEvent::chat(player_id, text)).await
    }

    pub async fn kill_count(&self, player_id: PlayerId) -> Option<u32> {
        self.engine
            .sessions()
            .get_session(player_id)
            .await
            .ok()
            .map(|s| s.kill_count)
    }
}

pub struct TestSetupBuilder {
    config: EngineConfig,
    rng_seed: u64,
}

#[allow(dead_code)]
impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            rng_seed: 7,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    pub async fn build(self) -> TestSetup {
        let host = Arc::new(MockHost::new());
        let bus = EventBus::new();
        let scheduler = Arc::new(TokioScheduler::new());
        let clock = Arc::new(ManualClock::default());

        let engine = WelcomeEngine::builder(host.clone(), bus.clone(), scheduler.clone())
            .with_config(self.config)
            .with_clock(clock.clone())
            .with_rng_seed(self.rng_seed)
            .load()
            .await
            .expect("engine should load with a valid config");

        TestSetup {
            host,
            bus,
            scheduler,
            clock,
            engine,
        }
    }
}
