// Library crate for the welcome engine
// This file exposes the public API for the console host and integration tests

pub mod commands;
pub mod config;
pub mod engine;
pub mod event;
pub mod notify;
pub mod scheduler;
pub mod session;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use config::EngineConfig;
pub use engine::{EngineBuilder, WelcomeEngine, PLUGIN_INFO};
pub use event::{EventBus, EventKind, GameEvent};
pub use notify::{InMemoryHost, PlayerInfo, ServerHost};
pub use scheduler::{Scheduler, TokioScheduler};
pub use session::{InMemorySessionStore, SessionStore};
pub use shared::PlayerId;
