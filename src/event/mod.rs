// Event-driven plumbing between the host and the engine
//
// The host publishes typed game events on the bus; the engine registers one
// handler per event kind it cares about.

// Public API - what other modules can use
pub use bus::EventBus;
pub use events::{ChatMessage, EventKind, GameEvent};
pub use handler::{EventError, EventHandler, NoOpEventHandler};

// Internal modules
mod bus;
mod events;
mod handler;
