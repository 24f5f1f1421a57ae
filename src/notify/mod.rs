// Public API
pub use host::{InMemoryHost, PlayerInfo, ServerHost};
pub use notifier::Notifier;

// Internal modules
mod host;
pub mod messages;
mod notifier;
