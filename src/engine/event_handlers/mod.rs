pub mod chat_events;
pub mod combat_events;
pub mod connection_events;

pub use chat_events::ChatCommandHandler;
pub use combat_events::PlayerDeathHandler;
pub use connection_events::{PlayerJoinHandler, PlayerLeaveHandler};
