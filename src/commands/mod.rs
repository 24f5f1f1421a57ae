// Public API
pub use admin::{AdminCommand, AdminConsole, AdminError};
pub use chat::{ChatCommand, CommandOutcome, CommandRouter};

// Internal modules
mod admin;
mod chat;
