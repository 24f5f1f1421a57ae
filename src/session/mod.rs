// Public API - what other modules can use
pub use errors::SessionError;
pub use models::{PlayerSession, ServerStats};
pub use store::{InMemorySessionStore, SessionStore};

// Internal modules
mod errors;
pub mod models;
pub mod store;
