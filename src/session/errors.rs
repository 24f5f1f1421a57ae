use thiserror::Error;

use crate::shared::PlayerId;

/// Failures reported by the session store
///
/// None of these are fatal; callers log them and fall back to a no-op.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session already exists for player {0}")]
    DuplicateSession(PlayerId),

    #[error("No session for player {0}")]
    NoSuchSession(PlayerId),

    #[error("Session not found for player {0}")]
    NotFound(PlayerId),
}
