//! Domain errors.

use thiserror::Error;

/// Errors raised while constructing value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("Player name must not be empty")]
    EmptyPlayerName,

    #[error("Player name is too long ({0} characters)")]
    PlayerNameTooLong(usize),

    #[error("Invalid session id: '{0}'")]
    InvalidSessionId(String),

    #[error("Invalid connection id: '{0}'")]
    InvalidConnectionId(String),

    #[error("Invalid game config: {0}")]
    InvalidConfig(String),
}

/// Errors raised by the session engine and duel handshake.
///
/// None of these mutate the session; they are safe to retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid player or game over")]
    InvalidPlayer,

    #[error("Duel not ready")]
    DuelNotReady,

    #[error("Not a duel session")]
    NotADuel,

    #[error("Duel already started")]
    DuelAlreadyStarted,

    #[error("Session full")]
    SessionFull,

    #[error("Invalid secret word length")]
    InvalidSecretLength,

    #[error("Invalid secret word")]
    InvalidSecret,
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Session '{0}' already exists")]
    DuplicateSessionId(String),
}

/// Delivery errors reported by a [`MessagePusher`](super::MessagePusher)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("Connection '{0}' not found")]
    ConnectionNotFound(String),

    #[error("Push failed: {0}")]
    PushFailed(String),
}
