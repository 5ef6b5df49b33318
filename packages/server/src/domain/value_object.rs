//! Value objects.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

pub const MAX_PLAYER_NAME_LEN: usize = 32;
pub const DEFAULT_MAX_GUESSES: usize = 6;
pub const DEFAULT_WORD_LENGTH: usize = 5;
pub const MAX_GUESSES_LIMIT: usize = 12;
pub const WORD_LENGTH_LIMIT: usize = 12;

// ========================================
// SessionId
// ========================================

/// Opaque session token
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let valid = !value.is_empty()
            && value.len() <= 64
            && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(ValueObjectError::InvalidSessionId(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Generates collision-resistant session ids (128-bit random, hex encoded)
pub struct SessionIdFactory;

impl SessionIdFactory {
    pub fn generate() -> SessionId {
        SessionId(Uuid::new_v4().simple().to_string())
    }
}

// ========================================
// PlayerName
// ========================================

/// Display name of a player; also the lookup key within a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    /// Trims surrounding whitespace and rejects empty or overlong names.
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::EmptyPlayerName);
        }
        let len = trimmed.chars().count();
        if len > MAX_PLAYER_NAME_LEN {
            return Err(ValueObjectError::PlayerNameTooLong(len));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ========================================
// ConnectionId
// ========================================

/// Identifier of one live WebSocket connection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::InvalidConnectionId(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4().to_string())
    }
}

// ========================================
// Timestamp
// ========================================

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

// ========================================
// GameConfig
// ========================================

/// Per-session game configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameConfig {
    max_guesses: usize,
    word_length: usize,
    extra_word_pool: Option<Vec<String>>,
}

impl GameConfig {
    /// Build a config, applying defaults for missing or zero values.
    ///
    /// `max_guesses` falls back to 6 and `word_length` to 5. Extra pool
    /// words are lowercased; an empty pool is treated as absent.
    pub fn new(
        max_guesses: Option<usize>,
        word_length: Option<usize>,
        extra_word_pool: Option<Vec<String>>,
    ) -> Result<Self, ValueObjectError> {
        let max_guesses = match max_guesses {
            Some(n) if n > 0 => n,
            _ => DEFAULT_MAX_GUESSES,
        };
        let word_length = match word_length {
            Some(n) if n > 0 => n,
            _ => DEFAULT_WORD_LENGTH,
        };

        if max_guesses > MAX_GUESSES_LIMIT {
            return Err(ValueObjectError::InvalidConfig(format!(
                "max_guesses must be at most {}",
                MAX_GUESSES_LIMIT
            )));
        }
        if word_length > WORD_LENGTH_LIMIT {
            return Err(ValueObjectError::InvalidConfig(format!(
                "word_length must be at most {}",
                WORD_LENGTH_LIMIT
            )));
        }

        let extra_word_pool = extra_word_pool
            .map(|words| {
                words
                    .into_iter()
                    .map(|w| w.trim().to_lowercase())
                    .filter(|w| !w.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|words| !words.is_empty());

        Ok(Self {
            max_guesses,
            word_length,
            extra_word_pool,
        })
    }

    pub fn max_guesses(&self) -> usize {
        self.max_guesses
    }

    pub fn word_length(&self) -> usize {
        self.word_length
    }

    pub fn extra_word_pool(&self) -> Option<&[String]> {
        self.extra_word_pool.as_deref()
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_guesses: DEFAULT_MAX_GUESSES,
            word_length: DEFAULT_WORD_LENGTH,
            extra_word_pool: None,
        }
    }
}
