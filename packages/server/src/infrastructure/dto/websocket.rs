//! WebSocket message DTOs.
//!
//! Every frame is a JSON object with a `type` discriminator. Requests come
//! from clients; acks and events go back out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{GameMode, GameResult, TileState};

// ========================================
// Inbound
// ========================================

/// Game configuration as sent by clients; missing values get defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfigDto {
    #[serde(default)]
    pub max_guesses: Option<usize>,
    #[serde(default)]
    pub word_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_word_pool: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientRequest {
    CreateSession {
        #[serde(default)]
        request_id: Option<u64>,
        player_name: String,
        #[serde(default)]
        config: GameConfigDto,
    },
    CreateDuel {
        #[serde(default)]
        request_id: Option<u64>,
        player_name: String,
        #[serde(default)]
        config: GameConfigDto,
        #[serde(default)]
        secret_word: Option<String>,
    },
    JoinSession {
        #[serde(default)]
        request_id: Option<u64>,
        session_id: String,
        player_name: String,
    },
    JoinDuel {
        #[serde(default)]
        request_id: Option<u64>,
        session_id: String,
        player_name: String,
    },
    SubmitSecret {
        #[serde(default)]
        request_id: Option<u64>,
        session_id: String,
        player_name: String,
        secret_word: String,
    },
    SubmitGuess {
        session_id: String,
        player_name: String,
        guess: String,
    },
}

impl ClientRequest {
    pub fn request_id(&self) -> Option<u64> {
        match self {
            ClientRequest::CreateSession { request_id, .. }
            | ClientRequest::CreateDuel { request_id, .. }
            | ClientRequest::JoinSession { request_id, .. }
            | ClientRequest::JoinDuel { request_id, .. }
            | ClientRequest::SubmitSecret { request_id, .. } => *request_id,
            ClientRequest::SubmitGuess { .. } => None,
        }
    }
}

// ========================================
// Outbound
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    Ack,
    Waiting,
    NeedSecret,
    Started,
    Updated,
    Outcome,
}

/// Response to a request (all requests except `submit-guess`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckMessage {
    pub r#type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<u64>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AckMessage {
    pub fn ok(request_id: Option<u64>, session_id: Option<String>) -> Self {
        Self {
            r#type: MessageType::Ack,
            request_id,
            ok: true,
            session_id,
            error: None,
        }
    }

    pub fn error(request_id: Option<u64>, reason: impl Into<String>) -> Self {
        Self {
            r#type: MessageType::Ack,
            request_id,
            ok: false,
            session_id: None,
            error: Some(reason.into()),
        }
    }
}

/// Sent to a duel creator while the opponent is awaited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingMessage {
    pub r#type: MessageType,
    pub session_id: String,
    pub config: GameConfigDto,
    /// Whether the inline secret was recorded; if not, use `submit-secret`
    pub secret_accepted: bool,
}

/// Asks a duel joiner for their secret word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedSecretMessage {
    pub r#type: MessageType,
    pub session_id: String,
    pub config: GameConfigDto,
}

/// One player's own view at game start (or re-join)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartedMessage {
    pub r#type: MessageType,
    pub session_id: String,
    pub mode: GameMode,
    pub player_name: String,
    pub max_guesses: usize,
    pub word_length: usize,
    pub board: Vec<String>,
    pub states: Vec<Vec<TileState>>,
    pub current_row: usize,
    pub game_over: bool,
    pub last_result: Option<GameResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guesses_used: Option<usize>,
    pub letter_states: BTreeMap<char, TileState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessResultDto {
    pub board: Vec<String>,
    pub states: Vec<Vec<TileState>>,
    pub current_row: usize,
    pub game_over: bool,
    pub last_result: Option<GameResult>,
    pub letter_states: BTreeMap<char, TileState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guesses_used: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

/// Result of a guess submission.
///
/// Exactly one of `result`, `message` (input rejected, retry allowed) or
/// `error` (invalid reference) is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedMessage {
    pub r#type: MessageType,
    pub player_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GuessResultDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UpdatedMessage {
    pub fn error(player_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            r#type: MessageType::Updated,
            player_name: player_name.into(),
            result: None,
            message: None,
            error: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResultDto {
    pub id: String,
    pub last_result: Option<GameResult>,
    pub guesses_used: Option<usize>,
}

/// Resolved duel; `winner` is null for a draw
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeMessage {
    pub r#type: MessageType,
    pub winner: Option<String>,
    pub results: Vec<PlayerResultDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create_session_with_partial_config() {
        // テスト項目: 設定の一部が省略されたリクエストをパースできる
        // given (前提条件):
        let json = r#"{"type":"create-session","request_id":7,"player_name":"alice","config":{"max_guesses":4}}"#;

        // when (操作):
        let request: ClientRequest = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert_eq!(
            request,
            ClientRequest::CreateSession {
                request_id: Some(7),
                player_name: "alice".to_string(),
                config: GameConfigDto {
                    max_guesses: Some(4),
                    word_length: None,
                    extra_word_pool: None,
                },
            }
        );
        assert_eq!(request.request_id(), Some(7));
    }

    #[test]
    fn test_parse_submit_guess() {
        // テスト項目: submit-guess リクエストをパースできる
        // given (前提条件):
        let json = r#"{"type":"submit-guess","session_id":"abc","player_name":"bob","guess":"crane"}"#;

        // when (操作):
        let request: ClientRequest = serde_json::from_str(json).unwrap();

        // then (期待する結果):
        assert!(matches!(request, ClientRequest::SubmitGuess { ref guess, .. } if guess == "crane"));
        assert_eq!(request.request_id(), None);
    }

    #[test]
    fn test_unknown_request_type_is_rejected() {
        // テスト項目: 未知の type はパースエラーになる
        // given (前提条件):
        let json = r#"{"type":"delete-everything","session_id":"abc"}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientRequest>(json);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_ack_error_serialization_omits_session() {
        // テスト項目: エラーの ack には理由が含まれ、session_id は含まれない
        // given (前提条件):
        let ack = AckMessage::error(Some(3), "Game not found");

        // when (操作):
        let value = serde_json::to_value(&ack).unwrap();

        // then (期待する結果):
        assert_eq!(
            value,
            serde_json::json!({"type": "ack", "request_id": 3, "ok": false, "error": "Game not found"})
        );
    }

    #[test]
    fn test_message_type_uses_kebab_case() {
        // テスト項目: MessageType が kebab-case でシリアライズされる
        // given (前提条件):
        let ty = MessageType::NeedSecret;

        // when (操作):
        let json = serde_json::to_string(&ty).unwrap();

        // then (期待する結果):
        assert_eq!(json, "\"need-secret\"");
    }
}
