//! Conversion logic between DTOs and domain entities.

use kotoba_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{
    DuelOutcome, GameConfig, GuessOutcome, GuessReport, PlayerResult, PlayerState, PlayerView,
    Session, ValueObjectError,
    entity::{MSG_NOT_ENOUGH_LETTERS, MSG_NOT_IN_WORD_LIST},
};
use crate::infrastructure::dto::{http as http_dto, websocket as dto};

// ========================================
// DTO → Domain Entity
// ========================================

impl TryFrom<dto::GameConfigDto> for GameConfig {
    type Error = ValueObjectError;

    fn try_from(dto: dto::GameConfigDto) -> Result<Self, Self::Error> {
        GameConfig::new(dto.max_guesses, dto.word_length, dto.extra_word_pool)
    }
}

// ========================================
// Domain Entity → DTO (WebSocket)
// ========================================

impl From<&GameConfig> for dto::GameConfigDto {
    fn from(config: &GameConfig) -> Self {
        Self {
            max_guesses: Some(config.max_guesses()),
            word_length: Some(config.word_length()),
            extra_word_pool: config.extra_word_pool().map(<[String]>::to_vec),
        }
    }
}

impl From<PlayerView> for dto::StartedMessage {
    fn from(view: PlayerView) -> Self {
        Self {
            r#type: dto::MessageType::Started,
            session_id: view.session_id.into_string(),
            mode: view.mode,
            player_name: view.player_name.into_string(),
            max_guesses: view.max_guesses,
            word_length: view.word_length,
            board: view.board,
            states: view.states,
            current_row: view.current_row,
            game_over: view.game_over,
            last_result: view.last_result,
            guesses_used: view.guesses_used,
            letter_states: view.letter_states,
            answer: view.answer,
        }
    }
}

impl From<GuessReport> for dto::GuessResultDto {
    fn from(report: GuessReport) -> Self {
        Self {
            board: report.board,
            states: report.states,
            current_row: report.current_row,
            game_over: report.game_over,
            last_result: report.last_result,
            letter_states: report.letter_states,
            guesses_used: report.guesses_used,
            answer: report.answer,
        }
    }
}

impl From<GuessOutcome> for dto::UpdatedMessage {
    fn from(outcome: GuessOutcome) -> Self {
        let (player_name, result, message) = match outcome {
            GuessOutcome::Accepted(report) => {
                let player_name = report.player_name.clone();
                (player_name, Some(report.into()), None)
            }
            GuessOutcome::InvalidWordLength { player_name } => {
                (player_name, None, Some(MSG_NOT_ENOUGH_LETTERS.to_string()))
            }
            GuessOutcome::NotInDictionary { player_name } => {
                (player_name, None, Some(MSG_NOT_IN_WORD_LIST.to_string()))
            }
        };
        Self {
            r#type: dto::MessageType::Updated,
            player_name: player_name.into_string(),
            result,
            message,
            error: None,
        }
    }
}

impl From<PlayerResult> for dto::PlayerResultDto {
    fn from(result: PlayerResult) -> Self {
        Self {
            id: result.id.into_string(),
            last_result: result.last_result,
            guesses_used: result.guesses_used,
        }
    }
}

impl From<DuelOutcome> for dto::OutcomeMessage {
    fn from(outcome: DuelOutcome) -> Self {
        Self {
            r#type: dto::MessageType::Outcome,
            winner: outcome.winner.map(|w| w.into_string()),
            results: outcome.results.into_iter().map(Into::into).collect(),
        }
    }
}

// ========================================
// Domain Entity → DTO (HTTP)
// ========================================

impl From<&PlayerState> for http_dto::PlayerProgressDto {
    fn from(player: &PlayerState) -> Self {
        Self {
            name: player.name.as_str().to_string(),
            current_row: player.current_row,
            game_over: player.game_over,
            last_result: player.last_result,
            guesses_used: player.guesses_used,
        }
    }
}

impl From<&Session> for http_dto::SessionSummaryDto {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.as_str().to_string(),
            mode: session.mode(),
            players: session
                .players()
                .iter()
                .map(|p| p.name.as_str().to_string())
                .collect(),
            created_at: timestamp_to_jst_rfc3339(session.created_at.value()),
        }
    }
}

impl From<&Session> for http_dto::SessionDetailDto {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.as_str().to_string(),
            mode: session.mode(),
            max_guesses: session.config.max_guesses(),
            word_length: session.config.word_length(),
            duel_ready: session.ready_to_start(),
            players: session.players().iter().map(Into::into).collect(),
            created_at: timestamp_to_jst_rfc3339(session.created_at.value()),
            last_activity_at: timestamp_to_jst_rfc3339(session.last_activity.value()),
        }
    }
}
