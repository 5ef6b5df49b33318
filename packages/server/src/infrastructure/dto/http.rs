//! HTTP API response DTOs.
//!
//! None of these carry answers, secrets or board contents.

use serde::{Deserialize, Serialize};

use crate::domain::{GameMode, GameResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummaryDto {
    pub id: String,
    pub mode: GameMode,
    pub players: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProgressDto {
    pub name: String,
    pub current_row: usize,
    pub game_over: bool,
    pub last_result: Option<GameResult>,
    pub guesses_used: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetailDto {
    pub id: String,
    pub mode: GameMode,
    pub max_guesses: usize,
    pub word_length: usize,
    pub duel_ready: bool,
    pub players: Vec<PlayerProgressDto>,
    pub created_at: String,
    pub last_activity_at: String,
}
