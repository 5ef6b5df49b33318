//! UseCase 層のエラー定義
//!
//! `reason()` の文字列はそのまま ack の `error` フィールドになる。

use thiserror::Error;

use crate::domain::{RepositoryError, SessionError};

/// セッション作成（solo / duel 共通）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateSessionError {
    #[error("Could not create session")]
    Storage(#[from] RepositoryError),
}

/// join-session / join-duel のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("Game not found")]
    SessionNotFound,

    #[error("Session is a duel")]
    DuelSession,

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// submit-secret のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitSecretError {
    #[error("Game not found")]
    SessionNotFound,

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// submit-guess のエラー（送信者本人にだけ返す）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitGuessError {
    #[error("Game not found")]
    SessionNotFound,

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// セッション詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetSessionDetailError {
    #[error("Session not found")]
    NotFound,
}

macro_rules! impl_reason {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $ty {
                /// クライアントに返す理由文字列
                pub fn reason(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_reason!(
    CreateSessionError,
    JoinError,
    SubmitSecretError,
    SubmitGuessError,
    GetSessionDetailError,
);
