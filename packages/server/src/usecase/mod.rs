//! UseCase 層：リクエストごとのアプリケーションロジック
//!
//! 各 UseCase の `execute` はドメインの結果を返し、送信する JSON は UI 層で
//! DTO から生成して `notify_*` などに渡す。

pub mod create_duel;
pub mod create_session;
pub mod delivery;
pub mod error;
pub mod get_sessions;
pub mod join_duel;
pub mod join_session;
pub mod reap_idle_sessions;
pub mod submit_guess;
pub mod submit_secret;

pub use create_duel::{CreateDuelUseCase, DuelCreated};
pub use create_session::CreateSessionUseCase;
pub use delivery::Delivery;
pub use error::{
    CreateSessionError, GetSessionDetailError, JoinError, SubmitGuessError, SubmitSecretError,
};
pub use get_sessions::{GetSessionDetailUseCase, GetSessionsUseCase};
pub use join_duel::{DuelJoin, JoinDuelUseCase};
pub use join_session::JoinSessionUseCase;
pub use reap_idle_sessions::ReapIdleSessionsUseCase;
pub use submit_guess::{GuessPresenter, GuessSubmission, SubmitGuessUseCase};
pub use submit_secret::SubmitSecretUseCase;
