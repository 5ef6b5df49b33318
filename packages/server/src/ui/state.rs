//! Shared application state.

use std::sync::Arc;

use kotoba_shared::time::Clock;

use crate::{
    domain::{ConnectionRegistry, Dictionary, MessagePusher, SessionRepository, WordPool},
    usecase::{
        CreateDuelUseCase, CreateSessionUseCase, Delivery, GetSessionDetailUseCase,
        GetSessionsUseCase, JoinDuelUseCase, JoinSessionUseCase, SubmitGuessUseCase,
        SubmitSecretUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// MessagePusher（接続ごとの送信チャンネルの登録先）
    pub message_pusher: Arc<dyn MessagePusher>,
    pub create_session_usecase: Arc<CreateSessionUseCase>,
    pub create_duel_usecase: Arc<CreateDuelUseCase>,
    pub join_session_usecase: Arc<JoinSessionUseCase>,
    pub join_duel_usecase: Arc<JoinDuelUseCase>,
    pub submit_secret_usecase: Arc<SubmitSecretUseCase>,
    pub submit_guess_usecase: Arc<SubmitGuessUseCase>,
    pub get_sessions_usecase: Arc<GetSessionsUseCase>,
    pub get_session_detail_usecase: Arc<GetSessionDetailUseCase>,
}

impl AppState {
    /// Wire every request use case to the given collaborators
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        dictionary: Arc<dyn Dictionary>,
        word_pool: Arc<WordPool>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let delivery = Delivery::new(registry, message_pusher.clone());
        Self {
            message_pusher,
            create_session_usecase: Arc::new(CreateSessionUseCase::new(
                repository.clone(),
                delivery.clone(),
                word_pool.clone(),
                clock.clone(),
            )),
            create_duel_usecase: Arc::new(CreateDuelUseCase::new(
                repository.clone(),
                delivery.clone(),
                word_pool,
                clock.clone(),
            )),
            join_session_usecase: Arc::new(JoinSessionUseCase::new(
                repository.clone(),
                delivery.clone(),
                clock.clone(),
            )),
            join_duel_usecase: Arc::new(JoinDuelUseCase::new(
                repository.clone(),
                delivery.clone(),
                clock.clone(),
            )),
            submit_secret_usecase: Arc::new(SubmitSecretUseCase::new(
                repository.clone(),
                delivery.clone(),
                clock.clone(),
            )),
            submit_guess_usecase: Arc::new(SubmitGuessUseCase::new(
                repository.clone(),
                delivery,
                dictionary,
                clock,
            )),
            get_sessions_usecase: Arc::new(GetSessionsUseCase::new(repository.clone())),
            get_session_detail_usecase: Arc::new(GetSessionDetailUseCase::new(repository)),
        }
    }
}
