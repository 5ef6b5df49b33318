//! UseCase: ソロセッション作成
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateSessionUseCase::execute() と notify_started()
//!
//! ### なぜこのテストが必要か
//! - 作成直後のセッションがオーナーの空の盤面を持ち、正解が設定に合った長さであることを保証
//! - オーナーの接続が紐付けられ、started が本人に届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：デフォルト設定での作成
//! - エッジケース：extra_word_pool だけが語長に合う場合

use std::sync::Arc;

use kotoba_shared::time::Clock;

use crate::domain::{
    ConnectionId, GameConfig, PlayerName, PlayerView, Session, SessionId, SessionIdFactory,
    SessionRepository, Timestamp, WordPool,
};

use super::{delivery::Delivery, error::CreateSessionError};

/// ソロセッション作成のユースケース
pub struct CreateSessionUseCase {
    repository: Arc<dyn SessionRepository>,
    delivery: Delivery,
    word_pool: Arc<WordPool>,
    clock: Arc<dyn Clock>,
}

impl CreateSessionUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        delivery: Delivery,
        word_pool: Arc<WordPool>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            delivery,
            word_pool,
            clock,
        }
    }

    /// セッションを作成し、オーナーを要求元の接続に紐付ける
    ///
    /// # Returns
    ///
    /// * `Ok(PlayerView)` - オーナー自身の初期ビュー（`session_id` を含む）
    /// * `Err(CreateSessionError)` - 登録失敗
    pub async fn execute(
        &self,
        owner: PlayerName,
        config: GameConfig,
        connection_id: ConnectionId,
    ) -> Result<PlayerView, CreateSessionError> {
        let answer = self.word_pool.pick_answer(&config, &mut rand::thread_rng());
        let now = Timestamp::new(self.clock.now_millis());
        let session = Session::new(SessionIdFactory::generate(), owner.clone(), config, answer, now);
        let view = session.owner_view();

        let handle = self.repository.insert(session).await?;
        let session_id = handle.lock().await.id.clone();
        self.delivery.map(&session_id, &owner, connection_id).await;

        tracing::info!("Session '{}' created by '{}'", session_id, owner);
        Ok(view)
    }

    /// オーナーに started を送信
    pub async fn notify_started(&self, session_id: &SessionId, owner: &PlayerName, message: &str) {
        self.delivery.push_to_player(session_id, owner, message).await;
    }
}
