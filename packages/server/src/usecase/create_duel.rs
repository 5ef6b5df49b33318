//! UseCase: 対戦セッション作成
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateDuelUseCase::execute() と notify_waiting()
//!
//! ### なぜこのテストが必要か
//! - 作成者の秘密の単語がその場で記録されること（フェーズ A）を保証
//! - 不正な秘密の単語でもセッション自体は作成され、後から submit-secret できることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：語長の合う秘密の単語付きで作成
//! - 異常系：語長の合わない秘密の単語
//! - エッジケース：秘密の単語なしで作成

use std::sync::Arc;

use kotoba_shared::time::Clock;

use crate::domain::{
    ConnectionId, GameConfig, PlayerName, Session, SessionId, SessionIdFactory, SessionRepository,
    Timestamp, WordPool,
};

use super::{delivery::Delivery, error::CreateSessionError};

/// 作成された対戦セッションの情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuelCreated {
    pub session_id: SessionId,
    pub config: GameConfig,
    /// 作成時に渡された秘密の単語が記録されたか
    pub secret_accepted: bool,
}

/// 対戦セッション作成のユースケース
pub struct CreateDuelUseCase {
    repository: Arc<dyn SessionRepository>,
    delivery: Delivery,
    word_pool: Arc<WordPool>,
    clock: Arc<dyn Clock>,
}

impl CreateDuelUseCase {
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

    /// 対戦相手待ちのセッションを作成する
    ///
    /// `secret_word` は語長が合えばその場で記録される。記録できなかった場合も
    /// セッションは作成され、`secret_accepted` が `false` になる。
    pub async fn execute(
        &self,
        owner: PlayerName,
        config: GameConfig,
        secret_word: Option<String>,
        connection_id: ConnectionId,
    ) -> Result<DuelCreated, CreateSessionError> {
        let answer = self.word_pool.pick_answer(&config, &mut rand::thread_rng());
        let now = Timestamp::new(self.clock.now_millis());
        let mut session = Session::new_duel(
            SessionIdFactory::generate(),
            owner.clone(),
            config.clone(),
            answer,
            now,
        );

        let secret_accepted = match secret_word {
            Some(word) => match session.set_secret(&owner, &word) {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!("Inline secret from '{}' rejected: {}", owner, e);
                    false
                }
            },
            None => false,
        };

        let session_id = session.id.clone();
        self.repository.insert(session).await?;
        self.delivery.map(&session_id, &owner, connection_id).await;

        tracing::info!("Duel session '{}' created by '{}'", session_id, owner);
        Ok(DuelCreated {
            session_id,
            config,
            secret_accepted,
        })
    }

    /// 作成者に waiting を送信
    pub async fn notify_waiting(&self, session_id: &SessionId, owner: &PlayerName, message: &str) {
        self.delivery.push_to_player(session_id, owner, message).await;
    }
}
