//! UseCase: 秘密の単語の提出
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitSecretUseCase::execute() と notify_started()
//!
//! ### なぜこのテストが必要か
//! - 2 人分の秘密の単語がそろった時点で一度だけ対戦が開始されることを保証
//! - 各参加者に本人のビューだけが届き、相手の秘密の単語が漏れないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：作成者 → 参加者の順に提出して開始
//! - 異常系：語長の不一致、存在しないセッション、開始後の再提出
//! - エッジケース：2 人の提出が同時に届く場合

use std::sync::Arc;

use kotoba_shared::time::Clock;

use crate::domain::{
    ConnectionId, PlayerName, PlayerView, SessionId, SessionRepository, Timestamp,
};

use super::{delivery::Delivery, error::SubmitSecretError};

/// 秘密の単語提出のユースケース
pub struct SubmitSecretUseCase {
    repository: Arc<dyn SessionRepository>,
    delivery: Delivery,
    clock: Arc<dyn Clock>,
}

impl SubmitSecretUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        delivery: Delivery,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            delivery,
            clock,
        }
    }

    /// 秘密の単語を記録する
    ///
    /// # Returns
    ///
    /// * `Ok(Some(views))` - この提出で対戦が開始した（作成者、参加者の順のビュー）
    /// * `Ok(None)` - 記録したが相手の提出待ち
    /// * `Err(SubmitSecretError)` - 記録しなかった
    pub async fn execute(
        &self,
        session_id: SessionId,
        player: PlayerName,
        secret_word: &str,
        connection_id: ConnectionId,
    ) -> Result<Option<Vec<PlayerView>>, SubmitSecretError> {
        let handle = self
            .repository
            .get(&session_id)
            .await
            .ok_or(SubmitSecretError::SessionNotFound)?;
        let mut session = handle.lock().await;
        if session.player(&player).is_some() {
            self.delivery.map(&session_id, &player, connection_id).await;
        }

        let ready = session.set_secret(&player, secret_word)?;
        session.touch(Timestamp::new(self.clock.now_millis()));
        if !ready {
            tracing::info!("Secret from '{}' recorded in duel '{}'", player, session_id);
            return Ok(None);
        }

        tracing::info!("Duel '{}' started", session_id);
        let views: Vec<PlayerView> = session
            .duel()
            .and_then(|duel| duel.pair())
            .map(|(creator, joiner)| {
                [creator, joiner]
                    .into_iter()
                    .filter_map(|name| session.player_view(name))
                    .collect()
            })
            .unwrap_or_default();
        Ok(Some(views))
    }

    /// 各参加者に本人の started を送信（ブロードキャストではない）
    pub async fn notify_started(&self, session_id: &SessionId, messages: &[(PlayerName, String)]) {
        for (player, message) in messages {
            self.delivery.push_to_player(session_id, player, message).await;
        }
    }
}
