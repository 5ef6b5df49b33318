//! UseCase: ソロセッションへの参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinSessionUseCase::execute() と notify_started()
//!
//! ### なぜこのテストが必要か
//! - 参加者ごとに本人のビューだけが返ることを保証
//! - 再参加で既存の盤面が保たれることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 人目の参加
//! - 異常系：存在しないセッション、対戦セッションへの参加
//! - エッジケース：途中まで進めたプレイヤーの再参加

use std::sync::Arc;

use kotoba_shared::time::Clock;

use crate::domain::{
    ConnectionId, PlayerName, PlayerView, SessionId, SessionRepository, Timestamp,
};

use super::{delivery::Delivery, error::JoinError};

/// ソロセッション参加のユースケース
pub struct JoinSessionUseCase {
    repository: Arc<dyn SessionRepository>,
    delivery: Delivery,
    clock: Arc<dyn Clock>,
}

impl JoinSessionUseCase {
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

    /// プレイヤーをセッションに参加させる
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<PlayerView>)` - 全参加者それぞれのビュー（参加順）
    /// * `Err(JoinError)` - セッションが存在しない、または対戦セッション
    pub async fn execute(
        &self,
        session_id: SessionId,
        player: PlayerName,
        connection_id: ConnectionId,
    ) -> Result<Vec<PlayerView>, JoinError> {
        let handle = self
            .repository
            .get(&session_id)
            .await
            .ok_or(JoinError::SessionNotFound)?;
        let mut session = handle.lock().await;
        if session.is_duel() {
            return Err(JoinError::DuelSession);
        }

        let attachment = session.add_player(player.clone())?;
        session.touch(Timestamp::new(self.clock.now_millis()));
        self.delivery.map(&session_id, &player, connection_id).await;

        tracing::info!(
            "Player '{}' joined session '{}' ({:?})",
            player,
            session_id,
            attachment
        );
        Ok(session
            .player_names()
            .iter()
            .filter_map(|name| session.player_view(name))
            .collect())
    }

    /// 各参加者に本人の started を送信
    pub async fn notify_started(&self, session_id: &SessionId, messages: &[(PlayerName, String)]) {
        for (player, message) in messages {
            self.delivery.push_to_player(session_id, player, message).await;
        }
    }
}
