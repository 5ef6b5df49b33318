//! UseCase: 対戦セッションへの参加（フェーズ B）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinDuelUseCase::execute() の戻り値（次に送るべきイベント）
//!
//! ### なぜこのテストが必要か
//! - 参加者には秘密の単語が要求され、開始済みの対戦への再参加には本人のビューが返ることを保証
//! - 2 人目以降の参加が拒否されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：相手の参加
//! - 異常系：ソロセッション、満員の対戦
//! - エッジケース：秘密の単語を提出済みのプレイヤーの再参加、開始後の再参加

use std::sync::Arc;

use kotoba_shared::time::Clock;

use crate::domain::{
    ConnectionId, GameConfig, PlayerName, PlayerView, SessionError, SessionId, SessionRepository,
    Timestamp,
};

use super::{delivery::Delivery, error::JoinError};

/// join-duel の後に参加者へ送るもの
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuelJoin {
    /// 秘密の単語がまだないので need-secret を送る
    NeedSecret(GameConfig),
    /// 対戦は開始済み（再参加）なので本人の started を送る
    Started(Box<PlayerView>),
    /// 秘密の単語は提出済みで相手待ち
    AwaitingOpponent,
}

/// 対戦セッション参加のユースケース
pub struct JoinDuelUseCase {
    repository: Arc<dyn SessionRepository>,
    delivery: Delivery,
    clock: Arc<dyn Clock>,
}

impl JoinDuelUseCase {
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

    pub async fn execute(
        &self,
        session_id: SessionId,
        player: PlayerName,
        connection_id: ConnectionId,
    ) -> Result<DuelJoin, JoinError> {
        let handle = self
            .repository
            .get(&session_id)
            .await
            .ok_or(JoinError::SessionNotFound)?;
        let mut session = handle.lock().await;
        let Some(duel) = session.duel() else {
            return Err(SessionError::NotADuel.into());
        };
        let has_secret = duel.has_secret(&player);

        let attachment = session.add_player(player.clone())?;
        session.touch(Timestamp::new(self.clock.now_millis()));
        self.delivery.map(&session_id, &player, connection_id).await;
        tracing::info!(
            "Player '{}' joined duel '{}' ({:?})",
            player,
            session_id,
            attachment
        );

        if session.ready_to_start() {
            return Ok(session
                .player_view(&player)
                .map_or(DuelJoin::AwaitingOpponent, |view| {
                    DuelJoin::Started(Box::new(view))
                }));
        }
        if has_secret {
            Ok(DuelJoin::AwaitingOpponent)
        } else {
            Ok(DuelJoin::NeedSecret(session.config.clone()))
        }
    }

    /// 参加者本人に need-secret / started を送信
    pub async fn notify_player(&self, session_id: &SessionId, player: &PlayerName, message: &str) {
        self.delivery.push_to_player(session_id, player, message).await;
    }
}
