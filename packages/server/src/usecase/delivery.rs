//! 接続へのイベント配送
//!
//! プレイヤー名を ConnectionRegistry で接続 ID に解決し、MessagePusher で
//! 送信する。配送の失敗はログに残すだけで、セッションの状態には影響しない。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, MessagePusher, PlayerName, SessionId};

/// プレイヤー宛ての配送を担うヘルパー（各 UseCase で共有）
#[derive(Clone)]
pub struct Delivery {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl Delivery {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// プレイヤー名を要求元の接続に紐付ける（後勝ち）
    pub async fn map(&self, session_id: &SessionId, player: &PlayerName, connection_id: ConnectionId) {
        self.registry.map(session_id, player, connection_id).await;
    }

    pub async fn forget_session(&self, session_id: &SessionId) {
        self.registry.forget_session(session_id).await;
    }

    /// 1 人のプレイヤーに送信
    ///
    /// 接続が紐付いていない、または送信に失敗した場合は `false`
    pub async fn push_to_player(
        &self,
        session_id: &SessionId,
        player: &PlayerName,
        content: &str,
    ) -> bool {
        let Some(connection_id) = self.registry.resolve(session_id, player).await else {
            tracing::warn!(
                "No connection mapped for player '{}' in session '{}'",
                player,
                session_id
            );
            return false;
        };
        self.push_to_connection(&connection_id, content).await
    }

    /// 特定の接続に送信
    pub async fn push_to_connection(&self, connection_id: &ConnectionId, content: &str) -> bool {
        match self.message_pusher.push_to(connection_id, content).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to deliver to '{}': {}", connection_id, e);
                false
            }
        }
    }

    /// 複数プレイヤーに同じ内容を送信
    ///
    /// 同じ接続に紐付いたプレイヤーが複数いても 1 回だけ送る。
    pub async fn broadcast(&self, session_id: &SessionId, players: &[PlayerName], content: &str) {
        let mut targets: Vec<ConnectionId> = Vec::with_capacity(players.len());
        for player in players {
            match self.registry.resolve(session_id, player).await {
                Some(connection_id) if !targets.contains(&connection_id) => {
                    targets.push(connection_id)
                }
                Some(_) => {}
                None => tracing::warn!(
                    "No connection mapped for player '{}' in session '{}'",
                    player,
                    session_id
                ),
            }
        }
        if targets.is_empty() {
            return;
        }
        if let Err(e) = self.message_pusher.broadcast(targets, content).await {
            tracing::warn!("Broadcast in session '{}' failed: {}", session_id, e);
        }
    }
}
