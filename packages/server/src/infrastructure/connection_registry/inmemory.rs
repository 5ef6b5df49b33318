//! インメモリの接続 ↔ プレイヤー対応表
//!
//! session_id → (player_name → connection_id) の二段の HashMap。
//! 同じプレイヤーの再接続は後勝ちで上書きされます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, ConnectionRegistry, PlayerName, SessionId};

#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    sessions: Mutex<HashMap<SessionId, HashMap<PlayerName, ConnectionId>>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn map(&self, session_id: &SessionId, player: &PlayerName, connection_id: ConnectionId) {
        let mut sessions = self.sessions.lock().await;
        let previous = sessions
            .entry(session_id.clone())
            .or_default()
            .insert(player.clone(), connection_id.clone());
        match previous {
            Some(old) if old != connection_id => tracing::debug!(
                "Player '{}' in session '{}' moved from connection '{}' to '{}'",
                player,
                session_id,
                old,
                connection_id
            ),
            Some(_) => {}
            None => tracing::debug!(
                "Player '{}' in session '{}' mapped to connection '{}'",
                player,
                session_id,
                connection_id
            ),
        }
    }

    async fn resolve(&self, session_id: &SessionId, player: &PlayerName) -> Option<ConnectionId> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(session_id)
            .and_then(|players| players.get(player))
            .cloned()
    }

    async fn forget_session(&self, session_id: &SessionId) {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(session_id);
    }
}
