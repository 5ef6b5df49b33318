//! InMemory Session Repository 実装
//!
//! ドメイン層が定義する SessionRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! 外側の Mutex は ID → ハンドルの対応だけを守り、セッション本体は
//! ハンドルごとの Mutex で守られます。異なるセッションへの操作は互いに
//! ブロックしません。
//!
//! アイドル削除は登録と取得と同じ外側の Mutex の下で行うため、ハンドルを
//! 取得した UseCase が削除済みのセッションを操作することはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    RepositoryError, Session, SessionHandle, SessionId, SessionRepository, Timestamp,
};

/// インメモリ Session Repository 実装
#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: Mutex<HashMap<SessionId, SessionHandle>>,
}

impl InMemorySessionRepository {
    /// 新しい InMemorySessionRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert(&self, session: Session) -> Result<SessionHandle, RepositoryError> {
        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(&session.id) {
            return Err(RepositoryError::DuplicateSessionId(
                session.id.as_str().to_string(),
            ));
        }
        let id = session.id.clone();
        let handle = Arc::new(Mutex::new(session));
        sessions.insert(id, handle.clone());
        Ok(handle)
    }

    async fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        let sessions = self.sessions.lock().await;
        sessions.get(id).cloned()
    }

    async fn list(&self) -> Vec<SessionHandle> {
        let sessions = self.sessions.lock().await;
        sessions.values().cloned().collect()
    }

    async fn remove_idle(&self, cutoff: Timestamp) -> Vec<SessionId> {
        let mut sessions = self.sessions.lock().await;

        let mut idle = Vec::new();
        for (id, handle) in sessions.iter() {
            // ハンドルを取得済みの UseCase がいる、または処理中のセッションはアクティブとみなす
            if Arc::strong_count(handle) > 1 {
                continue;
            }
            let Ok(session) = handle.try_lock() else {
                continue;
            };
            if session.last_activity < cutoff {
                idle.push(id.clone());
            }
        }

        for id in &idle {
            sessions.remove(id);
        }
        idle
    }

    async fn count(&self) -> usize {
        let sessions = self.sessions.lock().await;
        sessions.len()
    }
}
