//! UseCase: セッション一覧・詳細の取得（HTTP API 用、読み取りのみ）

use std::sync::Arc;

use crate::domain::{Session, SessionId, SessionRepository};

use super::error::GetSessionDetailError;

/// セッション一覧取得のユースケース
pub struct GetSessionsUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl GetSessionsUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// 全セッションのスナップショット（作成順）
    pub async fn execute(&self) -> Vec<Session> {
        let mut sessions = Vec::new();
        for handle in self.repository.list().await {
            sessions.push(handle.lock().await.clone());
        }
        sessions.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        sessions
    }
}

/// セッション詳細取得のユースケース
pub struct GetSessionDetailUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl GetSessionDetailUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, session_id: &SessionId) -> Result<Session, GetSessionDetailError> {
        let handle = self
            .repository
            .get(session_id)
            .await
            .ok_or(GetSessionDetailError::NotFound)?;
        let session = handle.lock().await.clone();
        Ok(session)
    }
}
