//! UseCase: アイドルセッションの削除
//!
//! 一定時間操作のないセッションをストアから取り除き、接続の対応表も消す。

use std::{sync::Arc, time::Duration};

use kotoba_shared::time::{Clock, secs_to_millis};

use crate::domain::{SessionId, SessionRepository, Timestamp};

use super::delivery::Delivery;

/// アイドルセッション削除のユースケース
pub struct ReapIdleSessionsUseCase {
    repository: Arc<dyn SessionRepository>,
    delivery: Delivery,
    clock: Arc<dyn Clock>,
    idle_timeout: Duration,
}

impl ReapIdleSessionsUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        delivery: Delivery,
        clock: Arc<dyn Clock>,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            repository,
            delivery,
            clock,
            idle_timeout,
        }
    }

    /// `idle_timeout` より長く操作のないセッションを削除し、その ID を返す
    pub async fn execute(&self) -> Vec<SessionId> {
        let now = self.clock.now_millis();
        let cutoff = Timestamp::new(now.saturating_sub(secs_to_millis(self.idle_timeout.as_secs())));

        let removed = self.repository.remove_idle(cutoff).await;
        for session_id in &removed {
            self.delivery.forget_session(session_id).await;
            tracing::info!("Session '{}' reaped after inactivity", session_id);
        }
        removed
    }
}
