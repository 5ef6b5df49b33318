//! Repository trait 定義
//!
//! セッションストアのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{RepositoryError, Session, SessionId, Timestamp};

/// 1 セッションへの共有ハンドル
///
/// 推測・秘密の単語の登録・参加はこのロックを保持したまま行われるため、
/// 同一セッションへの操作は到着順に直列化される。
pub type SessionHandle = Arc<Mutex<Session>>;

/// Session Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// セッションを登録し、ハンドルを返す
    async fn insert(&self, session: Session) -> Result<SessionHandle, RepositoryError>;

    /// セッション ID からハンドルを取得
    async fn get(&self, id: &SessionId) -> Option<SessionHandle>;

    /// 全てのセッションのハンドルを取得
    async fn list(&self) -> Vec<SessionHandle>;

    /// `cutoff` より前から操作のないセッションを削除し、その ID を返す
    ///
    /// ハンドルが UseCase に保持されているセッションは削除しない。
    async fn remove_idle(&self, cutoff: Timestamp) -> Vec<SessionId>;

    /// 登録されているセッション数
    async fn count(&self) -> usize;
}
