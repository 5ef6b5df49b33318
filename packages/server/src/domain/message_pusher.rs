//! MessagePusher trait 定義
//!
//! 接続ごとのメッセージ送信のインターフェース。配送の失敗はセッションの状態に
//! 影響しない：呼び出し側はログに残すだけでよい。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError};

/// 接続へメッセージを流すチャンネル
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録
    async fn register_connection(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続を登録解除
    async fn unregister_connection(&self, connection_id: &ConnectionId);

    /// 特定の接続にメッセージを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続にメッセージを送信（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
