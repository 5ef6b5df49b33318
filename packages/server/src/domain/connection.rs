//! Connection ↔ player mapping trait.

use async_trait::async_trait;

use super::{ConnectionId, PlayerName, SessionId};

/// Tracks which live connection currently represents a player in a session.
///
/// Mappings are upserts: a later `map` for the same player replaces the
/// earlier connection. Dropped connections are not cleaned up here; a stale
/// entry simply fails delivery.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    async fn map(&self, session_id: &SessionId, player: &PlayerName, connection_id: ConnectionId);

    async fn resolve(&self, session_id: &SessionId, player: &PlayerName) -> Option<ConnectionId>;

    /// Drop every mapping of a session (used when the session is reaped)
    async fn forget_session(&self, session_id: &SessionId);
}
