//! Server execution logic.

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::{net::TcpListener, task::JoinHandle, time::MissedTickBehavior};
use tower_http::trace::TraceLayer;

use crate::usecase::ReapIdleSessionsUseCase;

use super::{
    handler::{get_session_detail, get_sessions, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

const MIN_REAP_INTERVAL: Duration = Duration::from_secs(1);

/// Game server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(app_state, reap_idle_sessions_usecase, Duration::from_secs(60));
/// server.run("127.0.0.1".to_string(), 4000).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// ReapIdleSessionsUseCase（アイドルセッション削除のユースケース）
    reap_idle_sessions_usecase: Arc<ReapIdleSessionsUseCase>,
    reap_interval: Duration,
}

impl Server {
    pub fn new(
        state: AppState,
        reap_idle_sessions_usecase: Arc<ReapIdleSessionsUseCase>,
        reap_interval: Duration,
    ) -> Self {
        Self {
            state: Arc::new(state),
            reap_idle_sessions_usecase,
            reap_interval: reap_interval.max(MIN_REAP_INTERVAL),
        }
    }

    /// Build the router with every endpoint
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/sessions", get(get_sessions))
            .route("/api/sessions/{session_id}", get(get_session_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the game server until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Game server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        let reaper = spawn_reaper(self.reap_idle_sessions_usecase.clone(), self.reap_interval);

        let result = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await;
        reaper.abort();
        result?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Periodically remove idle sessions
fn spawn_reaper(usecase: Arc<ReapIdleSessionsUseCase>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // 最初の tick は即座に完了するので読み捨てる
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = usecase.execute().await;
            if !removed.is_empty() {
                tracing::info!("Reaped {} idle session(s)", removed.len());
            }
        }
    })
}
