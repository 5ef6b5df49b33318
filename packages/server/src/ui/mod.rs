//! UI 層：axum のルーター、WebSocket / HTTP ハンドラ、シャットダウン処理

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use state::AppState;
