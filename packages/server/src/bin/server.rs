//! Kotoba game server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin kotoba-server
//! cargo run --bin kotoba-server -- --host 0.0.0.0 --port 4000 --dictionary words.txt
//! ```

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use kotoba_server::{
    infrastructure::{
        connection_registry::InMemoryConnectionRegistry, dictionary::WordListDictionary,
        message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
    },
    ui::{AppState, Server},
    usecase::{Delivery, ReapIdleSessionsUseCase},
};
use kotoba_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "kotoba-server")]
#[command(about = "Multiplayer word-guessing game server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "4000")]
    port: u16,

    /// Newline-separated word list replacing the built-in dictionary
    #[arg(short = 'd', long)]
    dictionary: Option<PathBuf>,

    /// Seconds without activity after which a session is removed
    #[arg(long, default_value = "3600")]
    idle_timeout_secs: u64,

    /// Seconds between idle-session sweeps
    #[arg(long, default_value = "60")]
    reap_interval_secs: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Dictionary and answer pool
    // 2. Repository / ConnectionRegistry / MessagePusher
    // 3. UseCases (AppState)
    // 4. Server

    // 1. Dictionary
    let dictionary = match &args.dictionary {
        Some(path) => match WordListDictionary::from_file(path) {
            Ok(dictionary) => dictionary,
            Err(e) => {
                tracing::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => WordListDictionary::builtin(),
    };
    let word_pool = Arc::new(dictionary.word_pool());
    tracing::info!("Dictionary loaded with {} words", dictionary.len());

    // 2. In-memory stores and the WebSocket pusher
    let repository = Arc::new(InMemorySessionRepository::new());
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let clock = Arc::new(SystemClock);

    // 3. UseCases
    let app_state = AppState::new(
        repository.clone(),
        registry.clone(),
        message_pusher.clone(),
        Arc::new(dictionary),
        word_pool,
        clock.clone(),
    );
    let reap_idle_sessions_usecase = Arc::new(ReapIdleSessionsUseCase::new(
        repository,
        Delivery::new(registry, message_pusher),
        clock,
        Duration::from_secs(args.idle_timeout_secs),
    ));

    // 4. Create and run the server
    let server = Server::new(
        app_state,
        reap_idle_sessions_usecase,
        Duration::from_secs(args.reap_interval_secs),
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
