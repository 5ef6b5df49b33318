//! WebSocket connection handlers.
//!
//! Each socket gets a fresh `ConnectionId`. Inbound frames are decoded into
//! [`ClientRequest`]s and dispatched to the use cases; acks are queued on the
//! connection's own channel before any pushed event, so a client always sees
//! the ack for a request first. Guess results are pushed by the use case while
//! it still holds the session, so `updated` and `outcome` frames of one session
//! reach every client in the order the guesses were applied.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::{
    domain::{
        ConnectionId, ConnectionIdFactory, DuelOutcome, GameConfig, GuessOutcome, PlayerName,
        PlayerView, PusherChannel, SessionId,
    },
    infrastructure::dto::websocket::{
        AckMessage, ClientRequest, GameConfigDto, MessageType, NeedSecretMessage, OutcomeMessage,
        StartedMessage, UpdatedMessage, WaitingMessage,
    },
    ui::state::AppState,
    usecase::{DuelJoin, GuessPresenter},
};

const MALFORMED_REQUEST: &str = "Malformed request";
const GAME_NOT_FOUND: &str = "Game not found";

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Both acks and pushed events for this connection flow through `rx`.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionIdFactory::generate();
    let (tx, rx) = mpsc::unbounded_channel();
    state
        .message_pusher
        .register_connection(connection_id.clone(), tx.clone())
        .await;
    tracing::info!("Connection '{}' opened", connection_id);

    let (sender, mut receiver) = socket.split();

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", connection_id_clone, text);
                    dispatch(&state_clone, &connection_id_clone, &tx, text.as_str()).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // 対応表はそのまま残す（同じ名前で再接続すれば上書きされる）
    state
        .message_pusher
        .unregister_connection(&connection_id)
        .await;
    tracing::info!("Connection '{}' closed", connection_id);
}

/// Serialize a DTO, logging and dropping it on failure
fn to_json<T: Serialize>(message: &T) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize outbound message: {}", e);
            None
        }
    }
}

/// Queue a message on the requesting connection
fn reply<T: Serialize>(reply_tx: &PusherChannel, message: &T) {
    if let Some(json) = to_json(message) {
        if reply_tx.send(json).is_err() {
            tracing::debug!("Reply dropped: connection already closed");
        }
    }
}

async fn dispatch(
    state: &AppState,
    connection_id: &ConnectionId,
    reply_tx: &PusherChannel,
    text: &str,
) {
    let request = match serde_json::from_str::<ClientRequest>(text) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Malformed request from '{}': {}", connection_id, e);
            reply(reply_tx, &AckMessage::error(None, MALFORMED_REQUEST));
            return;
        }
    };
    let request_id = request.request_id();

    let result = match request {
        ClientRequest::CreateSession {
            player_name,
            config,
            ..
        } => create_session(state, connection_id, reply_tx, request_id, player_name, config).await,
        ClientRequest::CreateDuel {
            player_name,
            config,
            secret_word,
            ..
        } => {
            create_duel(
                state,
                connection_id,
                reply_tx,
                request_id,
                player_name,
                config,
                secret_word,
            )
            .await
        }
        ClientRequest::JoinSession {
            session_id,
            player_name,
            ..
        } => join_session(state, connection_id, reply_tx, request_id, session_id, player_name).await,
        ClientRequest::JoinDuel {
            session_id,
            player_name,
            ..
        } => join_duel(state, connection_id, reply_tx, request_id, session_id, player_name).await,
        ClientRequest::SubmitSecret {
            session_id,
            player_name,
            secret_word,
            ..
        } => {
            submit_secret(
                state,
                connection_id,
                reply_tx,
                request_id,
                session_id,
                player_name,
                secret_word,
            )
            .await
        }
        ClientRequest::SubmitGuess {
            session_id,
            player_name,
            guess,
        } => {
            submit_guess(state, connection_id, session_id, player_name, guess).await;
            Ok(())
        }
    };

    if let Err(reason) = result {
        tracing::warn!("Request from '{}' rejected: {}", connection_id, reason);
        reply(reply_tx, &AckMessage::error(request_id, reason));
    }
}

// ========================================
// String → Domain Model
// ========================================

fn parse_player(player_name: String) -> Result<PlayerName, String> {
    PlayerName::try_from(player_name).map_err(|e| e.to_string())
}

fn parse_session_id(session_id: String) -> Result<SessionId, String> {
    SessionId::try_from(session_id).map_err(|_| GAME_NOT_FOUND.to_string())
}

fn parse_config(config: GameConfigDto) -> Result<GameConfig, String> {
    GameConfig::try_from(config).map_err(|e| e.to_string())
}

// ========================================
// Requests
// ========================================

async fn create_session(
    state: &AppState,
    connection_id: &ConnectionId,
    reply_tx: &PusherChannel,
    request_id: Option<u64>,
    player_name: String,
    config: GameConfigDto,
) -> Result<(), String> {
    let owner = parse_player(player_name)?;
    let config = parse_config(config)?;

    let view = state
        .create_session_usecase
        .execute(owner.clone(), config, connection_id.clone())
        .await
        .map_err(|e| e.reason())?;
    let session_id = view.session_id.clone();
    reply(
        reply_tx,
        &AckMessage::ok(request_id, Some(session_id.to_string())),
    );

    if let Some(json) = to_json(&StartedMessage::from(view)) {
        state
            .create_session_usecase
            .notify_started(&session_id, &owner, &json)
            .await;
    }
    Ok(())
}

async fn create_duel(
    state: &AppState,
    connection_id: &ConnectionId,
    reply_tx: &PusherChannel,
    request_id: Option<u64>,
    player_name: String,
    config: GameConfigDto,
    secret_word: Option<String>,
) -> Result<(), String> {
    let owner = parse_player(player_name)?;
    let config = parse_config(config)?;

    let created = state
        .create_duel_usecase
        .execute(owner.clone(), config, secret_word, connection_id.clone())
        .await
        .map_err(|e| e.reason())?;
    reply(
        reply_tx,
        &AckMessage::ok(request_id, Some(created.session_id.to_string())),
    );

    let waiting = WaitingMessage {
        r#type: MessageType::Waiting,
        session_id: created.session_id.to_string(),
        config: GameConfigDto::from(&created.config),
        secret_accepted: created.secret_accepted,
    };
    if let Some(json) = to_json(&waiting) {
        state
            .create_duel_usecase
            .notify_waiting(&created.session_id, &owner, &json)
            .await;
    }
    Ok(())
}

async fn join_session(
    state: &AppState,
    connection_id: &ConnectionId,
    reply_tx: &PusherChannel,
    request_id: Option<u64>,
    session_id: String,
    player_name: String,
) -> Result<(), String> {
    let session_id = parse_session_id(session_id)?;
    let player = parse_player(player_name)?;

    let views = state
        .join_session_usecase
        .execute(session_id.clone(), player, connection_id.clone())
        .await
        .map_err(|e| e.reason())?;
    reply(
        reply_tx,
        &AckMessage::ok(request_id, Some(session_id.to_string())),
    );

    let messages = started_messages(views);
    state
        .join_session_usecase
        .notify_started(&session_id, &messages)
        .await;
    Ok(())
}

async fn join_duel(
    state: &AppState,
    connection_id: &ConnectionId,
    reply_tx: &PusherChannel,
    request_id: Option<u64>,
    session_id: String,
    player_name: String,
) -> Result<(), String> {
    let session_id = parse_session_id(session_id)?;
    let player = parse_player(player_name)?;

    let joined = state
        .join_duel_usecase
        .execute(session_id.clone(), player.clone(), connection_id.clone())
        .await
        .map_err(|e| e.reason())?;
    reply(
        reply_tx,
        &AckMessage::ok(request_id, Some(session_id.to_string())),
    );

    let json = match joined {
        DuelJoin::NeedSecret(config) => to_json(&NeedSecretMessage {
            r#type: MessageType::NeedSecret,
            session_id: session_id.to_string(),
            config: GameConfigDto::from(&config),
        }),
        DuelJoin::Started(view) => to_json(&StartedMessage::from(*view)),
        DuelJoin::AwaitingOpponent => None,
    };
    if let Some(json) = json {
        state
            .join_duel_usecase
            .notify_player(&session_id, &player, &json)
            .await;
    }
    Ok(())
}

async fn submit_secret(
    state: &AppState,
    connection_id: &ConnectionId,
    reply_tx: &PusherChannel,
    request_id: Option<u64>,
    session_id: String,
    player_name: String,
    secret_word: String,
) -> Result<(), String> {
    let session_id = parse_session_id(session_id)?;
    let player = parse_player(player_name)?;

    let started = state
        .submit_secret_usecase
        .execute(
            session_id.clone(),
            player,
            &secret_word,
            connection_id.clone(),
        )
        .await
        .map_err(|e| e.reason())?;
    reply(
        reply_tx,
        &AckMessage::ok(request_id, Some(session_id.to_string())),
    );

    if let Some(views) = started {
        let messages = started_messages(views);
        state
            .submit_secret_usecase
            .notify_started(&session_id, &messages)
            .await;
    }
    Ok(())
}

/// Guesses have no ack; every result or error arrives as `updated`
async fn submit_guess(
    state: &AppState,
    connection_id: &ConnectionId,
    session_id: String,
    player_name: String,
    guess: String,
) {
    let usecase = &state.submit_guess_usecase;
    let parsed = parse_session_id(session_id).and_then(|session_id| {
        parse_player(player_name.clone()).map(|player| (session_id, player))
    });
    let (session_id, player) = match parsed {
        Ok(parsed) => parsed,
        Err(reason) => {
            if let Some(json) = to_json(&UpdatedMessage::error(player_name, reason)) {
                usecase.reply(connection_id, &json).await;
            }
            return;
        }
    };

    match usecase
        .execute(
            session_id,
            player.clone(),
            &guess,
            connection_id.clone(),
            &GuessFrames,
        )
        .await
    {
        Ok(submission) => {
            if !submission.is_broadcast() {
                tracing::debug!("Guess from '{}' not accepted", player);
            }
        }
        Err(e) => {
            tracing::warn!("Guess from '{}' rejected: {}", player, e);
            if let Some(json) = to_json(&UpdatedMessage::error(player.as_str(), e.reason())) {
                usecase.reply(connection_id, &json).await;
            }
        }
    }
}

/// Renders guess results as `updated` and `outcome` frames
struct GuessFrames;

impl GuessPresenter for GuessFrames {
    fn updated(&self, outcome: &GuessOutcome) -> Option<String> {
        to_json(&UpdatedMessage::from(outcome.clone()))
    }

    fn outcome(&self, outcome: &DuelOutcome) -> Option<String> {
        to_json(&OutcomeMessage::from(outcome.clone()))
    }
}

/// One `started` per player, each carrying only that player's view
fn started_messages(views: Vec<PlayerView>) -> Vec<(PlayerName, String)> {
    views
        .into_iter()
        .filter_map(|view| {
            let player = view.player_name.clone();
            to_json(&StartedMessage::from(view)).map(|json| (player, json))
        })
        .collect()
}
