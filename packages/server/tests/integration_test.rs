//! Integration tests for the game server over real WebSocket / HTTP connections.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use kotoba_server::{
    domain::WordPool,
    infrastructure::{
        connection_registry::InMemoryConnectionRegistry, dictionary::WordListDictionary,
        message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository,
    },
    ui::{AppState, Server},
    usecase::{Delivery, ReapIdleSessionsUseCase},
};
use kotoba_shared::time::SystemClock;
use serde_json::{Value, json};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const TEST_WORDS: &str = "crane\nslate\npious\nghost\n";
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Helper struct to run the server in-process on an ephemeral port
struct TestServer {
    addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a server whose solo answer is always "crane"
    async fn start() -> Self {
        let repository = Arc::new(InMemorySessionRepository::new());
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::new());
        let clock = Arc::new(SystemClock);

        let app_state = AppState::new(
            repository.clone(),
            registry.clone(),
            message_pusher.clone(),
            Arc::new(WordListDictionary::parse(TEST_WORDS)),
            Arc::new(WordPool::new(["crane"])),
            clock.clone(),
        );
        let reaper = Arc::new(ReapIdleSessionsUseCase::new(
            repository,
            Delivery::new(registry, message_pusher),
            clock,
            Duration::from_secs(3600),
        ));
        let router = Server::new(app_state, reaper, Duration::from_secs(60)).router();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        TestServer { addr, handle }
    }

    fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Helper struct wrapping one WebSocket client connection
struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    async fn connect(server: &TestServer) -> Self {
        let (ws, _) = connect_async(server.ws_url()).await.unwrap();
        TestClient { ws }
    }

    async fn send(&mut self, request: Value) {
        self.ws
            .send(Message::Text(request.to_string().into()))
            .await
            .unwrap();
    }

    /// Receive the next JSON frame, failing the test after a timeout
    async fn recv(&mut self) -> Value {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("connection closed")
                .unwrap();
            if let Message::Text(text) = frame {
                return serde_json::from_str(text.as_str()).unwrap();
            }
        }
    }

    /// Receive the next frame and check its type
    async fn expect(&mut self, message_type: &str) -> Value {
        let message = self.recv().await;
        assert_eq!(message["type"], message_type, "unexpected frame: {}", message);
        message
    }
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが ok を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let body: Value = reqwest::get(server.http_url("/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_full_duel_over_websocket() {
    // テスト項目: 作成 → 参加 → 秘密の単語の交換 → 推測 → 決着までの対戦が通しで動く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server).await;
    let mut bob = TestClient::connect(&server).await;

    // when (操作): alice が秘密の単語付きで対戦を作成
    alice
        .send(json!({
            "type": "create-duel",
            "request_id": 1,
            "player_name": "alice",
            "config": {},
            "secret_word": "crane"
        }))
        .await;

    // then (期待する結果):
    let ack = alice.expect("ack").await;
    assert_eq!(ack["ok"], true);
    assert_eq!(ack["request_id"], 1);
    let session_id = ack["session_id"].as_str().unwrap().to_string();
    let waiting = alice.expect("waiting").await;
    assert_eq!(waiting["secret_accepted"], true);
    assert_eq!(waiting["config"]["word_length"], 5);

    // when (操作): bob が参加
    bob.send(json!({
        "type": "join-duel",
        "request_id": 2,
        "session_id": session_id,
        "player_name": "bob"
    }))
    .await;

    // then (期待する結果):
    assert_eq!(bob.expect("ack").await["ok"], true);
    assert_eq!(bob.expect("need-secret").await["session_id"], session_id);

    // when (操作): bob が秘密の単語を提出
    bob.send(json!({
        "type": "submit-secret",
        "request_id": 3,
        "session_id": session_id,
        "player_name": "bob",
        "secret_word": "slate"
    }))
    .await;

    // then (期待する結果): それぞれに本人だけのビューが届く
    assert_eq!(bob.expect("ack").await["ok"], true);
    let bob_started = bob.expect("started").await;
    assert_eq!(bob_started["player_name"], "bob");
    assert_eq!(bob_started["mode"], "duel");
    assert!(bob_started.get("answer").is_none());
    let alice_started = alice.expect("started").await;
    assert_eq!(alice_started["player_name"], "alice");

    // when (操作): alice は 1 手で正解（相手の秘密の単語 "slate"）
    alice
        .send(json!({
            "type": "submit-guess",
            "session_id": session_id,
            "player_name": "alice",
            "guess": "slate"
        }))
        .await;

    // then (期待する結果): 結果は両者に届く
    for client in [&mut alice, &mut bob] {
        let updated = client.expect("updated").await;
        assert_eq!(updated["player_name"], "alice");
        assert_eq!(updated["result"]["last_result"], "win");
        assert_eq!(updated["result"]["answer"], "slate");
    }

    // when (操作): bob は 2 手で正解
    for guess in ["pious", "crane"] {
        bob.send(json!({
            "type": "submit-guess",
            "session_id": session_id,
            "player_name": "bob",
            "guess": guess
        }))
        .await;
    }

    // then (期待する結果): 少ない手数の alice が勝者
    for client in [&mut alice, &mut bob] {
        let first = client.expect("updated").await;
        assert_eq!(first["result"]["current_row"], 1);
        let second = client.expect("updated").await;
        assert_eq!(second["result"]["guesses_used"], 2);
        let outcome = client.expect("outcome").await;
        assert_eq!(outcome["winner"], "alice");
        assert_eq!(outcome["results"][0]["guesses_used"], 1);
        assert_eq!(outcome["results"][1]["id"], "bob");
    }

    // HTTP の詳細には秘密の単語も盤面も含まれない
    let response = reqwest::get(server.http_url(&format!("/api/sessions/{}", session_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body = response.text().await.unwrap();
    let detail: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(detail["mode"], "duel");
    assert_eq!(detail["players"].as_array().unwrap().len(), 2);
    assert!(!body.contains("slate"));
    assert!(!body.contains("crane"));
}

#[tokio::test]
async fn test_solo_input_rejection_goes_only_to_submitter() {
    // テスト項目: 語長違いの推測は本人にだけ届き、正解は参加者全員に届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server).await;
    let mut bob = TestClient::connect(&server).await;
    alice
        .send(json!({"type": "create-session", "request_id": 1, "player_name": "alice"}))
        .await;
    let session_id = alice.expect("ack").await["session_id"]
        .as_str()
        .unwrap()
        .to_string();
    let started = alice.expect("started").await;
    assert_eq!(started["board"], json!(["", "", "", "", "", ""]));

    bob.send(json!({
        "type": "join-session",
        "request_id": 2,
        "session_id": session_id,
        "player_name": "bob"
    }))
    .await;
    assert_eq!(bob.expect("ack").await["ok"], true);
    assert_eq!(bob.expect("started").await["player_name"], "bob");
    assert_eq!(alice.expect("started").await["player_name"], "alice");

    // when (操作):
    bob.send(json!({
        "type": "submit-guess",
        "session_id": session_id,
        "player_name": "bob",
        "guess": "cat"
    }))
    .await;
    bob.send(json!({
        "type": "submit-guess",
        "session_id": session_id,
        "player_name": "bob",
        "guess": "crane"
    }))
    .await;

    // then (期待する結果):
    let rejected = bob.expect("updated").await;
    assert_eq!(rejected["message"], "Not enough letters");
    assert!(rejected.get("result").is_none());

    let won = bob.expect("updated").await;
    assert_eq!(won["result"]["last_result"], "win");
    // alice には却下は届かず、正解だけが届く
    let seen_by_alice = alice.expect("updated").await;
    assert_eq!(seen_by_alice["player_name"], "bob");
    assert_eq!(seen_by_alice["result"]["guesses_used"], 1);
}

#[tokio::test]
async fn test_error_acks() {
    // テスト項目: 不正なフレームと存在しないセッションには理由付きのエラー ack が返る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut client = TestClient::connect(&server).await;

    // when (操作):
    client
        .ws
        .send(Message::Text("not json".into()))
        .await
        .unwrap();
    client
        .send(json!({
            "type": "join-session",
            "request_id": 9,
            "session_id": "0123456789abcdef",
            "player_name": "carol"
        }))
        .await;

    // then (期待する結果):
    let malformed = client.expect("ack").await;
    assert_eq!(malformed["ok"], false);
    assert_eq!(malformed["error"], "Malformed request");
    let not_found = client.expect("ack").await;
    assert_eq!(not_found["request_id"], 9);
    assert_eq!(not_found["error"], "Game not found");
    assert!(not_found.get("session_id").is_none());
}

#[tokio::test]
async fn test_unknown_session_detail_is_404() {
    // テスト項目: 存在しないセッションの詳細は 404 になる
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let response = reqwest::get(server.http_url("/api/sessions/does-not-exist"))
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}
