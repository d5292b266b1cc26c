//! Integration tests against a scripted stub of the game service.
//!
//! The stub knows one room, "ABCD", shared by mark and helly, plus a
//! room "SECR" that mark may not enter. Valid bearer tokens are minted
//! by POST /api/login for mark/lumon123.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;

use lumon::app::api::ApiClient;
use lumon::app::errors::ApiError;
use lumon::app::session::Session;
use lumon::app::storage::Storage;
use lumon::app::sync::Conversation;
use lumon::app::types::ClientConfig;

const VALID_TOKEN: &str = "token-mark";

#[derive(Default)]
struct StubState {
    messages: Vec<serde_json::Value>,
    next_id: i64,
    stream_hits: usize,
}

type Shared = Arc<Mutex<StubState>>;

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn authorized(headers: &HeaderMap) -> bool {
    bearer(headers) == Some(VALID_TOKEN)
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(Form(form): Form<LoginForm>) -> impl IntoResponse {
    if form.username == "mark" && form.password == "lumon123" {
        Json(serde_json::json!({
            "access_token": VALID_TOKEN,
            "token_type": "bearer",
        }))
        .into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn me(headers: HeaderMap) -> impl IntoResponse {
    if authorized(&headers) {
        Json(serde_json::json!({ "username": "mark", "role": "player" })).into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

fn room_response(code4: &str, headers: &HeaderMap) -> Result<serde_json::Value, StatusCode> {
    if !authorized(headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    match code4 {
        "ABCD" => Ok(serde_json::json!({
            "code4": "ABCD",
            "playerA": "mark",
            "playerB": "helly",
            "created_at": "2026-08-01T09:00:00Z",
        })),
        "SECR" => Err(StatusCode::FORBIDDEN),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn room(Path(code4): Path<String>, headers: HeaderMap) -> impl IntoResponse {
    match room_response(&code4, &headers) {
        Ok(body) => Json(body).into_response(),
        Err(status) => status.into_response(),
    }
}

async fn messages(
    Path(code4): Path<String>,
    headers: HeaderMap,
    State(state): State<Shared>,
) -> impl IntoResponse {
    match room_response(&code4, &headers) {
        Ok(_) => {
            let state = state.lock().unwrap();
            Json(state.messages.clone()).into_response()
        }
        Err(status) => status.into_response(),
    }
}

#[derive(Deserialize)]
struct SendBody {
    content: String,
}

async fn send_message(
    Path(code4): Path<String>,
    headers: HeaderMap,
    State(state): State<Shared>,
    Json(body): Json<SendBody>,
) -> impl IntoResponse {
    match room_response(&code4, &headers) {
        Ok(_) => {
            if body.content == "spam" {
                return StatusCode::TOO_MANY_REQUESTS.into_response();
            }
            let mut state = state.lock().unwrap();
            state.next_id += 1;
            let message = serde_json::json!({
                "id": state.next_id,
                "sender": "mark",
                "content": body.content,
                "ts": "2026-08-01T09:00:01Z",
            });
            state.messages.push(message.clone());
            Json(message).into_response()
        }
        Err(status) => status.into_response(),
    }
}

#[derive(Deserialize)]
struct StreamParams {
    after: Option<i64>,
}

async fn stream(
    Path(code4): Path<String>,
    Query(params): Query<StreamParams>,
    headers: HeaderMap,
    State(state): State<Shared>,
) -> impl IntoResponse {
    match room_response(&code4, &headers) {
        Ok(_) => {
            let mut state = state.lock().unwrap();
            state.stream_hits += 1;
            let new_messages = state
                .messages
                .iter()
                .filter(|message| {
                    params
                        .after
                        .map(|after| message["id"].as_i64().unwrap() > after)
                        .unwrap_or(true)
                })
                .cloned()
                .collect::<Vec<_>>();
            Json(new_messages).into_response()
        }
        Err(status) => status.into_response(),
    }
}

async fn start_stub_with_state() -> (SocketAddr, Shared) {
    let state: Shared = Arc::default();
    let app = Router::new()
        .route("/api/login", post(login))
        .route("/api/me", get(me))
        .route("/api/rooms/{code4}", get(room))
        .route("/api/rooms/{code4}/messages", get(messages))
        .route("/api/rooms/{code4}/msg", post(send_message))
        .route("/api/rooms/{code4}/stream", get(stream))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (addr, state)
}

async fn start_stub() -> SocketAddr {
    start_stub_with_state().await.0
}

fn test_config(addr: SocketAddr) -> ClientConfig {
    static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

    let dir = std::env::temp_dir().join(format!(
        "lumon-api-test-{}-{}",
        std::process::id(),
        DIR_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    let _ = std::fs::remove_dir_all(&dir);

    ClientConfig {
        server_url: format!("http://{addr}"),
        state_dir: dir.to_str().unwrap().to_string(),
        ..ClientConfig::default()
    }
}

#[tokio::test]
async fn bootstrap_without_token_comes_up_logged_out() {
    let addr = start_stub().await;
    let config = test_config(addr);

    let mut api = ApiClient::new(&config);
    let storage = Storage::new(&config.state_dir);
    let mut session = Session::default();

    let user = session.bootstrap(&mut api, &storage).await.unwrap();
    assert!(user.is_none());
    assert!(session.user().is_none());
}

#[tokio::test]
async fn bootstrap_with_rejected_token_clears_it() {
    let addr = start_stub().await;
    let config = test_config(addr);

    let storage = Storage::new(&config.state_dir);
    storage.store_token("stale").await;

    let mut api = ApiClient::new(&config);
    let mut session = Session::default();

    let user = session.bootstrap(&mut api, &storage).await.unwrap();
    assert!(user.is_none());
    assert!(session.user().is_none());
    assert!(!api.has_token());
    // The stale token was purged durably.
    assert_eq!(storage.stored_token().await, None);
}

#[tokio::test]
async fn bootstrap_with_valid_token_restores_the_session() {
    let addr = start_stub().await;
    let config = test_config(addr);

    let storage = Storage::new(&config.state_dir);
    storage.store_token(VALID_TOKEN).await;

    let mut api = ApiClient::new(&config);
    let mut session = Session::default();

    let user = session.bootstrap(&mut api, &storage).await.unwrap().unwrap();
    assert_eq!(user.username, "mark");
    assert!(!session.is_admin());
    assert_eq!(storage.stored_token().await.as_deref(), Some(VALID_TOKEN));
}

#[tokio::test]
async fn login_persists_the_token_and_resolves_the_user() {
    let addr = start_stub().await;
    let config = test_config(addr);

    let mut api = ApiClient::new(&config);
    let storage = Storage::new(&config.state_dir);
    let mut session = Session::default();

    let user = session
        .login(&mut api, &storage, "mark", "lumon123")
        .await
        .unwrap();
    assert_eq!(user.username, "mark");
    assert_eq!(session.username(), Some("mark"));
    assert_eq!(storage.stored_token().await.as_deref(), Some(VALID_TOKEN));

    session.logout(&mut api, &storage).await;
    assert!(session.user().is_none());
    assert_eq!(storage.stored_token().await, None);
}

#[tokio::test]
async fn failed_login_persists_nothing() {
    let addr = start_stub().await;
    let config = test_config(addr);

    let mut api = ApiClient::new(&config);
    let storage = Storage::new(&config.state_dir);
    let mut session = Session::default();

    let error = session
        .login(&mut api, &storage, "mark", "wrong")
        .await
        .unwrap_err();
    assert!(error.is_unauthenticated());
    assert!(session.user().is_none());
    assert_eq!(storage.stored_token().await, None);
}

#[tokio::test]
async fn open_send_then_poll_echo_keeps_one_copy() {
    let addr = start_stub().await;
    let config = test_config(addr);

    let mut api = ApiClient::new(&config);
    let storage = Storage::new(&config.state_dir);
    let mut session = Session::default();
    session
        .login(&mut api, &storage, "mark", "lumon123")
        .await
        .unwrap();

    // Open: room metadata plus an empty history.
    let room = api.room("ABCD").await.unwrap();
    let history = api.room_messages("ABCD").await.unwrap();
    let mut conversation = Conversation::new(room, history);
    assert!(conversation.is_empty());

    // Optimistic send.
    let sent = api.send_message("ABCD", "hello").await.unwrap();
    assert!(conversation.confirm_sent(sent));
    assert_eq!(conversation.len(), 1);

    // A poll from before the send echoes the same message back.
    let echoed = api.stream_messages("ABCD", None).await.unwrap();
    assert_eq!(echoed.len(), 1);
    assert!(conversation.merge(echoed).is_empty());
    assert_eq!(conversation.len(), 1);
    assert_eq!(conversation.messages()[0].sender, "mark");
    assert_eq!(conversation.messages()[0].content, "hello");

    // A poll from the current cursor returns nothing new.
    let fresh = api
        .stream_messages("ABCD", conversation.last_seen_id())
        .await
        .unwrap();
    assert!(fresh.is_empty());
}

#[tokio::test]
async fn open_failures_map_to_the_error_taxonomy() {
    let addr = start_stub().await;
    let config = test_config(addr);

    let mut api = ApiClient::new(&config);
    let storage = Storage::new(&config.state_dir);
    let mut session = Session::default();
    session
        .login(&mut api, &storage, "mark", "lumon123")
        .await
        .unwrap();

    assert!(matches!(api.room("ZZZZ").await, Err(ApiError::NotFound)));
    assert!(matches!(api.room("SECR").await, Err(ApiError::Forbidden)));
}

/// Drives the full network loop: the poll must run while the room view
/// is open and must stop dead once it is left.
#[test]
fn leaving_the_room_stops_the_poll_loop() {
    use lumon::app::network::types::Request;
    use lumon::app::network::NetworkClient;
    use tuirealm::listener::Poll as _;

    fn drain(client: &mut NetworkClient) -> Vec<lumon::app::network::types::UserEvent> {
        let mut events = Vec::new();
        while let Ok(Some(tuirealm::Event::User(event))) = client.poll() {
            events.push(event);
        }
        events
    }

    // The stub lives on its own runtime; the network client brings its own.
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (addr, stub) = runtime.block_on(start_stub_with_state());

    let mut config = test_config(addr);
    config.poll_interval_secs = 1;

    let mut client = NetworkClient::default();
    let mut runner = client.clone();
    let (request_sender, request_receiver) = tokio::sync::mpsc::unbounded_channel();
    let network_thread =
        std::thread::spawn(move || runner.start_network_client(request_receiver, config));

    request_sender
        .send(Request::Login {
            username: "mark".to_string(),
            password: "lumon123".to_string(),
        })
        .unwrap();
    request_sender
        .send(Request::OpenRoom {
            code4: "ABCD".to_string(),
        })
        .unwrap();

    std::thread::sleep(std::time::Duration::from_millis(2500));

    let events = drain(&mut client);
    assert!(events
        .iter()
        .any(|event| matches!(event, lumon::app::network::types::UserEvent::RoomOpened { .. })));
    assert!(stub.lock().unwrap().stream_hits >= 1);

    request_sender.send(Request::LeaveRoom).unwrap();
    // Let any in-flight cycle settle before taking the baseline.
    std::thread::sleep(std::time::Duration::from_millis(300));
    let baseline = stub.lock().unwrap().stream_hits;

    std::thread::sleep(std::time::Duration::from_millis(2500));
    assert_eq!(stub.lock().unwrap().stream_hits, baseline);

    request_sender.send(Request::Quit).unwrap();
    network_thread.join().unwrap();
}

#[tokio::test]
async fn rate_limited_send_is_a_retryable_rejection() {
    let addr = start_stub().await;
    let config = test_config(addr);

    let mut api = ApiClient::new(&config);
    let storage = Storage::new(&config.state_dir);
    let mut session = Session::default();
    session
        .login(&mut api, &storage, "mark", "lumon123")
        .await
        .unwrap();

    let error = api.send_message("ABCD", "spam").await.unwrap_err();
    assert!(error.is_rate_limited());
}
