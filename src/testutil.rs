//! Test helpers: in-process IPEYE API mock and a recording notifier

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use teloxide::types::ChatId;

use crate::error::BotError;
use crate::ipeye::{IpeyeClient, SessionManager};
use crate::models::Credentials;
use crate::monitor::PollCycle;
use crate::notify::Notifier;

pub fn credentials() -> Credentials {
    Credentials {
        login: "user".to_string(),
        password: "secret".to_string(),
    }
}

/// Base URL of a port nothing listens on
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

struct MockState {
    login_status: u16,
    refresh_status: u16,
    devices_status: u16,
    devices: Value,
    issued: usize,
    current_refresh: Option<String>,
    login_calls: usize,
    refresh_calls: usize,
    device_calls: usize,
    last_bearer: Option<String>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            login_status: 200,
            refresh_status: 200,
            devices_status: 200,
            devices: json!({"status": true, "message": []}),
            issued: 0,
            current_refresh: None,
            login_calls: 0,
            refresh_calls: 0,
            device_calls: 0,
            last_bearer: None,
        }
    }
}

type Shared = Arc<Mutex<MockState>>;

/// Mock of the IPEYE REST API. Every login/refresh issues `A<n>`/`R<n>`;
/// refresh only accepts the most recently issued refresh token.
pub struct MockApi {
    pub base_url: String,
    state: Shared,
}

impl MockApi {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::default()));

        let app = Router::new()
            .route("/api/rest/users/login", post(login))
            .route("/api/rest/users/refresh", post(refresh))
            .route("/api/rest/devices", get(devices))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Points at `base_url` without serving anything
    pub fn detached(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    pub fn set_login_status(&self, status: u16) {
        self.state.lock().unwrap().login_status = status;
    }

    pub fn set_refresh_status(&self, status: u16) {
        self.state.lock().unwrap().refresh_status = status;
    }

    pub fn set_devices_status(&self, status: u16) {
        self.state.lock().unwrap().devices_status = status;
    }

    pub fn set_devices(&self, body: Value) {
        self.state.lock().unwrap().devices = body;
    }

    pub fn login_calls(&self) -> usize {
        self.state.lock().unwrap().login_calls
    }

    pub fn refresh_calls(&self) -> usize {
        self.state.lock().unwrap().refresh_calls
    }

    pub fn device_calls(&self) -> usize {
        self.state.lock().unwrap().device_calls
    }

    pub fn last_bearer(&self) -> Option<String> {
        self.state.lock().unwrap().last_bearer.clone()
    }
}

fn status_code(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn issue_tokens(s: &mut MockState) -> (StatusCode, Json<Value>) {
    s.issued += 1;
    let n = s.issued;
    s.current_refresh = Some(format!("R{}", n));
    (
        StatusCode::OK,
        Json(json!({
            "message": {
                "access_token": format!("A{}", n),
                "refresh_token": format!("R{}", n)
            }
        })),
    )
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut s = state.lock().unwrap();
    s.login_calls += 1;

    if s.login_status != 200 {
        return (status_code(s.login_status), Json(json!({"message": "error"})));
    }
    if body["login"] != "user" || body["password"] != "secret" {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad credentials"})));
    }
    issue_tokens(&mut s)
}

async fn refresh(State(state): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut s = state.lock().unwrap();
    s.refresh_calls += 1;

    if s.refresh_status != 200 {
        return (status_code(s.refresh_status), Json(json!({"message": "error"})));
    }
    if body["refresh_token"].as_str() != s.current_refresh.as_deref() {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "stale token"})));
    }
    issue_tokens(&mut s)
}

async fn devices(State(state): State<Shared>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let mut s = state.lock().unwrap();
    s.device_calls += 1;
    s.last_bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    if s.devices_status != 200 {
        return (status_code(s.devices_status), Json(json!({"status": false})));
    }
    (StatusCode::OK, Json(s.devices.clone()))
}

/// Notifier that keeps every message in memory
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(ChatId, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn chats(&self) -> Vec<ChatId> {
        self.sent.lock().unwrap().iter().map(|(chat, _)| *chat).collect()
    }

    pub fn clear(&self) {
        self.sent.lock().unwrap().clear();
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, chat_id: ChatId, text: &str) -> Result<(), BotError> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

pub fn poll_cycle(api: &MockApi, notifier: Arc<RecordingNotifier>) -> PollCycle {
    let client = Arc::new(IpeyeClient::new(&api.base_url, Duration::from_secs(5)).unwrap());
    let session = Arc::new(SessionManager::new(client.clone(), credentials()));
    PollCycle::new(session, client, notifier)
}
