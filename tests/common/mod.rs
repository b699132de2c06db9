//! Shared utilities for integration testing: mock upstreams and a relay
//! running on an ephemeral port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use order_relay::config::{RelayConfig, Secret};
use order_relay::{HttpServer, Shutdown};

pub const CARRIER_KEY: &str = "np-server-secret-7f3a";
pub const BOT_TOKEN: &str = "123456:TEST-TOKEN";
pub const CHAT_ID: &str = "-100777";

/// How the mock carrier answers.
#[derive(Clone)]
pub enum CarrierMode {
    /// 200 with `{success, data, echo: <request body>}`.
    Echo,
    /// Fixed status and JSON body.
    Fixed(u16, Value),
    /// 200 with a non-JSON body.
    Garbage,
    /// Sleep, then answer `{}`.
    Slow(Duration),
}

/// How the mock bot API answers.
#[derive(Clone)]
pub enum BotMode {
    Accept,
    Reject(&'static str),
}

/// One request seen by a mock upstream.
#[derive(Debug, Clone, Default)]
pub struct RecordedCall {
    pub path: String,
    pub json: Option<Value>,
    pub form: HashMap<String, String>,
    pub photo: Option<(String, usize)>,
}

#[derive(Clone)]
struct MockState {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    carrier: CarrierMode,
    bot: BotMode,
}

/// Carrier and bot API on one local port.
pub struct MockUpstream {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockUpstream {
    pub async fn start(carrier: CarrierMode, bot: BotMode) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            calls: calls.clone(),
            carrier,
            bot,
        };

        let app = Router::new()
            .route("/v2.0/json/", post(carrier_handler))
            .route("/{bot}/sendMessage", post(send_message_handler))
            .route("/{bot}/sendPhoto", post(send_photo_handler))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, calls }
    }

    pub fn carrier_url(&self) -> String {
        format!("http://{}/v2.0/json/", self.addr)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, suffix: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.path.ends_with(suffix))
            .collect()
    }
}

async fn carrier_handler(State(mock): State<MockState>, Json(body): Json<Value>) -> Response {
    mock.calls.lock().unwrap().push(RecordedCall {
        path: "/v2.0/json/".into(),
        json: Some(body.clone()),
        ..Default::default()
    });

    match mock.carrier {
        CarrierMode::Echo => Json(json!({"success": true, "data": [], "echo": body})).into_response(),
        CarrierMode::Fixed(status, body) => {
            (StatusCode::from_u16(status).unwrap(), Json(body)).into_response()
        }
        CarrierMode::Garbage => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        CarrierMode::Slow(delay) => {
            tokio::time::sleep(delay).await;
            Json(json!({})).into_response()
        }
    }
}

async fn send_message_handler(
    State(mock): State<MockState>,
    uri: Uri,
    Json(body): Json<Value>,
) -> Response {
    mock.calls.lock().unwrap().push(RecordedCall {
        path: uri.path().to_string(),
        json: Some(body),
        ..Default::default()
    });
    bot_reply(&mock.bot)
}

async fn send_photo_handler(
    State(mock): State<MockState>,
    uri: Uri,
    mut multipart: Multipart,
) -> Response {
    let mut call = RecordedCall {
        path: uri.path().to_string(),
        ..Default::default()
    };
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "photo" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.unwrap();
            call.photo = Some((file_name, bytes.len()));
        } else {
            call.form.insert(name, field.text().await.unwrap());
        }
    }
    mock.calls.lock().unwrap().push(call);
    bot_reply(&mock.bot)
}

fn bot_reply(mode: &BotMode) -> Response {
    match mode {
        BotMode::Accept => Json(json!({"ok": true, "result": {"message_id": 1}})).into_response(),
        BotMode::Reject(description) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"ok": false, "error_code": 400, "description": description})),
        )
            .into_response(),
    }
}

/// Relay config pointing at `mock` with every secret set.
pub fn relay_config(mock: &MockUpstream) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.carrier.endpoint = mock.carrier_url();
    config.carrier.api_key = Some(Secret::new(CARRIER_KEY));
    config.bot.api_base = mock.base_url();
    config.bot.token = Some(Secret::new(BOT_TOKEN));
    config.bot.chat_id = Some(CHAT_ID.into());
    config
}

/// A relay serving on an ephemeral port.
pub struct RunningRelay {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl RunningRelay {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RunningRelay {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn spawn_relay(config: RelayConfig) -> RunningRelay {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RunningRelay { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
