//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use sign_proxy::config::GatewayConfig;
use sign_proxy::http::HttpServer;
use sign_proxy::lifecycle::Shutdown;
use sign_proxy::signing::Secret;

pub const UPSTREAM_TOKEN: &str = "upstream-token";

/// How the mock link API answers.
#[derive(Clone)]
pub enum LinkReply {
    /// Point at the mock file route, attaching these headers.
    File { headers: Value },
    /// Arbitrary 200 JSON body.
    Json(Value),
    /// Non-2xx status.
    Status(u16),
    /// 200 with a body that is not JSON.
    Garbage,
}

/// How the mock file host answers.
#[derive(Clone)]
pub struct FileReply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub disposition: Option<&'static str>,
    pub encoding: Option<&'static str>,
    pub body: Vec<u8>,
}

impl FileReply {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: None,
            disposition: None,
            encoding: None,
            body,
        }
    }
}

struct MockState {
    addr: SocketAddr,
    link: LinkReply,
    file: FileReply,
    link_calls: Arc<AtomicUsize>,
    file_calls: Arc<AtomicUsize>,
    link_auth: Arc<Mutex<Option<String>>>,
    link_paths: Arc<Mutex<Vec<String>>>,
    file_headers: Arc<Mutex<HeaderMap>>,
}

/// Storage API plus file host on one loopback port.
pub struct MockUpstream {
    pub addr: SocketAddr,
    pub link_calls: Arc<AtomicUsize>,
    pub file_calls: Arc<AtomicUsize>,
    pub link_auth: Arc<Mutex<Option<String>>>,
    pub link_paths: Arc<Mutex<Vec<String>>>,
    pub file_headers: Arc<Mutex<HeaderMap>>,
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn link_calls(&self) -> usize {
        self.link_calls.load(Ordering::SeqCst)
    }

    pub fn file_calls(&self) -> usize {
        self.file_calls.load(Ordering::SeqCst)
    }
}

async fn link_handler(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.link_calls.fetch_add(1, Ordering::SeqCst);
    *state.link_auth.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if let Some(path) = body.get("path").and_then(Value::as_str) {
        state.link_paths.lock().unwrap().push(path.to_string());
    }

    match &state.link {
        LinkReply::File { headers } => Json(json!({
            "code": 200,
            "data": {
                "url": format!("http://{}/files/blob", state.addr),
                "headers": headers,
            }
        }))
        .into_response(),
        LinkReply::Json(value) => Json(value.clone()).into_response(),
        LinkReply::Status(status) => (
            StatusCode::from_u16(*status).unwrap(),
            "upstream says no",
        )
            .into_response(),
        LinkReply::Garbage => (StatusCode::OK, "<html>maintenance</html>").into_response(),
    }
}

async fn file_handler(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.file_calls.fetch_add(1, Ordering::SeqCst);
    *state.file_headers.lock().unwrap() = headers;

    let reply = &state.file;
    let mut builder = Response::builder().status(reply.status);
    if let Some(ct) = reply.content_type {
        builder = builder.header("content-type", ct);
    }
    if let Some(cd) = reply.disposition {
        builder = builder.header("content-disposition", cd);
    }
    if let Some(ce) = reply.encoding {
        builder = builder.header("content-encoding", ce);
    }
    builder.body(Body::from(reply.body.clone())).unwrap()
}

/// Start a mock upstream answering with `link` and `file`.
pub async fn start_mock_upstream(link: LinkReply, file: FileReply) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let state = Arc::new(MockState {
        addr,
        link,
        file,
        link_calls: Arc::new(AtomicUsize::new(0)),
        file_calls: Arc::new(AtomicUsize::new(0)),
        link_auth: Arc::new(Mutex::new(None)),
        link_paths: Arc::new(Mutex::new(Vec::new())),
        file_headers: Arc::new(Mutex::new(HeaderMap::new())),
    });

    let mock = MockUpstream {
        addr,
        link_calls: state.link_calls.clone(),
        file_calls: state.file_calls.clone(),
        link_auth: state.link_auth.clone(),
        link_paths: state.link_paths.clone(),
        file_headers: state.file_headers.clone(),
    };

    let app = Router::new()
        .route("/api/fs/link", post(link_handler))
        .route("/files/blob", get(file_handler))
        .with_state(state);

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    mock
}

/// Raw TCP server that reads one request per connection, writes `reply`
/// (possibly empty) and then holds the connection open without sending more.
pub async fn start_stalling_server(reply: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                if !reply.is_empty() {
                    let _ = socket.write_all(reply).await;
                    let _ = socket.flush().await;
                }
                tokio::time::sleep(Duration::from_secs(60)).await;
                drop(socket);
            });
        }
    });

    addr
}

/// Config pointing at `upstream_url`, with TOKEN doubling as the signing secret.
pub fn gateway_config(upstream_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.address = upstream_url.to_string();
    config.upstream.token = Secret::from(UPSTREAM_TOKEN);
    config.observability.metrics_enabled = false;
    config.timeouts.link_secs = 2;
    config.timeouts.fetch_secs = 2;
    config.timeouts.read_secs = 2;
    config
}

/// Running gateway bound to an ephemeral port.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config).expect("gateway should start");

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestGateway { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

pub fn now_unix() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs()
}
