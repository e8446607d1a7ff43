#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body, Bytes},
    http::{HeaderMap, Request, StatusCode, Uri},
    response::IntoResponse,
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use ode_tutor::{AppState, HintError, HintProvider, ProviderKind};

/// Provider double that records every prompt it is asked about.
pub struct MockProvider {
    kind: ProviderKind,
    fail_status: Option<u16>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn replying(kind: ProviderKind) -> Arc<Self> {
        Arc::new(Self { kind, fail_status: None, calls: AtomicUsize::new(0), prompts: Mutex::new(vec![]) })
    }

    pub fn failing(kind: ProviderKind, status: u16) -> Arc<Self> {
        Arc::new(Self { kind, fail_status: Some(status), calls: AtomicUsize::new(0), prompts: Mutex::new(vec![]) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl HintProvider for MockProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    async fn generate_hint(&self, prompt: &str) -> Result<String, HintError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.fail_status {
            Some(status) => Err(HintError::UpstreamStatus { provider: self.kind, status, body: "upstream said no".into() }),
            None => Ok("נסו לחשב את הדטרמיננטה.".to_string()),
        }
    }
}

pub fn state_with(provider: Arc<dyn HintProvider>, static_root: PathBuf) -> Arc<AppState> {
    Arc::new(AppState::new(provider, static_root))
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// In-memory log sink; install with `tracing::subscriber::set_default(capture.subscriber())`.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        let sink = self.clone();
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || sink.clone())
            .finish()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

pub fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body)
}

pub fn json(body: &Bytes) -> Value {
    serde_json::from_slice(body).expect("response body is JSON")
}

/// Fresh directory under the system temp dir.
pub fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ode-tutor-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// What the fake upstream saw.
#[derive(Clone, Debug)]
pub struct Captured {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

/// In-process stand-in for a provider API. Every request gets `status` + `reply`.
pub async fn spawn_upstream(status: StatusCode, reply: Value) -> (String, Arc<Mutex<Vec<Captured>>>) {
    let seen: Arc<Mutex<Vec<Captured>>> = Arc::new(Mutex::new(vec![]));
    let sink = seen.clone();
    let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap, body: Bytes| {
        let sink = sink.clone();
        let reply = reply.clone();
        async move {
            sink.lock().unwrap().push(Captured {
                path: uri.path().to_string(),
                headers,
                body: serde_json::from_slice(&body).unwrap_or(Value::Null),
            });
            (status, Json(reply)).into_response()
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), seen)
}
