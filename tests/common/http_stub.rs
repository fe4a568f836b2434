/*!
 * In-process HTTP stub for provider tests
 *
 * An axum router that records every POST to `/v1/translate` and answers
 * with queued replies in order.
 */

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A request as seen by the stub
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
}

impl CapturedRequest {
    /// Header value by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> &Value {
        &self.body
    }
}

#[derive(Clone)]
struct StubState {
    replies: Arc<Mutex<VecDeque<(StatusCode, String)>>>,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    delay: Duration,
}

/// Running stub server; aborted on drop
pub struct HttpStub {
    pub endpoint: String,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
    task: JoinHandle<()>,
}

impl HttpStub {
    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }

    /// Shared handle to the request log, for checks that outlive a borrow
    pub fn request_log(&self) -> Arc<Mutex<Vec<CapturedRequest>>> {
        Arc::clone(&self.captured)
    }
}

impl Drop for HttpStub {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn translate(
    State(state): State<StubState>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    state.captured.lock().unwrap().push(CapturedRequest {
        path: uri.path().to_string(),
        headers,
        body,
    });
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    let (status, body) = state
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, r#"{"error": "no reply queued"}"#.to_string()));
    (status, [(header::CONTENT_TYPE, "application/json")], body)
}

/// Start a stub answering `replies` (status, body) in order
pub async fn spawn_http_stub(replies: Vec<(u16, &str)>) -> HttpStub {
    spawn_slow_http_stub(replies, Duration::ZERO).await
}

/// Like [`spawn_http_stub`], but every reply waits `delay` after the request is recorded
pub async fn spawn_slow_http_stub(replies: Vec<(u16, &str)>, delay: Duration) -> HttpStub {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        replies: Arc::new(Mutex::new(
            replies
                .into_iter()
                .map(|(status, body)| (StatusCode::from_u16(status).unwrap(), body.to_string()))
                .collect(),
        )),
        captured: Arc::clone(&captured),
        delay,
    };

    let app = Router::new().route("/v1/translate", post(translate)).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let task = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    HttpStub {
        endpoint: format!("http://{}/v1/translate", addr),
        captured,
        task,
    }
}
