#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use entex::analyzer::Workbench;
use entex::web::{self, AppState};

/// One scripted reply from the fake completion endpoint.
#[derive(Clone, Debug)]
pub enum Reply {
    Completion(String),
    Status(u16, String),
    Body(String),
    Delayed(Duration, String),
}

impl Reply {
    pub fn completion(content: &str) -> Self {
        Reply::Completion(content.to_string())
    }
}

#[derive(Clone, Debug)]
pub struct Received {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct StubState {
    replies: Arc<Vec<Reply>>,
    received: Arc<Mutex<Vec<Received>>>,
}

/// A local stand-in for the chat-completion API.
pub struct StubApi {
    pub base_url: String,
    received: Arc<Mutex<Vec<Received>>>,
    shutdown: CancellationToken,
}

impl StubApi {
    /// Replies are used in order; the last one repeats.
    pub async fn start(replies: Vec<Reply>) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            replies: Arc::new(replies),
            received: received.clone(),
        };
        let app = Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let stop = shutdown.clone();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { stop.cancelled().await })
                .await
                .unwrap();
        });

        Self {
            base_url: format!("http://{}/v1", addr),
            received,
            shutdown,
        }
    }

    pub fn hits(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

impl Drop for StubApi {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn completions(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    let index = {
        let mut received = state.received.lock().unwrap();
        received.push(Received {
            authorization: headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });
        received.len() - 1
    };

    let reply = state
        .replies
        .get(index)
        .or_else(|| state.replies.last())
        .cloned()
        .unwrap_or(Reply::Status(500, String::new()));

    match reply {
        Reply::Completion(content) => (StatusCode::OK, completion_body(&content)),
        Reply::Status(code, body) => (StatusCode::from_u16(code).unwrap(), body),
        Reply::Body(body) => (StatusCode::OK, body),
        Reply::Delayed(delay, content) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, completion_body(&content))
        }
    }
}

pub fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49}
    })
    .to_string()
}

/// Serve the pages on an ephemeral port and return the base URL.
pub async fn start_app(workbench: Workbench) -> (String, CancellationToken) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    let state = AppState::new(workbench, shutdown.clone());
    tokio::spawn(async move {
        web::serve(listener, state).await.unwrap();
    });
    (format!("http://{}", addr), shutdown)
}

/// Text between the `href="` of the download link and its closing quote.
pub fn download_href(html: &str) -> Option<String> {
    let start = html.find("id=\"download\"")?;
    let rest = &html[start..];
    let href_start = rest.find("href=\"")? + "href=\"".len();
    let href_end = rest[href_start..].find('"')?;
    Some(unescape_attr(&rest[href_start..href_start + href_end]))
}

fn unescape_attr(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
