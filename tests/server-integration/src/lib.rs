use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use grocery_common::item::{GroceryItem, ItemId, ItemPatch, NewItem};
use grocery_common::store::{ItemStore, StoreError};
use grocery_server::file_store::FileStore;
use grocery_server::suggest::{SuggestConfig, SuggestionClient};
use grocery_server::{router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;

pub const TEST_API_KEY: &str = "sk-test";
pub const INDEX_HTML: &str = "<!doctype html><title>GroceryCompare</title>";

/// Bind an ephemeral port on localhost and serve `app` in the background.
pub async fn spawn_router(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    addr
}

// ─── Mock chat-completion API ────────────────────────────────────────────────

/// What the mock answers to the next chat or image request.
#[derive(Clone, Debug)]
pub enum MockReply {
    Content(String),
    Status(u16),
    Garbage,
}

/// A recorded upstream call.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct MockState {
    reply: Mutex<Option<MockReply>>,
    requests: Mutex<Vec<Recorded>>,
}

/// OpenAI-shaped server that returns scripted replies and records requests.
pub struct MockOpenAi {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockOpenAi {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/v1/chat/completions", post(mock_chat))
            .route("/v1/images/generations", post(mock_image))
            .with_state(state.clone());
        let addr = spawn_router(app).await;
        Self {
            base_url: format!("http://{addr}/v1"),
            state,
        }
    }

    pub fn reply_with(&self, reply: MockReply) {
        *self.state.reply.lock().unwrap() = Some(reply);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no upstream request recorded")
    }
}

fn record(state: &MockState, path: &str, headers: &HeaderMap, body: Value) -> MockReply {
    state.requests.lock().unwrap().push(Recorded {
        path: path.to_string(),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    state
        .reply
        .lock()
        .unwrap()
        .clone()
        .unwrap_or(MockReply::Content("Bananas".into()))
}

fn scripted(reply: MockReply, ok: impl FnOnce(String) -> Value) -> Response {
    match reply {
        MockReply::Content(content) => Json(ok(content)).into_response(),
        MockReply::Status(code) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(json!({"error": {"message": "scripted failure"}})),
        )
            .into_response(),
        MockReply::Garbage => "definitely not json".into_response(),
    }
}

async fn mock_chat(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let reply = record(&state, "/chat/completions", &headers, body);
    scripted(reply, |content| {
        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    })
}

async fn mock_image(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let reply = record(&state, "/images/generations", &headers, body);
    scripted(reply, |url| json!({"created": 0, "data": [{"url": url}]}))
}

// ─── Server under test ───────────────────────────────────────────────────────

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub mock: Option<MockOpenAi>,
    dir: Arc<TempDir>,
}

impl TestServer {
    /// Server without an API key: suggestion endpoints answer 503.
    pub async fn start() -> Self {
        let dir = Arc::new(tempfile::tempdir().expect("tempdir"));
        Self::start_in(dir, None).await
    }

    /// Server wired to a fresh [`MockOpenAi`].
    pub async fn with_suggestions() -> Self {
        let dir = Arc::new(tempfile::tempdir().expect("tempdir"));
        let mock = MockOpenAi::start().await;
        Self::start_in(dir, Some(mock)).await
    }

    /// A second server over the same files, as after a restart.
    pub async fn restart(&self) -> Self {
        Self::start_in(self.dir.clone(), None).await
    }

    async fn start_in(dir: Arc<TempDir>, mock: Option<MockOpenAi>) -> Self {
        tracing_subscriber::fmt::try_init().ok();

        let dist = dir.path().join("dist");
        std::fs::create_dir_all(&dist).expect("create dist");
        std::fs::write(dist.join("index.html"), INDEX_HTML).expect("write index.html");

        let suggester = mock.as_ref().map(|mock| {
            SuggestionClient::new(SuggestConfig {
                api_key: TEST_API_KEY.to_string(),
                base_url: mock.base_url.clone(),
                chat_model: "gpt-4o-mini".to_string(),
                image_model: "dall-e-2".to_string(),
                timeout: Duration::from_secs(5),
            })
            .expect("suggestion client")
        });

        let state = Arc::new(AppState {
            items: FileStore::new(dir.path().join("grocery-items.json")),
            save_path: dir.path().join("groceryList.json"),
            suggester,
        });
        let addr = spawn_router(router(state, &dist)).await;

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            mock,
            dir,
        }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn save_path(&self) -> PathBuf {
        self.dir().join("groceryList.json")
    }

    pub fn mock(&self) -> &MockOpenAi {
        self.mock.as_ref().expect("server started without mock API")
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.expect("GET")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST")
    }

    /// Item store over this server's `/api/items` collection.
    pub fn item_store(&self) -> HttpItemStore {
        HttpItemStore {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
        }
    }
}

// ─── Item store over HTTP ────────────────────────────────────────────────────

/// Native client for `/api/items`, used to drive `ListSync` against a real server.
pub struct HttpItemStore {
    base_url: String,
    client: reqwest::Client,
}

fn remote(e: impl std::fmt::Display) -> StoreError {
    StoreError::Remote(e.to_string())
}

impl HttpItemStore {
    async fn item_or_none(resp: reqwest::Response) -> Result<Option<GroceryItem>, StoreError> {
        match resp.status() {
            reqwest::StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => resp.json().await.map(Some).map_err(remote),
            s => Err(remote(format!("HTTP {s}"))),
        }
    }
}

impl ItemStore for HttpItemStore {
    async fn list(&self) -> Result<Vec<GroceryItem>, StoreError> {
        let resp = self
            .client
            .get(format!("{}/api/items", self.base_url))
            .send()
            .await
            .map_err(remote)?;
        resp.error_for_status()
            .map_err(remote)?
            .json()
            .await
            .map_err(remote)
    }

    async fn add(&self, item: NewItem) -> Result<GroceryItem, StoreError> {
        let resp = self
            .client
            .post(format!("{}/api/items", self.base_url))
            .json(&item)
            .send()
            .await
            .map_err(remote)?;
        resp.error_for_status()
            .map_err(remote)?
            .json()
            .await
            .map_err(remote)
    }

    async fn remove(&self, id: &ItemId) -> Result<bool, StoreError> {
        let resp = self
            .client
            .delete(format!("{}/api/items/{id}", self.base_url))
            .send()
            .await
            .map_err(remote)?;
        match resp.status() {
            reqwest::StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            s => Err(remote(format!("HTTP {s}"))),
        }
    }

    async fn update(
        &self,
        id: &ItemId,
        patch: ItemPatch,
    ) -> Result<Option<GroceryItem>, StoreError> {
        let resp = self
            .client
            .patch(format!("{}/api/items/{id}", self.base_url))
            .json(&patch)
            .send()
            .await
            .map_err(remote)?;
        Self::item_or_none(resp).await
    }

    async fn toggle(&self, id: &ItemId) -> Result<Option<GroceryItem>, StoreError> {
        let resp = self
            .client
            .post(format!("{}/api/items/{id}/toggle", self.base_url))
            .send()
            .await
            .map_err(remote)?;
        Self::item_or_none(resp).await
    }
}
