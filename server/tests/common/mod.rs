//! Shared fixtures: an in-process stand-in for the remote post collection.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use quotebook_engine::{MemoryStorage, QuoteStore};
use quotebook_server::config::Config;
use quotebook_server::remote::RemoteClient;
use quotebook_server::AppState;
use serde_json::{json, Value};

/// Behavior knobs and call counters for the mock remote.
#[derive(Default)]
pub struct MockState {
    pub posts: Mutex<Vec<Value>>,
    pub fail: AtomicBool,
    pub delay_ms: AtomicU64,
    pub fetches: AtomicUsize,
    pub creates: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl MockState {
    pub fn set_posts(&self, posts: Vec<Value>) {
        *self.posts.lock().unwrap() = posts;
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    async fn respond(&self) -> Result<(), StatusCode> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        } else {
            Ok(())
        }
    }
}

/// A running mock remote.
pub struct MockRemote {
    pub url: String,
    pub state: Arc<MockState>,
}

/// A post in the remote's wire shape.
pub fn post(id: u64, title: &str) -> Value {
    json!({"userId": 1, "id": id, "title": title, "body": "lorem ipsum"})
}

/// Start a mock remote on an ephemeral localhost port.
pub async fn spawn_mock_remote(posts: Vec<Value>) -> MockRemote {
    let state = Arc::new(MockState::default());
    state.set_posts(posts);

    let router = Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", put(update_post).delete(delete_post))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    MockRemote {
        url: format!("http://{}/posts", addr),
        state,
    }
}

async fn list_posts(State(state): State<Arc<MockState>>) -> Result<Json<Vec<Value>>, StatusCode> {
    state.fetches.fetch_add(1, Ordering::SeqCst);
    state.respond().await?;
    let posts = state.posts.lock().unwrap().clone();
    Ok(Json(posts))
}

async fn create_post(
    State(state): State<Arc<MockState>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    state.creates.fetch_add(1, Ordering::SeqCst);
    state.respond().await?;
    let mut created = body;
    created["id"] = json!(101);
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_post(State(state): State<Arc<MockState>>) -> Result<Json<Value>, StatusCode> {
    state.updates.fetch_add(1, Ordering::SeqCst);
    state.respond().await?;
    Ok(Json(json!({})))
}

async fn delete_post(State(state): State<Arc<MockState>>) -> Result<Json<Value>, StatusCode> {
    state.deletes.fetch_add(1, Ordering::SeqCst);
    state.respond().await?;
    Ok(Json(json!({})))
}

/// A store over memory storage holding the three seed quotes.
pub fn seeded_store() -> QuoteStore {
    QuoteStore::open(Box::new(MemoryStorage::new()), 1_000)
}

/// Application state wired to `remote_url`.
pub fn test_state(remote_url: &str, store: QuoteStore) -> AppState {
    let mut config = Config::from_lookup(|_| None).unwrap();
    config.remote_url = remote_url.to_string();

    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    AppState::with_remote(config, store, RemoteClient::with_client(remote_url, client))
}
