#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use futures::future::BoxFuture;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use gigboard::app::notifications::NoticeBoard;
use gigboard::app::session::Session;
use gigboard::app::sources::{
    CacheSource, JobSource, SeedSource, SnapshotCache, SourceChain, SourceOutcome,
};
use gigboard::app::store::JobStore;
use gigboard::domain::job::Job;
use gigboard::domain::notification::Notice;
use gigboard::domain::user::ActingUser;
use gigboard::infra::cache::{LocalCache, MemoryCache};
use gigboard::AppState;

pub const CACHE_KEY: &str = "jobs";

// ---------------------------------------------------------------------------
// Fake collaborators
// ---------------------------------------------------------------------------

/// Remote tier that is never reachable.
pub struct UnreachableRemote;

impl JobSource for UnreachableRemote {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn load(&self) -> BoxFuture<'_, Result<SourceOutcome>> {
        Box::pin(async { Ok(SourceOutcome::Unavailable("connection refused".into())) })
    }
}

/// Remote tier that always answers with the same list.
pub struct FixedRemote(pub Vec<Job>);

impl JobSource for FixedRemote {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn load(&self) -> BoxFuture<'_, Result<SourceOutcome>> {
        Box::pin(async move { Ok(SourceOutcome::Loaded(self.0.clone())) })
    }
}

/// Cache that accepts reads but rejects every write.
#[derive(Clone, Default)]
pub struct ReadOnlyCache {
    inner: MemoryCache,
}

impl LocalCache for ReadOnlyCache {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
        self.inner.get(key)
    }

    fn set<'a>(&'a self, _key: &'a str, _value: String) -> BoxFuture<'a, Result<()>> {
        Box::pin(async { Err(anyhow!("disk full")) })
    }
}

/// Cache whose reads stall for `delay` after fetching the entry, so a load
/// can be overtaken by mutations.
#[derive(Clone)]
pub struct SlowCache {
    inner: MemoryCache,
    delay: Duration,
}

impl LocalCache for SlowCache {
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(async move {
            let value = self.inner.get(key).await?;
            tokio::time::sleep(self.delay).await;
            Ok(value)
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: String) -> BoxFuture<'a, Result<()>> {
        self.inner.set(key, value)
    }
}

// ---------------------------------------------------------------------------
// TestStore — a store wired to in-memory collaborators
// ---------------------------------------------------------------------------

pub struct TestStore {
    pub store: JobStore,
    pub session: Session,
    pub notices: NoticeBoard,
    pub cache: MemoryCache,
}

impl TestStore {
    /// Remote unreachable, empty cache.
    pub fn offline() -> Self {
        Self::build(Box::new(UnreachableRemote), MemoryCache::new())
    }

    /// Remote unreachable, cache pre-filled.
    pub fn with_cache(cache: MemoryCache) -> Self {
        Self::build(Box::new(UnreachableRemote), cache)
    }

    pub fn with_remote(jobs: Vec<Job>) -> Self {
        Self::build(Box::new(FixedRemote(jobs)), MemoryCache::new())
    }

    /// Remote unreachable; cache reads take `delay`.
    pub fn slow(delay: Duration) -> Self {
        let cache = MemoryCache::new();
        let slow = SlowCache {
            inner: cache.clone(),
            delay,
        };
        Self::assemble(Box::new(UnreachableRemote), Arc::new(slow), cache)
    }

    pub fn build(remote: Box<dyn JobSource>, cache: MemoryCache) -> Self {
        Self::assemble(remote, Arc::new(cache.clone()), cache)
    }

    fn assemble(remote: Box<dyn JobSource>, local: Arc<dyn LocalCache>, cache: MemoryCache) -> Self {
        let snapshot = SnapshotCache::new(local, CACHE_KEY);
        let chain = SourceChain::new(vec![
            remote,
            Box::new(CacheSource::new(snapshot.clone())),
            Box::new(SeedSource),
        ]);
        let session = Session::new();
        let notices = NoticeBoard::new(100);
        let store = JobStore::new(
            chain,
            snapshot,
            Arc::new(session.clone()),
            Arc::new(notices.clone()),
        );

        Self {
            store,
            session,
            notices,
            cache,
        }
    }

    /// Offline store populated from the seed dataset.
    pub async fn seeded() -> Self {
        let harness = Self::offline();
        assert_eq!(harness.store.load().await, Some("seed"));
        harness.notices.clear();
        harness
    }

    pub fn sign_in(&self, id: &str) -> ActingUser {
        let user = ActingUser::new(id, format!("User {}", id))
            .with_photo(format!("https://example.com/{}.png", id));
        self.session.sign_in(user.clone());
        user
    }

    /// The snapshot currently held by the cache, if any.
    pub fn cached_jobs(&self) -> Option<Vec<Job>> {
        self.cache
            .peek(CACHE_KEY)
            .map(|payload| serde_json::from_str(&payload).expect("cached snapshot is valid JSON"))
    }

    pub fn last_notice(&self) -> Notice {
        self.notices.last().expect("expected a notice")
    }
}

// ---------------------------------------------------------------------------
// TestApp — the HTTP router over a TestStore
// ---------------------------------------------------------------------------

pub struct TestApp {
    router: Router,
    pub harness: TestStore,
}

pub struct TestResponse {
    pub status: StatusCode,
    body_bytes: bytes::Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body_bytes).unwrap_or(Value::Null)
    }

    pub fn error_message(&self) -> String {
        self.json()["error"].as_str().unwrap_or("").to_string()
    }
}

impl TestApp {
    pub async fn seeded() -> Self {
        let harness = TestStore::seeded().await;
        let state = AppState {
            store: harness.store.clone(),
            session: harness.session.clone(),
            notices: harness.notices.clone(),
        };
        let router = gigboard::http::router(state);
        Self { router, harness }
    }

    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder()
            .method(method)
            .uri(path)
            .header("host", "localhost");

        let request = if let Some(body) = body {
            builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap()
        } else {
            builder.body(Body::empty()).unwrap()
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot failed");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to collect body")
            .to_bytes();

        TestResponse { status, body_bytes }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None).await
    }

    pub async fn post_json(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put_json(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch_json(&self, path: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Method::DELETE, path, None).await
    }
}
