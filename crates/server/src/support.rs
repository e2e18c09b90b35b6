//! Test fixtures: scripted upstreams and gateway state.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::response::Response;
use bytes::Bytes;
use http::{HeaderMap, Method};

use haven_client::{UpstreamClient, UpstreamOrigin};
use haven_core::cache::key::request_key;
use haven_core::{CacheDb, CachedResponse, Partition};

use crate::dispatch::{GatewayState, IncomingRequest};
use crate::lifecycle;

/// An origin nothing listens on: connections are refused immediately.
pub const DEAD_ORIGIN: &str = "http://127.0.0.1:1";

/// Upstream returning the same body for every path.
pub fn static_upstream(body: &'static str) -> Router {
    Router::new().fallback(move || async move { body })
}

/// Upstream that sleeps before answering, to make waiting observable.
pub fn slow_upstream(delay: Duration, body: &'static str) -> Router {
    Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        body
    })
}

/// Serve a router on an ephemeral local port, returning its origin URL.
pub async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn upstream_client(origin: &str) -> UpstreamClient {
    UpstreamClient::new(UpstreamOrigin::parse(origin).unwrap(), "haven-test/0").unwrap()
}

/// Fresh gateway state over an in-memory store.
pub async fn gateway_state(origin: &str) -> GatewayState {
    let db = CacheDb::open_in_memory().await.unwrap();
    gateway_state_with_db(db, origin).await
}

/// Gateway state over an existing store, for scenarios where a later
/// request must hit the same cache with a different upstream.
pub async fn gateway_state_with_db(db: CacheDb, origin: &str) -> GatewayState {
    let (precache, runtime) = lifecycle::activate(&db).await.unwrap();
    GatewayState { client: Arc::new(upstream_client(origin)), precache, runtime }
}

/// A bodyless GET request for the dispatcher.
pub fn get(path_and_query: &str) -> IncomingRequest {
    IncomingRequest {
        key: request_key("GET", path_and_query),
        method: Method::GET,
        path_and_query: path_and_query.to_string(),
        headers: HeaderMap::new(),
        body: Bytes::new(),
    }
}

/// Seed the runtime partition with a cached response for a request.
pub async fn seed_runtime(state: &GatewayState, request: &IncomingRequest, status: u16, body: &[u8]) {
    let record = CachedResponse::new(
        &request.path_and_query,
        status,
        vec![("content-type".into(), "application/octet-stream".into())],
        body.to_vec(),
    );
    state.runtime.put(&request.key, &record).await.unwrap();
}

pub async fn collect_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

/// Poll the partition until an entry appears.
pub async fn wait_for_entry(partition: &Partition, key: &str) -> CachedResponse {
    for _ in 0..100 {
        if let Some(entry) = partition.get(key).await.unwrap() {
            return entry;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("entry for {key} never appeared");
}

/// Poll the partition until the entry's body matches (background
/// refreshes land at their own pace).
pub async fn wait_for_body(partition: &Partition, key: &str, body: &[u8]) -> CachedResponse {
    for _ in 0..100 {
        if let Some(entry) = partition.get(key).await.unwrap()
            && entry.body == body
        {
            return entry;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("entry for {key} never reached the expected body");
}
