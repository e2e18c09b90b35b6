//! Per-request dispatch: classify, then apply exactly one strategy.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::response::Response;
use bytes::Bytes;
use http::{HeaderMap, Method};

use haven_client::UpstreamClient;
use haven_core::cache::key::request_key;
use haven_core::{Partition, RequestClass};

use crate::error::GatewayError;
use crate::strategy;

/// Shared state handed to every request handler.
///
/// Partition handles and the upstream client are cheap to clone; detached
/// background-refresh tasks carry their own copies.
#[derive(Clone)]
pub struct GatewayState {
    pub client: Arc<UpstreamClient>,
    pub precache: Partition,
    pub runtime: Partition,
}

/// An intercepted request, reduced to what the strategies need.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    /// Storage key for this request's identity.
    pub key: String,
    pub method: Method,
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Build the gateway router: every method and path lands in the
/// dispatcher.
pub fn router(state: GatewayState) -> Router {
    Router::new().fallback(dispatch).with_state(state)
}

async fn dispatch(State(state): State<GatewayState>, request: Request) -> Result<Response, GatewayError> {
    let (parts, body) = request.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let body = read_body(body).await;

    let fetch_mode = header_str(&parts.headers, "sec-fetch-mode");
    let accept = header_str(&parts.headers, "accept");
    let class = RequestClass::of(&path_and_query, fetch_mode, accept);

    tracing::debug!(%class, method = %parts.method, path = %path_and_query, "dispatch");

    let incoming = IncomingRequest {
        key: request_key(parts.method.as_str(), &path_and_query),
        method: parts.method,
        path_and_query,
        headers: parts.headers,
        body,
    };

    let response = match class {
        RequestClass::Navigation => strategy::navigation::serve(&state, incoming).await?,
        RequestClass::Media => strategy::media::serve(&state, incoming).await?,
        RequestClass::Asset => strategy::asset::serve(&state, incoming).await?,
    };

    Ok(response)
}

async fn read_body(body: Body) -> Bytes {
    // A request body that fails mid-read is forwarded as whatever arrived;
    // the upstream fetch surfaces any resulting inconsistency.
    axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
