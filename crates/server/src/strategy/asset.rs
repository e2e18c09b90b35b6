//! Cache-first strategy with background refresh for generic assets.

use axum::response::Response;

use haven_core::Error;

use crate::dispatch::{GatewayState, IncomingRequest};
use crate::proxy;

/// Serve a generic asset: cached copy first, refreshed in the background.
///
/// A cached entry is returned immediately and a detached task refreshes
/// it; failures of that task are discarded. On a miss the fetch blocks:
/// store-and-return on success, synthetic empty 504 on transport failure.
pub async fn serve(state: &GatewayState, request: IncomingRequest) -> Result<Response, Error> {
    if let Some(entry) = state.runtime.get(&request.key).await? {
        spawn_refresh(state.clone(), request);
        return Ok(proxy::cached_into_response(&entry));
    }

    let fetched = state
        .client
        .fetch(request.method.clone(), &request.path_and_query, &request.headers, request.body.clone())
        .await;

    match fetched {
        Ok(upstream) => {
            let record = proxy::to_cached(&request.path_and_query, &upstream);
            state.runtime.put(&request.key, &record).await?;
            Ok(proxy::upstream_into_response(upstream))
        }
        Err(err) => {
            tracing::debug!(%err, path = %request.path_and_query, "asset fetch failed with no cached copy");
            Ok(proxy::gateway_timeout())
        }
    }
}

/// Refresh the cached entry after the caller has been answered.
///
/// Fetch and store failures alike are invisible to users; they only show
/// up in debug logging.
fn spawn_refresh(state: GatewayState, request: IncomingRequest) {
    tokio::spawn(async move {
        match state
            .client
            .fetch(request.method, &request.path_and_query, &request.headers, request.body)
            .await
        {
            Ok(upstream) => {
                let record = proxy::to_cached(&request.path_and_query, &upstream);
                if let Err(err) = state.runtime.put(&request.key, &record).await {
                    tracing::debug!(%err, "background refresh store failed");
                }
            }
            Err(err) => tracing::debug!(%err, "background refresh failed"),
        }
    });
}
