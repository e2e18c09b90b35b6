//! Network-first strategy for navigational HTML.

use axum::response::Response;

use haven_core::Error;
use haven_core::cache::key::request_key;

use crate::dispatch::{GatewayState, IncomingRequest};
use crate::proxy;
use crate::release::ROOT_DOCUMENT;

/// Serve a navigation: one network attempt, cache fallback when offline.
///
/// A successful exchange (any status) is stored into the runtime
/// partition before it is returned. On transport failure the precached
/// root document is served verbatim; failing that, a synthetic 503.
pub async fn serve(state: &GatewayState, request: IncomingRequest) -> Result<Response, Error> {
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
            tracing::debug!(%err, path = %request.path_and_query, "navigation fetch failed, serving offline fallback");
            match state.precache.get(&request_key("GET", ROOT_DOCUMENT)).await? {
                Some(root) => Ok(proxy::cached_into_response(&root)),
                None => Ok(proxy::offline_fallback()),
            }
        }
    }
}
