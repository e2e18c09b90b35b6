//! Stale-while-revalidate strategy for media payloads.

use axum::response::Response;
use tokio::task::JoinHandle;

use haven_client::UpstreamResponse;
use haven_core::Error;

use crate::dispatch::{GatewayState, IncomingRequest};
use crate::proxy;

/// Serve a media request: stale copy first, revalidate concurrently.
///
/// The revalidation fetch is issued before the cache is consulted. A
/// cached entry is returned immediately, never waiting on the fetch; the
/// detached task overwrites the entry when it completes. On a miss the
/// fetch outcome decides: store-and-return on success, synthetic empty
/// 504 on transport failure.
pub async fn serve(state: &GatewayState, request: IncomingRequest) -> Result<Response, Error> {
    let revalidation = spawn_revalidation(state.clone(), request.clone());

    match state.runtime.get(&request.key).await? {
        Some(entry) => Ok(proxy::cached_into_response(&entry)),
        None => match revalidation.await {
            Ok(Ok(upstream)) => Ok(proxy::upstream_into_response(upstream)),
            Ok(Err(store_err @ Error::Database(_))) => Err(store_err),
            Ok(Err(fetch_err)) => {
                tracing::debug!(%fetch_err, path = %request.path_and_query, "media fetch failed with no cached copy");
                Ok(proxy::gateway_timeout())
            }
            Err(join_err) => Err(Error::Upstream(join_err.to_string())),
        },
    }
}

/// Fetch upstream and refresh the cached entry.
///
/// Runs to completion whether or not the caller is still waiting; when
/// the caller already answered from cache the handle is simply dropped.
fn spawn_revalidation(
    state: GatewayState, request: IncomingRequest,
) -> JoinHandle<Result<UpstreamResponse, Error>> {
    tokio::spawn(async move {
        let upstream = state
            .client
            .fetch(request.method, &request.path_and_query, &request.headers, request.body)
            .await
            .inspect_err(|err| tracing::debug!(%err, "media revalidation failed"))?;

        let record = proxy::to_cached(&request.path_and_query, &upstream);
        state.runtime.put(&request.key, &record).await?;
        Ok(upstream)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support;
    use http::StatusCode;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_hit_does_not_wait_for_revalidation() {
        let origin = support::spawn_upstream(support::slow_upstream(Duration::from_millis(1500), "new")).await;
        let state = support::gateway_state(&origin).await;

        let request = support::get("/loop.mp4");
        support::seed_runtime(&state, &request, 200, b"old").await;

        let start = Instant::now();
        let response = serve(&state, request.clone()).await.unwrap();
        let elapsed = start.elapsed();

        assert_eq!(support::collect_body(response).await, b"old");
        assert!(elapsed < Duration::from_millis(1000), "waited on revalidation: {elapsed:?}");

        // The detached task lands the fresh copy for future requests.
        let refreshed = support::wait_for_body(&state.runtime, &request.key, b"new").await;
        assert_eq!(refreshed.body, b"new");
    }

    #[tokio::test]
    async fn test_hit_survives_dead_upstream() {
        let state = support::gateway_state(support::DEAD_ORIGIN).await;

        let request = support::get("/splash.webm");
        support::seed_runtime(&state, &request, 200, b"stale").await;

        let response = serve(&state, request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(support::collect_body(response).await, b"stale");
    }

    #[tokio::test]
    async fn test_miss_fetches_stores_and_returns() {
        let origin = support::spawn_upstream(support::static_upstream("frames")).await;
        let db = haven_core::CacheDb::open_in_memory().await.unwrap();
        let state = support::gateway_state_with_db(db.clone(), &origin).await;

        let request = support::get("/video.mp4");
        let response = serve(&state, request.clone()).await.unwrap();
        assert_eq!(support::collect_body(response).await, b"frames");

        // Same store, upstream now unreachable: still served from cache.
        let offline = support::gateway_state_with_db(db, support::DEAD_ORIGIN).await;
        let replay = serve(&offline, request).await.unwrap();
        assert_eq!(support::collect_body(replay).await, b"frames");
    }

    #[tokio::test]
    async fn test_miss_with_dead_upstream_is_empty_504() {
        let state = support::gateway_state(support::DEAD_ORIGIN).await;

        let response = serve(&state, support::get("/missing.png")).await.unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert!(support::collect_body(response).await.is_empty());
    }
}
