//! Conversions between upstream responses, stored records, and HTTP
//! responses, plus the synthetic failure responses.

use axum::body::Body;
use axum::response::Response;
use http::{HeaderName, HeaderValue, StatusCode, header};

use haven_client::UpstreamResponse;
use haven_core::CachedResponse;

/// Build a storable record from an upstream response.
///
/// The client has already stripped hop-by-hop headers; the record keeps
/// the remaining headers verbatim so a cached reply is served the way the
/// upstream sent it.
pub fn to_cached(path_and_query: &str, upstream: &UpstreamResponse) -> CachedResponse {
    let headers = upstream
        .headers
        .iter()
        .map(|(name, value)| (name.as_str().to_string(), String::from_utf8_lossy(value.as_bytes()).into_owned()))
        .collect();
    CachedResponse::new(path_and_query, upstream.status.as_u16(), headers, upstream.bytes.to_vec())
}

/// Serve a stored record as an HTTP response.
pub fn cached_into_response(cached: &CachedResponse) -> Response {
    let mut response = Response::new(Body::from(cached.body.clone()));
    *response.status_mut() = StatusCode::from_u16(cached.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let headers = response.headers_mut();
    for (name, value) in &cached.headers {
        if let (Ok(name), Ok(value)) = (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
            headers.append(name, value);
        }
    }

    response
}

/// Serve a live upstream response.
pub fn upstream_into_response(upstream: UpstreamResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.bytes));
    *response.status_mut() = upstream.status;
    *response.headers_mut() = upstream.headers;
    response
}

/// Synthetic 503 returned to navigations when the network is down and the
/// precache holds no root document.
pub fn offline_fallback() -> Response {
    let mut response = Response::new(Body::from("offline"));
    *response.status_mut() = StatusCode::SERVICE_UNAVAILABLE;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
}

/// Synthetic empty 504 returned when a fetch fails and no cached entry
/// exists.
pub fn gateway_timeout() -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::GATEWAY_TIMEOUT;
    response
}
