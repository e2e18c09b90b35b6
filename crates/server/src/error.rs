//! Per-request error surface.

use axum::response::{IntoResponse, Response};
use http::StatusCode;

use haven_core::Error;

/// Error escaping a request handler.
///
/// Cache-store failures are not specially handled by the strategies: they
/// propagate here and surface as a 500, fatal to that one request and
/// invisible to every other in-flight handler. Upstream transport
/// failures never take this path; the strategies convert those into the
/// synthetic 503/504 responses.
#[derive(Debug)]
pub struct GatewayError(pub Error);

impl From<Error> for GatewayError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request handler failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
