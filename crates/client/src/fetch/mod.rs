//! Upstream fetch pipeline.
//!
//! ### Origin resolution
//! - Every request path resolves against the single configured origin.
//!
//! ### Transport semantics
//! - A completed HTTP exchange is `Ok`, whatever the status code; only
//!   transport failures (connect, DNS, protocol) are `Err`.
//! - No timeout and no cancellation: an issued fetch runs to completion
//!   or failure.
//! - Redirects follow reqwest's default policy; the body is returned
//!   fully buffered and already content-decoded (gzip/brotli/deflate).
//!
//! ### Header hygiene
//! - Hop-by-hop headers are stripped in both directions.

pub mod headers;
pub mod origin;

use std::time::Instant;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};

pub use headers::copy_end_to_end;
pub use origin::{OriginError, UpstreamOrigin};

use haven_core::Error;

/// Response from an upstream fetch.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    /// The resolved upstream URL that was fetched.
    pub url: url::Url,
    /// HTTP status code.
    pub status: StatusCode,
    /// End-to-end response headers.
    pub headers: HeaderMap,
    /// Response body bytes.
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds.
    pub fetch_ms: u64,
}

/// HTTP client bound to the upstream origin.
pub struct UpstreamClient {
    http: reqwest::Client,
    origin: UpstreamOrigin,
}

impl UpstreamClient {
    /// Create a client for the given origin.
    ///
    /// The client carries no request timeout: issued fetches run to
    /// completion or transport failure.
    pub fn new(origin: UpstreamOrigin, user_agent: &str) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Upstream(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, origin })
    }

    /// The configured origin.
    pub fn origin(&self) -> &UpstreamOrigin {
        &self.origin
    }

    /// Fetch a request path from the upstream origin.
    ///
    /// Forwards the end-to-end request headers and body. Returns `Ok` for
    /// any completed exchange; `Err` only on transport failure.
    pub async fn fetch(
        &self, method: Method, path_and_query: &str, request_headers: &HeaderMap, body: Bytes,
    ) -> Result<UpstreamResponse, Error> {
        let start = Instant::now();
        let url = self
            .origin
            .resolve(path_and_query)
            .map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let response = self
            .http
            .request(method, url.clone())
            .headers(copy_end_to_end(request_headers))
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        let status = response.status();
        let headers = copy_end_to_end(response.headers());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        let fetch_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(%url, status = status.as_u16(), bytes = bytes.len(), fetch_ms, "upstream fetch");

        Ok(UpstreamResponse { url, status, headers, bytes, fetch_ms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        let origin = UpstreamOrigin::parse("https://app.example").unwrap();
        let client = UpstreamClient::new(origin, "haven-test/0").unwrap();
        assert_eq!(client.origin().as_str(), "https://app.example/");
    }

    #[tokio::test]
    async fn test_transport_failure_is_err() {
        // Nothing listens on port 1; the connection is refused before any
        // HTTP exchange happens.
        let origin = UpstreamOrigin::parse("http://127.0.0.1:1").unwrap();
        let client = UpstreamClient::new(origin, "haven-test/0").unwrap();

        let result = client
            .fetch(Method::GET, "/index.html", &HeaderMap::new(), Bytes::new())
            .await;
        assert!(matches!(result, Err(Error::Upstream(_))));
    }
}
