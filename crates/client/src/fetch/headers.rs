//! End-to-end header filtering for the proxy path.
//!
//! Hop-by-hop headers describe a single connection and must not be
//! forwarded by an intermediary (RFC 9110 §7.6.1). The same filter is
//! applied to request headers going upstream and to response headers
//! coming back, whether served live or from a cache partition.

use http::HeaderMap;
use http::header::HeaderName;

/// Hop-by-hop headers, plus framing headers the gateway recomputes.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "content-length",
    "host",
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.iter().any(|h| name.as_str() == *h)
}

/// Copy the end-to-end headers of a map, dropping hop-by-hop ones.
pub fn copy_end_to_end(src: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(src.len());
    for (name, value) in src {
        if !is_hop_by_hop(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}
