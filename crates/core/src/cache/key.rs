//! Request-identity cache key generation.

use sha2::{Digest, Sha256};

/// Compute the storage key identifying a request within a partition.
///
/// The identity is the HTTP method plus the URL path-and-query. Fragments
/// never reach the server and response headers play no part; two requests
/// with the same method and URL always map to the same entry.
pub fn request_key(method: &str, path_and_query: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b"\n");
    hasher.update(path_and_query.as_bytes());
    hex::encode(hasher.finalize())
}
