//! Upstream HTTP client for the haven gateway.
//!
//! This crate provides the fetch pipeline used by the gateway's cache
//! strategies and by install-time precaching: origin URL resolution,
//! end-to-end header filtering, and the reqwest-backed upstream client.

pub mod fetch;

pub use fetch::{UpstreamClient, UpstreamOrigin, UpstreamResponse, copy_end_to_end};
