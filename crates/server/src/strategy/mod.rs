//! The three cache strategies.
//!
//! Classification picks exactly one per request. Navigations favor
//! freshness: stale HTML can reference assets that no longer exist.
//! Media and generic assets favor latency: large, slowly-changing
//! payloads where instant display matters more than absolute freshness.
//! The mapping is a fixed policy table with no per-route overrides.

pub mod asset;
pub mod media;
pub mod navigation;
