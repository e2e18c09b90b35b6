//! Core types and shared functionality for the haven gateway.
//!
//! This crate provides:
//! - Cache partition store with SQLite backend
//! - Stateless request classification
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod classify;
pub mod config;
pub mod error;

pub use cache::{CacheDb, CachedResponse, Partition};
pub use classify::RequestClass;
pub use config::GatewayConfig;
pub use error::Error;
