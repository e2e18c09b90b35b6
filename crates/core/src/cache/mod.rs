//! SQLite-backed cache partition store.
//!
//! This module provides the persistent key/value store behind the gateway's
//! cache partitions, with async access via tokio-rusqlite. It supports:
//!
//! - Named partitions (created on first open, deleted by name)
//! - Stored responses keyed by request identity (SHA-256 of method + URL)
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod entries;
pub mod key;
pub mod migrations;
pub mod partitions;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::CachedResponse;
pub use partitions::Partition;
