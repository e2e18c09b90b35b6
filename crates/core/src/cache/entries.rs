//! Stored-response CRUD operations.
//!
//! Entries hold complete upstream responses (status, headers, body) so a
//! cached reply can be served byte-for-byte without touching the network.

use super::partitions::Partition;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A stored response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    /// URL (path-and-query) the response was stored under.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response headers, in arrival order.
    pub headers: Vec<(String, String)>,
    /// Response body bytes.
    pub body: Vec<u8>,
    /// RFC3339 timestamp of when the entry was written.
    pub stored_at: String,
}

impl CachedResponse {
    /// Create a record stamped with the current time.
    pub fn new(url: impl Into<String>, status: u16, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            status,
            headers,
            body,
            stored_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl Partition {
    /// Insert or update a stored response.
    ///
    /// Uses UPSERT semantics: a fresh store for the same key overwrites
    /// any prior entry. Each put is a single atomic statement; concurrent
    /// writers for the same key race and the last one wins.
    pub async fn put(&self, key: &str, response: &CachedResponse) -> Result<(), Error> {
        let partition = self.name.clone();
        let key = key.to_string();
        let response = response.clone();
        let headers_json = serde_json::to_string(&response.headers).unwrap_or_default();
        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entries (partition, key, url, status, headers_json, body, stored_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                     ON CONFLICT(partition, key) DO UPDATE SET
                        url = excluded.url,
                        status = excluded.status,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![
                        partition,
                        key,
                        response.url,
                        response.status as i64,
                        headers_json,
                        response.body,
                        response.stored_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get a stored response by key.
    ///
    /// Returns None if the key has no entry in this partition.
    pub async fn get(&self, key: &str) -> Result<Option<CachedResponse>, Error> {
        let partition = self.name.clone();
        let key = key.to_string();
        self.db
            .conn
            .call(move |conn| -> Result<Option<CachedResponse>, Error> {
                let result = conn.query_row(
                    "SELECT url, status, headers_json, body, stored_at
                     FROM entries WHERE partition = ?1 AND key = ?2",
                    params![partition, key],
                    |row| {
                        let headers_json: String = row.get(2)?;
                        Ok(CachedResponse {
                            url: row.get(0)?,
                            status: row.get::<_, i64>(1)? as u16,
                            headers: serde_json::from_str(&headers_json).unwrap_or_default(),
                            body: row.get(3)?,
                            stored_at: row.get(4)?,
                        })
                    },
                );

                match result {
                    Ok(r) => Ok(Some(r)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Number of entries in this partition.
    pub async fn len(&self) -> Result<u64, Error> {
        let partition = self.name.clone();
        self.db
            .conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM entries WHERE partition = ?1",
                    params![partition],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
