//! Partition registry operations.
//!
//! Partitions model the named cache namespaces of the gateway: one
//! precache partition populated at install, one runtime partition
//! populated lazily, and (after an upgrade) orphaned partitions from
//! previous release tags awaiting the activation sweep.

use super::connection::CacheDb;
use crate::Error;
use tokio_rusqlite::params;

/// Handle to a named partition.
///
/// Cheap to clone; all handles share the database connection.
#[derive(Clone, Debug)]
pub struct Partition {
    pub(crate) db: CacheDb,
    pub(crate) name: String,
}

impl Partition {
    /// The partition name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl CacheDb {
    /// Open a partition by name, creating it if it doesn't exist.
    ///
    /// Opening is idempotent: the name is registered on first open and
    /// subsequent opens return a handle to the same partition.
    pub async fn open_partition(&self, name: &str) -> Result<Partition, Error> {
        let owned = name.to_string();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO partitions (name, created_at) VALUES (?1, ?2)",
                    params![owned, chrono::Utc::now().to_rfc3339()],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        Ok(Partition { db: self.clone(), name: name.to_string() })
    }

    /// List all existing partition names.
    pub async fn partition_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM partitions ORDER BY name")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a partition and all of its entries.
    ///
    /// Returns true if the partition existed.
    pub async fn delete_partition(&self, name: &str) -> Result<bool, Error> {
        let owned = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute("DELETE FROM partitions WHERE name = ?1", params![owned])?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_registers_name() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open_partition("precache-v1").await.unwrap();

        let names = db.partition_names().await.unwrap();
        assert_eq!(names, vec!["precache-v1"]);
    }

    #[tokio::test]
    async fn test_open_idempotent() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open_partition("runtime-v1").await.unwrap();
        db.open_partition("runtime-v1").await.unwrap();

        let names = db.partition_names().await.unwrap();
        assert_eq!(names.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_partition() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.open_partition("precache-v0.9").await.unwrap();
        db.open_partition("precache-v1").await.unwrap();

        assert!(db.delete_partition("precache-v0.9").await.unwrap());
        assert!(!db.delete_partition("precache-v0.9").await.unwrap());

        let names = db.partition_names().await.unwrap();
        assert_eq!(names, vec!["precache-v1"]);
    }
}
