//! Gateway lifecycle: install-time precaching and activation sweep.
//!
//! Both run at startup, before the listener binds. Install is a hard
//! precondition: any manifest path that cannot be fetched and stored
//! aborts startup, leaving whatever was previously deployed in control.

use bytes::Bytes;
use http::{HeaderMap, Method};

use haven_client::UpstreamClient;
use haven_core::cache::key::request_key;
use haven_core::{CacheDb, Error, Partition};

use crate::proxy;
use crate::release;

/// Populate the precache partition from the manifest.
///
/// Every path is fetched exactly once, no retries. A transport error or a
/// non-success status for any path fails the whole install.
pub async fn install(db: &CacheDb, client: &UpstreamClient) -> Result<(), Error> {
    let precache = db.open_partition(&release::precache_partition()).await?;

    for path in release::PRECACHE_PATHS {
        let response = client
            .fetch(Method::GET, path, &HeaderMap::new(), Bytes::new())
            .await
            .map_err(|e| Error::InstallFailed { path: path.to_string(), reason: e.to_string() })?;

        if !response.status.is_success() {
            return Err(Error::InstallFailed {
                path: path.to_string(),
                reason: format!("status {}", response.status.as_u16()),
            });
        }

        let record = proxy::to_cached(path, &response);
        precache.put(&request_key("GET", path), &record).await?;
    }

    tracing::info!(tag = release::RELEASE_TAG, paths = release::PRECACHE_PATHS.len(), "install complete");
    Ok(())
}

/// Sweep partitions from previous releases and open the current pair.
///
/// Deletes every partition whose name is neither the current precache nor
/// the current runtime partition name, then registers both current names.
pub async fn activate(db: &CacheDb) -> Result<(Partition, Partition), Error> {
    let precache_name = release::precache_partition();
    let runtime_name = release::runtime_partition();

    for name in db.partition_names().await? {
        if name != precache_name && name != runtime_name {
            db.delete_partition(&name).await?;
            tracing::info!(partition = %name, "swept stale partition");
        }
    }

    let precache = db.open_partition(&precache_name).await?;
    let runtime = db.open_partition(&runtime_name).await?;

    tracing::info!(tag = release::RELEASE_TAG, "activation complete");
    Ok((precache, runtime))
}
