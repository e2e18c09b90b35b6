//! haven gateway entry point.
//!
//! Boots configuration, opens the cache store, runs the install and
//! activate lifecycle, then serves the dispatcher over HTTP.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use haven_client::{UpstreamClient, UpstreamOrigin};
use haven_core::{CacheDb, GatewayConfig};

mod dispatch;
mod error;
mod lifecycle;
mod proxy;
mod release;
mod strategy;
#[cfg(test)]
mod support;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = GatewayConfig::load()?;
    let origin = UpstreamOrigin::parse(config.require_upstream()?)?;
    let client = UpstreamClient::new(origin, &config.user_agent)?;
    let db = CacheDb::open(&config.db_path).await?;

    tracing::info!(
        tag = release::RELEASE_TAG,
        upstream = client.origin().as_str(),
        db = %config.db_path.display(),
        "starting haven gateway"
    );

    lifecycle::install(&db, &client).await?;
    let (precache, runtime) = lifecycle::activate(&db).await?;

    let state = dispatch::GatewayState { client: Arc::new(client), precache, runtime };
    let app = dispatch::router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "listening");

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}
