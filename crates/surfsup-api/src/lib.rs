//! HTTP API for Surfs Up
//!
//! Serves the v1.0 JSON routes over a [`ClimateStore`].

pub mod handlers;
pub mod responses;
pub mod routes;

use std::future::Future;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use surfsup_store::ClimateStore;

pub use routes::routes;

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve<S>(store: ClimateStore, addr: SocketAddr, shutdown: S) -> Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let (bound, server) = warp::serve(routes(store))
        .try_bind_with_graceful_shutdown(addr, shutdown)
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on http://{}", bound);

    server.await;
    tracing::info!("Server stopped");
    Ok(())
}
