use anyhow::{Context, Result};
use surfsup_core::{AppError, Config};
use surfsup_store::ClimateStore;

#[tokio::main]
async fn main() -> Result<()> {
    surfsup_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    let addr = config.server.socket_addr()?;

    let store = ClimateStore::from_config(&config.database);
    store
        .verify_schema()
        .map_err(AppError::from)
        .with_context(|| format!("Cannot serve {}", store.path().display()))?;

    tracing::info!("Serving observations from {}", store.path().display());

    surfsup_api::serve(store, addr, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
