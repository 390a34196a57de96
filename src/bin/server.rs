//! yagcil read API server
//!
//! Environment:
//! - `YAGCIL_STORAGE_DIR`: storage directory (default `storage`)
//! - `YAGCIL_CONFIG`: config file (default `{storage_dir}/config.toml`)
//! - `RUST_LOG`: log filter (default `info`)

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use yagcil::{
    error::{AppError, Result},
    models::Config,
    server,
    services::QueryEngine,
    storage::LocalStorage,
};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let storage_dir =
        PathBuf::from(env::var("YAGCIL_STORAGE_DIR").unwrap_or_else(|_| "storage".to_string()));
    let config_path = env::var("YAGCIL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| storage_dir.join("config.toml"));

    let config = Config::load_or_default(&config_path);
    init_tracing(config.server.json_logs);
    config.validate()?;

    tracing::info!("Opening storage at {}", storage_dir.display());
    let store = Arc::new(LocalStorage::open(&storage_dir).await?);
    let engine = QueryEngine::new(store, config.years()?);

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .map_err(|e| AppError::config(format!("server.bind: {e}")))?;
    server::serve(engine, addr).await
}
