use std::sync::Arc;

use userstore::{Database, DbConfig, InMemoryUserStore, SqlUserStore};
use userstore_axum::{SharedUserStore, user_router};

mod config;
mod server;

use crate::{
    config::{ServerConfig, StoreType},
    server::{init_tracing, serve_https},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // axum-server needs a process-level CryptoProvider before loading certificates
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "Failed to install default CryptoProvider")?;

    dotenvy::dotenv().ok();
    init_tracing(env!("CARGO_CRATE_NAME"));

    let config = ServerConfig::from_env()?;
    tracing::info!(store_type = %config.store_type, "Starting user server");

    let store: SharedUserStore = match config.store_type {
        StoreType::Memory => Arc::new(InMemoryUserStore::new()),
        StoreType::Postgres | StoreType::Sqlite => {
            let db_config = DbConfig::from_env(config.store_type.as_str())?;
            tracing::info!("Using database {}", db_config.describe());
            Arc::new(SqlUserStore::new(Arc::new(Database::new(db_config))))
        }
    };

    // Connects the relational store; a failure here stops the process
    if let Err(e) = store.init().await {
        tracing::error!(error = %e, "Failed to initialize user store");
        return Err(e.into());
    }

    let app = user_router(store);
    serve_https(&config, app).await
}
