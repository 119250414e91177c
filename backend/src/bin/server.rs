//! OEE HTTP Server Binary
//!
//! This is the main entry point for the OEE REST/WebSocket server.
//! It initializes the repository, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the local (in-memory) repository, optionally seeded
//! LOCAL_SEED_FILE=fixtures/records.json cargo run --bin oee-server
//!
//! # Run against SQL Server
//! DB_SERVER=plant-sql DB_NAME=Production DB_USER=oee DB_PASSWORD=... \
//!   cargo run --bin oee-server --features mssql-repo
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8000)
//! - `PUSH_INTERVAL_SECS`: WebSocket push cadence (default: 30)
//! - `FETCH_CONCURRENCY`: Parallel bucket fetches per hourly query (default: 4)
//! - `ALLOWED_ORIGINS`: Comma-separated CORS origins (default: any)
//! - `REPOSITORY_CONFIG`: Path to a `repository.toml` (default: search standard locations)
//! - `REPOSITORY_TYPE`: `local` or `mssql` when no config file is found
//! - `DB_SERVER`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`, `DB_PORT`: SQL Server settings
//! - `RUST_LOG`: Log filter (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use oee_rust::db::{FullRepository, RecordRepository, RepositoryConfig, RepositoryFactory};
use oee_rust::http::{create_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting OEE HTTP Server");

    let config = ServerConfig::from_env().map_err(anyhow::Error::msg)?;
    let repository = create_repository().await?;
    info!("Repository initialized successfully");

    match repository.health_check().await {
        Ok(true) => info!("Record store reachable"),
        Ok(false) => warn!("Record store not reachable yet; queries will fail until it is"),
        Err(e) => warn!("Record store health check failed: {}", e),
    }

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_address()))?;
    info!(
        "Push interval {:?}, fetch concurrency {}",
        config.push_interval, config.fetch_concurrency
    );

    let state = AppState::with_config(repository, config);
    let subscriptions = state.subscriptions.clone();
    let app = create_router(state);

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Shutdown requested");
            subscriptions.shutdown();
        })
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Build the repository from `repository.toml` when present, else from the environment.
async fn create_repository() -> anyhow::Result<Arc<dyn FullRepository>> {
    let file_config = match env::var("REPOSITORY_CONFIG") {
        Ok(path) => Some(
            RepositoryConfig::from_file(&path).with_context(|| format!("Loading {}", path))?,
        ),
        Err(_) => RepositoryConfig::from_default_location().ok(),
    };

    let repository = match file_config {
        Some(config) => {
            info!("Using {} repository from configuration file", config.repository.repo_type);
            RepositoryFactory::from_config(&config).await?
        }
        None => RepositoryFactory::from_env().await?,
    };
    Ok(repository)
}
