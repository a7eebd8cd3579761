//! Patch Planner HTTP Server Binary
//!
//! Entry point for the patch planner REST API server. It loads the catalog,
//! sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin patch-planner-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8000)
//! - `CORS_ORIGINS`: Comma-separated allowed origins, or `*`
//! - `PATCH_PLANNER_CONFIG`: Optional path to a TOML config file
//! - `RUST_LOG`: Log filter (falls back to the configured `LOG_LEVEL`)

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use patch_planner::catalog::Catalog;
use patch_planner::config::ServerConfig;
use patch_planner::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;

    // Initialize logging; RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with_target(true)
        .init();

    info!("Starting Patch Planner HTTP Server");

    // Load the read-only catalog once and share it across requests.
    let catalog = Arc::new(Catalog::sample()?);
    info!(
        windows = catalog.windows().len(),
        patches = catalog.patches().len(),
        "Catalog loaded"
    );

    let state = AppState::new(catalog);
    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
