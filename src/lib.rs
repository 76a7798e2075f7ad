pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

use domain::error::{AppError, Result};
use infrastructure::config::AppConfig;
use tracing::info;

/// Loads configuration, prepares the application state and runs the HTTP
/// server until shutdown.
pub async fn run() -> Result<()> {
    let config = AppConfig::load()?;
    let host = config.server.host.clone();
    let port = config.server.port;

    let state = infrastructure::bootstrap::build_state(config).await?;

    let server = interfaces::http::start_server(state)
        .map_err(|e| AppError::Internal(format!("Failed to bind HTTP server: {}", e)))?;

    info!(host = %host, port, "Planix listening");

    server
        .await
        .map_err(|e| AppError::Internal(format!("HTTP server error: {}", e)))
}
