//! Coindash API Server
//!
//! HTTP API for the strategy dashboard: portfolio composition, live
//! prices, chart data and strategy metadata. Stateless - all data is
//! fetched per request from the exchange and the strategy store.

use coindash::config::Config;
use coindash::core::http::start_server;
use coindash::logging;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = Config::from_env();
    info!("Starting Coindash API Server");
    info!(environment = %config.environment, "Environment");
    info!(port = config.port, "HTTP Server: http://0.0.0.0:{}", config.port);

    // Validate once at startup. Boot anyway: the prices and dashboard
    // endpoints work without credentials, and the signed endpoints
    // report the same missing fields per request.
    let missing = config.exchange.missing_fields();
    if !missing.is_empty() {
        warn!(missing = ?missing, "exchange configuration incomplete - signed endpoints will fail");
    }

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(config).await {
            error!(error = %e, "HTTP server error");
        }
    });

    // Graceful shutdown
    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
            info!("API server stopped");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
