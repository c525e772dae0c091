//! User profile REST API server.
//!
//! Opens the file-backed user store, seeds it when empty, and serves the
//! REST API until Ctrl+C.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::Level;

use user_api::{config::ApiConfig, router::Router, server::Server};
use user_store::{seed::seed_if_empty, StoreConfig, UserStore};

/// Command-line arguments for the API server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "USER_API_PORT", default_value_t = 5000)]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "USER_API_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Data directory holding users.json
    #[arg(long, env = "USER_API_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Response timeout in milliseconds
    #[arg(long, default_value_t = 10000)]
    response_timeout_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Initialize tracing subscriber for logging
    let level = if args.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let store_config = StoreConfig {
        data_dir: args.data_dir.clone(),
        ..Default::default()
    };
    let api_config = Arc::new(ApiConfig {
        request_timeout_ms: args.request_timeout_ms,
        response_timeout_ms: args.response_timeout_ms,
    });

    // Storage failures are only fatal here, at startup
    let store = UserStore::open(&store_config).with_context(|| {
        format!("Failed to open user store in {}", args.data_dir.display())
    })?;
    let store = Arc::new(store);

    if let Err(e) = seed_if_empty(&store) {
        tracing::error!("Seeding sample users failed, continuing without them: {}", e);
    }

    let router = Router::new(store, api_config);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    let server = Server::bind(addr, router)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Starting user profile API server...");
    tracing::info!("  Host: {}", args.host);
    tracing::info!("  Port: {}", args.port);
    tracing::info!("  Data directory: {}", args.data_dir.display());
    tracing::info!("  Request timeout: {} ms", args.request_timeout_ms);
    tracing::info!("  Response timeout: {} ms", args.response_timeout_ms);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.serve().await {
            tracing::error!("Server error: {}", e);
        }
    });

    // Wait for Ctrl+C
    signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl_c")?;
    tracing::info!("Shutting down server...");
    server_handle.abort();

    Ok(())
}
