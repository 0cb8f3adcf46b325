//! Productos REST API entry point.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use productos_api::api::{create_router, AppState};
use productos_api::config::Config;
use productos_api::db::{self, ProductoRepository};
use productos_api::keepalive::KeepAlive;
use productos_api::metrics;
use productos_api::utils::shutdown_signal;

/// CRUD REST API for the product inventory.
#[derive(Parser, Debug)]
#[command(name = "productos-api")]
#[command(about = "CRUD REST API for productos backed by MySQL")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Listening port (overrides PORT from the environment).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("productos_api=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Initialize metrics
    metrics::init_metrics();

    // Load configuration
    info!("Loading configuration...");
    let mut config = Config::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    if let Some(port) = args.port {
        config.port = port;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(anyhow::anyhow!("configuration validation failed: {}", e));
    }

    info!("Configuration loaded successfully");
    info!("Environment: {}", config.app_env);

    // Connect to the database; a failure here is unrecoverable.
    let pool = db::connect(&config).await.map_err(|e| {
        error!("Failed to connect to the database: {}", e);
        e
    })?;
    info!(
        "Database pool ready (max {} connections)",
        config.db_max_connections
    );

    // Wire the application state
    let repo = ProductoRepository::new(pool);
    let keep_alive = KeepAlive::new(&config);
    let state = AppState::new(repo, keep_alive.clone(), config.app_env.clone());
    let router = create_router(state, &config.allowed_origins());

    // Start HTTP server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);
    info!("Health check: http://localhost:{}/health", config.port);
    info!("API productos: http://localhost:{}/api/productos", config.port);

    // Activate the self-ping timer (no-op outside production).
    keep_alive.start();

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("shutdown signal received, closing server...");

            // If graceful shutdown stalls, force the process down.
            tokio::spawn(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                error!("graceful shutdown timed out, forcing exit");
                std::process::exit(1);
            });
        })
        .await?;

    keep_alive.stop();
    info!("HTTP server closed");

    Ok(())
}
