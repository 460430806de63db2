//! OneLifeTime Backend
//!
//! Projects a person's end-of-life instant from country life-expectancy
//! data and lifestyle factors, and counts the remaining seconds down.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling and routing
//! - Services: table loading and calculations
//! - Countdown: timer-driven counters and their update stream

use anyhow::Result;
use onelifetime_backend::{config, routes, services::TableService, state::AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting OneLifeTime Backend"
    );

    // Load the life-expectancy table once; it is read-only from here on
    let loaded = TableService::load(config.data.table_path.as_deref());
    for diagnostic in &loaded.diagnostics {
        warn!(?diagnostic, "Life expectancy table diagnostic");
    }
    info!(
        countries = loaded.table.len(),
        fallback = loaded.table.source().is_fallback(),
        "Life expectancy table loaded"
    );

    // Create application state
    let state = AppState::new(loaded.table, config.clone());
    let countdowns = state.countdowns.clone();

    // Build application
    let app = routes::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let disposed = countdowns.dispose_all();
    info!(disposed, "Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "onelifetime_backend=info,tower_http=info".into()
        } else {
            "onelifetime_backend=debug,tower_http=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
