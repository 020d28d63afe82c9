use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use protocol_manager::config;
use protocol_manager::database::DatabaseManager;
use protocol_manager::handlers::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    info!("Starting protocol manager in {:?} mode", config.environment);

    let pool = DatabaseManager::pool().await.context("failed to connect to the database")?;
    if config.database.bootstrap_schema {
        DatabaseManager::bootstrap(&pool).await.context("failed to apply schema")?;
    }

    let app = router(AppState::new(pool, config), config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Protocol manager listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    DatabaseManager::close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
