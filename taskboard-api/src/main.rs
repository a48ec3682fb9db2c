//! # Taskboard API Server
//!
//! Serves the user administration API.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (and `.env`)
//! 2. Initialize tracing (`LOG_FORMAT=json` for JSON output)
//! 3. Connect the database pool and apply migrations
//! 4. Create the initial admin if configured and the store is empty
//! 5. Serve until Ctrl+C, then drain connections and close the pool
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskboard-api
//! ```

use taskboard_api::{
    app::{build_router, AppState},
    bootstrap::ensure_initial_admin,
    config::Config,
};
use taskboard_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool, DatabaseConfig},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let json_logs = config.api.json_logs;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskboard_api=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!(
        "Taskboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;
    run_migrations(&pool).await?;

    let bind_address = config.bind_address();
    let state = AppState::postgres(pool.clone(), config)?;

    match &state.config.bootstrap {
        Some(admin) => {
            ensure_initial_admin(&state, admin).await?;
        }
        None => tracing::debug!("ADMIN_USERNAME not set, no initial admin"),
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await;
}

/// Resolves when `signal` fires; never resolves if listening failed
async fn wait_for_shutdown(signal: impl std::future::Future<Output = std::io::Result<()>>) {
    if let Err(e) = signal.await {
        // Without a signal handler, keep serving until the process is killed
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_shutdown_on_signal() {
        let result =
            tokio::time::timeout(Duration::from_millis(100), wait_for_shutdown(async { Ok(()) }))
                .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_failed_signal_listener_keeps_serving() {
        let failing = async { Err(std::io::Error::new(std::io::ErrorKind::Other, "no handler")) };

        let result =
            tokio::time::timeout(Duration::from_millis(100), wait_for_shutdown(failing)).await;
        assert!(result.is_err());
    }
}
