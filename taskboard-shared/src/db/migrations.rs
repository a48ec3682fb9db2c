/// Schema migrations
///
/// SQL files live in `taskboard-shared/migrations/` and are embedded at
/// compile time with `sqlx::migrate!`. The API server applies them on
/// startup.

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Applies all pending migrations
///
/// # Errors
///
/// Returns the first migration failure; already-applied migrations stay
/// applied.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .inspect_err(|e| warn!(error = %e, "Migration failed"))?;

    info!("Database schema is up to date");
    Ok(())
}
