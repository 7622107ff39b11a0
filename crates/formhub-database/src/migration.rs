//! Schema migrations for the PostgreSQL document store.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use formhub_core::error::{AppError, ErrorKind};

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply pending migrations to the `documents` schema.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let known = MIGRATOR.iter().count();
    info!(migrations = known, "Applying document store migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, format!("Migration failed: {e}"), e)
    })?;

    info!("Document store schema is up to date");
    Ok(())
}
