//! # Migrations
//!
//! Schema migrations embedded from `migrations/`. Every migration is
//! reversible, so the schema can be rolled all the way back.

use shop_core::{ShopError, ShopResult};
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

/// Embedded migration set
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Apply every pending migration. Already up to date is not an error.
pub async fn up(pool: &PgPool) -> ShopResult<()> {
    MIGRATOR.run(pool).await.map_err(migrate_error)?;
    info!(available = MIGRATOR.iter().count(), "migrations applied");
    Ok(())
}

/// Revert every applied migration. An empty schema is not an error.
pub async fn down(pool: &PgPool) -> ShopResult<()> {
    MIGRATOR.undo(pool, 0).await.map_err(migrate_error)?;
    info!("migrations reverted");
    Ok(())
}

fn migrate_error(e: MigrateError) -> ShopError {
    tracing::error!(error = %e, "migration failed");
    ShopError::persistence(format!("migration failed: {e}"))
}
