use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Number of embedded migrations that have not been applied to `pool` yet.
pub async fn pending_count(pool: &DbPool) -> Result<usize, sqlx::Error> {
    let applied: Vec<i64> = sqlx::query_scalar("SELECT version FROM _sqlx_migrations")
        .fetch_all(pool)
        .await
        .or_else(|error| {
            let untracked = matches!(
                &error,
                sqlx::Error::Database(db) if db.message().contains("no such table")
            );
            if untracked {
                Ok(Vec::new())
            } else {
                Err(error)
            }
        })?;

    Ok(MIGRATOR
        .iter()
        .filter(|migration| migration.migration_type.is_up_migration())
        .filter(|migration| !applied.contains(&migration.version))
        .count())
}
