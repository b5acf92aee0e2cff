//! Schema migrations embedded from `migrations/` at compile time.
//!
//! Applied versions are tracked by sqlx in `_sqlx_migrations`.

use sqlx::migrate::Migrator;
use tracing::info;

use crate::{dao::PoolType, error::Error};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run all pending migrations.
pub async fn run_migrations(pool: &PoolType) -> Result<(), Error> {
    info!("Running database migrations...");
    MIGRATOR.run(pool).await?;
    info!("Database schema at version {}", latest_version());

    Ok(())
}

pub fn latest_version() -> i64 {
    MIGRATOR
        .iter()
        .map(|migration| migration.version)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::DatabasePool;

    #[test]
    fn test_migrations_are_embedded() {
        let mut prev_version = 0;
        for migration in MIGRATOR.iter() {
            assert!(
                migration.version > prev_version,
                "Migrations must have unique ascending version numbers"
            );
            prev_version = migration.version;
        }
        assert_eq!(MIGRATOR.iter().next().map(|m| m.version), Some(1));
        assert_eq!(latest_version(), 2);
    }

    #[tokio::test]
    async fn test_run_migrations_twice() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("feeds.db").display());
        let database = DatabasePool::open(&url).await.unwrap();

        run_migrations(database.get_pool()).await.unwrap();
        run_migrations(database.get_pool()).await.unwrap();

        let applied: Vec<(i64,)> =
            sqlx::query_as("SELECT version FROM _sqlx_migrations ORDER BY version")
                .fetch_all(database.get_pool())
                .await
                .unwrap();
        assert_eq!(applied, vec![(1,), (2,)]);

        let (tables,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'trade'",
        )
        .fetch_one(database.get_pool())
        .await
        .unwrap();
        assert_eq!(tables, 1);

        database.close().await;
    }
}
