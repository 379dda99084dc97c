//! SQLite schema helpers shared by repository implementations.
//!
//! Applies migrations on start-up so every subcommand (`db_migrate`,
//! `worker`, `run_local_pipeline`, ...) sees a consistent database.

use sqlx::migrate::MigrateDatabase;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Runs pending migrations against the provided SQLite pool.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    debug!("ensuring database schema is up to date");
    sqlx::migrate!("../migrations").run(pool).await?;
    info!("database schema is up to date");
    Ok(())
}

/// Creates a new SQLite database file if it doesn't exist.
///
/// `SqlitePool::connect` fails if the file doesn't exist unless the
/// connect options set `create_if_missing`; this checks and creates it
/// explicitly so the two code paths (`db_migrate` vs. implicit startup)
/// behave identically.
pub async fn create_database_if_missing(database_url: &str) -> Result<(), sqlx::Error> {
    if !sqlx::Sqlite::database_exists(database_url).await? {
        debug!(database_url, "database does not exist, creating");
        sqlx::Sqlite::create_database(database_url).await?;
        info!(database_url, "created new SQLite database");
    } else {
        debug!(database_url, "database already exists");
    }
    Ok(())
}

/// Creates the database if missing, connects, and runs migrations — the
/// single entry point every subcommand uses to get a ready-to-use pool.
pub async fn initialize_database(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    create_database_if_missing(database_url).await?;
    let pool = SqlitePool::connect(database_url).await?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn create_database_if_missing_is_idempotent() {
        let temp = NamedTempFile::new().expect("tempfile");
        let db_path = temp.path().to_str().expect("utf8 path").to_string();
        drop(temp);
        let db_url = format!("sqlite://{db_path}");

        create_database_if_missing(&db_url).await.expect("first create");
        create_database_if_missing(&db_url).await.expect("second create is a no-op");
    }

    #[tokio::test]
    async fn initialize_database_creates_every_table() {
        let temp = NamedTempFile::new().expect("tempfile");
        let db_path = temp.path().to_str().expect("utf8 path").to_string();
        drop(temp);
        let db_url = format!("sqlite://{db_path}");

        let pool = initialize_database(&db_url).await.expect("initialize");

        let count: i32 = sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='projects'")
            .fetch_one(&pool)
            .await
            .expect("query");
        assert_eq!(count, 1, "projects table should exist after migration");
    }

    #[tokio::test]
    async fn ensure_schema_can_run_twice() {
        let temp = NamedTempFile::new().expect("tempfile");
        let db_path = temp.path().to_str().expect("utf8 path").to_string();
        drop(temp);
        let db_url = format!("sqlite://{db_path}");

        create_database_if_missing(&db_url).await.expect("create");
        let pool = SqlitePool::connect(&db_url).await.expect("connect");

        ensure_schema(&pool).await.expect("first migration run");
        ensure_schema(&pool).await.expect("second migration run is idempotent");
    }
}
