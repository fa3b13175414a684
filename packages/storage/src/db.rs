// ABOUTME: Database connection management and migration runner
// ABOUTME: Provides the shared SQLite pool used by settings and arrival storage

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

use crate::StorageError;

/// Open (creating if necessary) the local database at `path` and run migrations
pub async fn connect(path: &Path) -> Result<SqlitePool, StorageError> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
    }

    debug!("Connecting to database at {}", path.display());

    // Build options from the path directly; URL parsing would trip over
    // characters like '?' in file names
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    connect_with(options, 10).await
}

/// Open the database at its default location (~/.huddle/huddle.db)
pub async fn connect_default() -> Result<SqlitePool, StorageError> {
    connect(&huddle_core::huddle_db_file()).await
}

/// Open an in-memory database, used by tests and throwaway sessions
pub async fn connect_memory() -> Result<SqlitePool, StorageError> {
    let options = SqliteConnectOptions::from_str(":memory:").map_err(StorageError::Sqlx)?;
    // A single connection so every handle sees the same in-memory database
    connect_with(options, 1).await
}

async fn connect_with(
    options: SqliteConnectOptions,
    max_connections: u32,
) -> Result<SqlitePool, StorageError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect_with(options)
        .await
        .map_err(StorageError::Sqlx)?;

    // Configure SQLite settings
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::query("PRAGMA synchronous = NORMAL")
        .execute(&pool)
        .await
        .map_err(StorageError::Sqlx)?;

    info!("Database connection established");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(StorageError::Migration)?;

    debug!("Database migrations completed");

    Ok(pool)
}
