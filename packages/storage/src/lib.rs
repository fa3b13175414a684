// ABOUTME: Shared persistence layer for Huddle
// ABOUTME: Storage error taxonomy and SQLite pool construction

use thiserror::Error;

pub mod db;

pub use db::{connect, connect_default, connect_memory};

/// Storage errors shared by every Huddle backend.
///
/// Io, Sqlx, Migration, Keystore and Unavailable are the
/// "backend cannot be reached" kind; Validation and InvalidInput reject a
/// write before it touches the backend.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Keystore error: {0}")]
    Keystore(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Record not found")]
    NotFound,
}

pub type StorageResult<T> = Result<T, StorageError>;
