// ABOUTME: Storage layer for recorded event arrivals
// ABOUTME: SQLite CRUD over the event_arrivals table

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use huddle_storage::StorageError;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::types::EventArrival;

/// Durable persistence for arrival records
#[async_trait]
pub trait ArrivalStorage: Send + Sync {
    /// Record an arrival; recording the same user at the same event again
    /// refreshes the timestamp
    async fn record_arrival(&self, arrival: &EventArrival) -> Result<(), StorageError>;

    /// All recorded arrivals for an event, earliest first
    async fn arrivals_for_event(&self, event_id: &str) -> Result<Vec<EventArrival>, StorageError>;

    /// Remove every arrival recorded for an event
    async fn clear_event(&self, event_id: &str) -> Result<(), StorageError>;
}

pub struct SqliteArrivalStorage {
    pool: SqlitePool,
}

impl SqliteArrivalStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_arrival(&self, row: sqlx::sqlite::SqliteRow) -> Result<EventArrival, StorageError> {
        Ok(EventArrival {
            id: row.try_get("id").map_err(StorageError::Sqlx)?,
            event_id: row.try_get("event_id").map_err(StorageError::Sqlx)?,
            user_id: row.try_get("user_id").map_err(StorageError::Sqlx)?,
            arrived_at: row
                .try_get::<DateTime<Utc>, _>("arrived_at")
                .map_err(StorageError::Sqlx)?,
        })
    }
}

#[async_trait]
impl ArrivalStorage for SqliteArrivalStorage {
    async fn record_arrival(&self, arrival: &EventArrival) -> Result<(), StorageError> {
        debug!(
            "Recording arrival of {} at event {}",
            arrival.user_id, arrival.event_id
        );

        sqlx::query(
            r#"
            INSERT INTO event_arrivals (id, event_id, user_id, arrived_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(event_id, user_id) DO UPDATE SET
                arrived_at = excluded.arrived_at
            "#,
        )
        .bind(&arrival.id)
        .bind(&arrival.event_id)
        .bind(&arrival.user_id)
        .bind(arrival.arrived_at)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    async fn arrivals_for_event(&self, event_id: &str) -> Result<Vec<EventArrival>, StorageError> {
        let rows =
            sqlx::query("SELECT * FROM event_arrivals WHERE event_id = ? ORDER BY arrived_at")
                .bind(event_id)
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

        rows.into_iter()
            .map(|row| self.row_to_arrival(row))
            .collect()
    }

    async fn clear_event(&self, event_id: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM event_arrivals WHERE event_id = ?")
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(())
    }
}
