// ABOUTME: SQLite-backed settings storage
// ABOUTME: Single-row table, partial saves as static per-column updates

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use huddle_storage::StorageError;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::storage::SettingsStorage;
use crate::types::{EventVisibility, SettingsPatch, Units, UserSettings};

/// Settings persisted in the local SQLite database.
///
/// The `user_settings` table holds exactly one row, seeded by migration.
pub struct SqliteSettingsStorage {
    pool: SqlitePool,
}

impl SqliteSettingsStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_settings(&self, row: sqlx::sqlite::SqliteRow) -> Result<UserSettings, StorageError> {
        let units: String = row.try_get("units").map_err(StorageError::Sqlx)?;
        let units = Units::parse(&units)
            .ok_or_else(|| StorageError::InvalidInput(format!("Unknown units value: {}", units)))?;

        let visibility: String = row
            .try_get("default_event_visibility")
            .map_err(StorageError::Sqlx)?;
        let visibility = EventVisibility::parse(&visibility).ok_or_else(|| {
            StorageError::InvalidInput(format!("Unknown visibility value: {}", visibility))
        })?;

        Ok(UserSettings {
            theme: row.try_get("theme").map_err(StorageError::Sqlx)?,
            units,
            default_event_visibility: visibility,
            push_notifications_enabled: row
                .try_get::<i64, _>("push_notifications_enabled")
                .map_err(StorageError::Sqlx)?
                != 0,
            arrival_alerts_enabled: row
                .try_get::<i64, _>("arrival_alerts_enabled")
                .map_err(StorageError::Sqlx)?
                != 0,
            arrival_radius_meters: row
                .try_get("arrival_radius_meters")
                .map_err(StorageError::Sqlx)?,
            quiet_hours_start: row.try_get("quiet_hours_start").map_err(StorageError::Sqlx)?,
            quiet_hours_end: row.try_get("quiet_hours_end").map_err(StorageError::Sqlx)?,
            last_location_prompt_at: row
                .try_get::<Option<DateTime<Utc>>, _>("last_location_prompt_at")
                .map_err(StorageError::Sqlx)?,
            updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
        })
    }
}

#[async_trait]
impl SettingsStorage for SqliteSettingsStorage {
    fn tag(&self) -> &'static str {
        "sqlite"
    }

    async fn load(&self) -> Result<UserSettings, StorageError> {
        let row = sqlx::query("SELECT * FROM user_settings WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => self.row_to_settings(row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn save(&self, patch: &SettingsPatch) -> Result<UserSettings, StorageError> {
        if patch.is_empty() {
            return self.load().await;
        }

        debug!("Persisting settings patch to sqlite");

        // Static per-column statements inside one transaction; no dynamic SQL
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        if let Some(theme) = &patch.theme {
            sqlx::query("UPDATE user_settings SET theme = ? WHERE id = 1")
                .bind(theme)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        if let Some(units) = patch.units {
            sqlx::query("UPDATE user_settings SET units = ? WHERE id = 1")
                .bind(units.as_str())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        if let Some(visibility) = patch.default_event_visibility {
            sqlx::query("UPDATE user_settings SET default_event_visibility = ? WHERE id = 1")
                .bind(visibility.as_str())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        if let Some(enabled) = patch.push_notifications_enabled {
            sqlx::query("UPDATE user_settings SET push_notifications_enabled = ? WHERE id = 1")
                .bind(enabled as i64)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        if let Some(enabled) = patch.arrival_alerts_enabled {
            sqlx::query("UPDATE user_settings SET arrival_alerts_enabled = ? WHERE id = 1")
                .bind(enabled as i64)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        if let Some(radius) = patch.arrival_radius_meters {
            sqlx::query("UPDATE user_settings SET arrival_radius_meters = ? WHERE id = 1")
                .bind(radius)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        if let Some(hour) = patch.quiet_hours_start {
            sqlx::query("UPDATE user_settings SET quiet_hours_start = ? WHERE id = 1")
                .bind(hour)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        if let Some(hour) = patch.quiet_hours_end {
            sqlx::query("UPDATE user_settings SET quiet_hours_end = ? WHERE id = 1")
                .bind(hour)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        if let Some(prompt_at) = patch.last_location_prompt_at {
            sqlx::query("UPDATE user_settings SET last_location_prompt_at = ? WHERE id = 1")
                .bind(prompt_at)
                .execute(&mut *tx)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        sqlx::query("UPDATE user_settings SET updated_at = ? WHERE id = 1")
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        // Return the record as committed, with the updated_at just stamped
        self.load().await
    }
}
