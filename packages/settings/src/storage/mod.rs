// ABOUTME: Durable persistence contract for user settings
// ABOUTME: One backend per implementation: SQLite, OS keystore, in-memory

use async_trait::async_trait;
use huddle_storage::StorageError;

use crate::types::{SettingsPatch, UserSettings};

pub mod keystore;
pub mod memory;
pub mod sqlite;

pub use keystore::KeystoreSettingsStorage;
pub use memory::MemorySettingsStorage;
pub use sqlite::SqliteSettingsStorage;

/// Durable load/save of the user settings record.
///
/// `save` persists only the fields present in the patch and returns the
/// full record as persisted, including the `updated_at` the backend
/// stamped; `load` always returns the full record. Backend failures
/// surface as the storage-unavailable variants of `StorageError` and are
/// never retried here.
#[async_trait]
pub trait SettingsStorage: Send + Sync {
    /// Stable identifier for logging and diagnostics
    fn tag(&self) -> &'static str;

    /// Load the full current settings record
    async fn load(&self) -> Result<UserSettings, StorageError>;

    /// Persist only the fields present in the patch and return the
    /// record as persisted
    async fn save(&self, patch: &SettingsPatch) -> Result<UserSettings, StorageError>;
}
