// ABOUTME: In-memory settings storage
// ABOUTME: Backs throwaway sessions and tests, with an injectable failure

use async_trait::async_trait;
use chrono::Utc;
use huddle_storage::StorageError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::storage::SettingsStorage;
use crate::types::{SettingsPatch, UserSettings};

/// Settings held only in memory.
///
/// `set_unavailable` makes every subsequent load/save fail with
/// `StorageError::Unavailable`, which lets callers exercise the
/// storage-failure paths of the store.
pub struct MemorySettingsStorage {
    record: Mutex<UserSettings>,
    unavailable: Mutex<Option<String>>,
    save_count: AtomicUsize,
}

impl MemorySettingsStorage {
    pub fn new(initial: UserSettings) -> Self {
        Self {
            record: Mutex::new(initial),
            unavailable: Mutex::new(None),
            save_count: AtomicUsize::new(0),
        }
    }

    /// Fail every following load/save with the given reason
    pub fn set_unavailable(&self, reason: impl Into<String>) {
        *self.unavailable.lock().expect("settings lock poisoned") = Some(reason.into());
    }

    /// Clear a previously injected failure
    pub fn set_available(&self) {
        *self.unavailable.lock().expect("settings lock poisoned") = None;
    }

    /// Number of non-empty saves that reached this backend
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), StorageError> {
        match &*self.unavailable.lock().expect("settings lock poisoned") {
            Some(reason) => Err(StorageError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

impl Default for MemorySettingsStorage {
    fn default() -> Self {
        Self::new(UserSettings::default())
    }
}

#[async_trait]
impl SettingsStorage for MemorySettingsStorage {
    fn tag(&self) -> &'static str {
        "memory"
    }

    async fn load(&self) -> Result<UserSettings, StorageError> {
        self.check_available()?;
        Ok(self.record.lock().expect("settings lock poisoned").clone())
    }

    async fn save(&self, patch: &SettingsPatch) -> Result<UserSettings, StorageError> {
        self.check_available()?;

        let mut record = self.record.lock().expect("settings lock poisoned");
        if patch.is_empty() {
            return Ok(record.clone());
        }

        record.apply(patch);
        record.updated_at = Utc::now();
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(record.clone())
    }
}
