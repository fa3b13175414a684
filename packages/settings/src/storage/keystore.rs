// ABOUTME: OS-keystore-backed settings storage
// ABOUTME: Serializes the settings record as JSON into a keychain entry

use async_trait::async_trait;
use chrono::Utc;
use huddle_storage::StorageError;
use tracing::debug;

use crate::storage::SettingsStorage;
use crate::types::{SettingsPatch, UserSettings};

/// Settings persisted in the platform keychain.
///
/// The whole record is stored as one JSON document under a service/account
/// pair, so a partial save is a read-merge-write. A missing entry loads as
/// the default record.
pub struct KeystoreSettingsStorage {
    service: String,
    entry: keyring::Entry,
}

impl KeystoreSettingsStorage {
    pub fn new(service: &str, account: &str) -> Result<Self, StorageError> {
        let entry = keyring::Entry::new(service, account)
            .map_err(|e| StorageError::Keystore(e.to_string()))?;
        Ok(Self {
            service: service.to_string(),
            entry,
        })
    }
}

#[async_trait]
impl SettingsStorage for KeystoreSettingsStorage {
    fn tag(&self) -> &'static str {
        "keystore"
    }

    async fn load(&self) -> Result<UserSettings, StorageError> {
        match self.entry.get_password() {
            Ok(json) => serde_json::from_str(&json).map_err(StorageError::Json),
            Err(keyring::Error::NoEntry) => {
                debug!("No keystore entry for {}, using defaults", self.service);
                Ok(UserSettings::default())
            }
            Err(e) => Err(StorageError::Keystore(e.to_string())),
        }
    }

    async fn save(&self, patch: &SettingsPatch) -> Result<UserSettings, StorageError> {
        let mut settings = self.load().await?;
        if patch.is_empty() {
            return Ok(settings);
        }

        settings.apply(patch);
        settings.updated_at = Utc::now();

        let json = serde_json::to_string(&settings).map_err(StorageError::Json)?;
        self.entry
            .set_password(&json)
            .map_err(|e| StorageError::Keystore(e.to_string()))?;

        debug!("Persisted settings record to keystore");
        Ok(settings)
    }
}
