// ABOUTME: Subscribable in-memory settings store
// ABOUTME: Holds the authoritative snapshot and fans out committed updates

use huddle_storage::StorageError;
use std::sync::{Arc, Mutex, Weak};
use tracing::debug;

use crate::storage::SettingsStorage;
use crate::types::{settings_equal, SettingsPatch, UserSettings};
use crate::validation::validate_patch;

type SubscriberFn = Arc<dyn Fn(&UserSettings) + Send + Sync>;

struct Inner {
    snapshot: UserSettings,
    subscribers: Vec<(u64, SubscriberFn)>,
    next_id: u64,
}

/// Handle returned by `SettingsStore::subscribe`.
///
/// Cancellation is explicit: call `unsubscribe`. Dropping the handle
/// without calling it leaves the callback registered.
pub struct Subscription {
    id: u64,
    inner: Weak<Mutex<Inner>>,
}

impl Subscription {
    /// Remove the callback; it receives no further invocations
    pub fn unsubscribe(self) {
        if let Some(inner) = self.inner.upgrade() {
            let mut inner = inner.lock().expect("settings store lock poisoned");
            inner.subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

/// The authoritative in-memory settings snapshot plus observer fan-out.
///
/// Updates are written through: the record as persisted by the backend is
/// committed in memory and published to subscribers only after the save
/// succeeds. A failed save leaves the snapshot and subscribers untouched.
pub struct SettingsStore {
    storage: Arc<dyn SettingsStorage>,
    inner: Arc<Mutex<Inner>>,
}

impl SettingsStore {
    /// Construct the store by loading the full record from the backend
    pub async fn load(storage: Arc<dyn SettingsStorage>) -> Result<Self, StorageError> {
        let snapshot = storage.load().await?;
        debug!("Loaded settings from {} backend", storage.tag());
        Ok(Self::with_settings(storage, snapshot))
    }

    /// Construct the store around an already-loaded record
    pub fn with_settings(storage: Arc<dyn SettingsStorage>, snapshot: UserSettings) -> Self {
        Self {
            storage,
            inner: Arc::new(Mutex::new(Inner {
                snapshot,
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// The last published settings snapshot; present from construction on
    pub fn most_recently_published(&self) -> UserSettings {
        self.inner
            .lock()
            .expect("settings store lock poisoned")
            .snapshot
            .clone()
    }

    /// Register a callback, invoking it immediately with the current
    /// snapshot and again on every subsequent committed update, in
    /// subscription order.
    pub fn subscribe(
        &self,
        callback: impl Fn(&UserSettings) + Send + Sync + 'static,
    ) -> Subscription {
        let callback: SubscriberFn = Arc::new(callback);

        let (id, snapshot) = {
            let mut inner = self.inner.lock().expect("settings store lock poisoned");
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, callback.clone()));
            (id, inner.snapshot.clone())
        };

        // Immediate delivery happens outside the lock, so a callback may
        // subscribe or unsubscribe without deadlocking
        callback(&snapshot);

        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Merge the patch into the snapshot, persist it, and publish.
    ///
    /// Validation failures and backend failures propagate to the caller;
    /// in both cases nothing is committed or published. A patch whose
    /// values are already current is skipped entirely. The committed
    /// snapshot is the record as the backend persisted it, so
    /// `most_recently_published()` and a fresh `load` agree, `updated_at`
    /// included.
    ///
    /// Overlapping `update` calls commit in storage-completion order;
    /// callers that need strict ordering await each call before issuing
    /// the next.
    pub async fn update(&self, patch: SettingsPatch) -> Result<(), StorageError> {
        validate_patch(&patch)?;

        {
            let inner = self.inner.lock().expect("settings store lock poisoned");
            if settings_equal(&inner.snapshot.merged(&patch), &inner.snapshot) {
                debug!("Settings update is a no-op, skipping save and publish");
                return Ok(());
            }
        }

        // Write through: commit in memory only once the backend accepted it
        let persisted = self.storage.save(&patch).await?;

        let (snapshot, subscribers) = {
            let mut inner = self.inner.lock().expect("settings store lock poisoned");
            inner.snapshot = persisted.clone();
            (persisted, inner.subscribers.clone())
        };

        debug!(
            "Settings updated via {} backend, notifying {} subscriber(s)",
            self.storage.tag(),
            subscribers.len()
        );

        for (_, callback) in subscribers {
            callback(&snapshot);
        }

        Ok(())
    }

    /// Number of active subscribers, for diagnostics
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .lock()
            .expect("settings store lock poisoned")
            .subscribers
            .len()
    }
}
