// ABOUTME: Integration tests for the settings store
// ABOUTME: Subscription fan-out, merge semantics, and failure propagation

use huddle_settings::{
    MemorySettingsStorage, SettingsPatch, SettingsStorage, SettingsStore, SqliteSettingsStorage,
    Subscription, Units, UserSettings,
};
use huddle_storage::StorageError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

async fn memory_store() -> (SettingsStore, Arc<MemorySettingsStorage>) {
    let storage = Arc::new(MemorySettingsStorage::default());
    let store = SettingsStore::load(storage.clone()).await.unwrap();
    (store, storage)
}

#[tokio::test]
async fn test_new_subscriber_receives_current_snapshot_immediately() {
    let (store, _storage) = memory_store().await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let _sub = store.subscribe(move |settings: &UserSettings| {
        seen_clone.lock().unwrap().push(settings.theme.clone());
    });

    // Delivered once, with the snapshot, before any update
    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_slice(), ["light"]);
}

#[tokio::test]
async fn test_update_publishes_exactly_once_with_merged_value() {
    let (store, _storage) = memory_store().await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();
    let _sub = store.subscribe(move |settings: &UserSettings| {
        seen_clone.lock().unwrap().push(settings.theme.clone());
    });

    let patch = SettingsPatch {
        theme: Some("dark".to_string()),
        ..Default::default()
    };
    store.update(patch).await.unwrap();

    assert_eq!(store.most_recently_published().theme, "dark");
    // One immediate delivery plus exactly one more for the update
    let seen = seen.lock().unwrap();
    assert_eq!(seen.as_slice(), ["light", "dark"]);
}

#[tokio::test]
async fn test_unsubscribed_callback_receives_nothing_further() {
    let (store, _storage) = memory_store().await;

    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));

    let first_clone = first.clone();
    let sub_a = store.subscribe(move |_: &UserSettings| {
        first_clone.fetch_add(1, Ordering::SeqCst);
    });
    let second_clone = second.clone();
    let _sub_b = store.subscribe(move |_: &UserSettings| {
        second_clone.fetch_add(1, Ordering::SeqCst);
    });

    sub_a.unsubscribe();
    assert_eq!(store.subscriber_count(), 1);

    let patch = SettingsPatch {
        theme: Some("dark".to_string()),
        ..Default::default()
    };
    store.update(patch).await.unwrap();

    // First saw only the immediate delivery; second saw that plus the update
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_update_sequence_equals_in_order_merge() {
    let (store, _storage) = memory_store().await;

    let patches = [
        SettingsPatch {
            theme: Some("dark".to_string()),
            ..Default::default()
        },
        SettingsPatch {
            units: Some(Units::Imperial),
            arrival_radius_meters: Some(400),
            ..Default::default()
        },
        SettingsPatch {
            theme: Some("system".to_string()),
            ..Default::default()
        },
    ];

    let mut expected = store.most_recently_published();
    for patch in patches {
        expected.apply(&patch);
        store.update(patch).await.unwrap();
    }

    let published = store.most_recently_published();
    assert_eq!(published.theme, expected.theme);
    assert_eq!(published.units, expected.units);
    assert_eq!(
        published.arrival_radius_meters,
        expected.arrival_radius_meters
    );
    assert_eq!(published.theme, "system");
}

#[tokio::test]
async fn test_storage_failure_propagates_and_commits_nothing() {
    let (store, storage) = memory_store().await;

    let deliveries = Arc::new(AtomicUsize::new(0));
    let deliveries_clone = deliveries.clone();
    let _sub = store.subscribe(move |_: &UserSettings| {
        deliveries_clone.fetch_add(1, Ordering::SeqCst);
    });

    storage.set_unavailable("backend offline");

    let patch = SettingsPatch {
        theme: Some("dark".to_string()),
        ..Default::default()
    };
    let result = store.update(patch).await;

    assert!(matches!(result, Err(StorageError::Unavailable(_))));
    // Snapshot untouched, no extra publish
    assert_eq!(store.most_recently_published().theme, "light");
    assert_eq!(deliveries.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_noop_update_neither_saves_nor_publishes() {
    let (store, storage) = memory_store().await;

    let deliveries = Arc::new(AtomicUsize::new(0));
    let deliveries_clone = deliveries.clone();
    let _sub = store.subscribe(move |_: &UserSettings| {
        deliveries_clone.fetch_add(1, Ordering::SeqCst);
    });

    // Values already current
    let patch = SettingsPatch {
        theme: Some("light".to_string()),
        arrival_alerts_enabled: Some(true),
        ..Default::default()
    };
    store.update(patch).await.unwrap();

    assert_eq!(storage.save_count(), 0);
    assert_eq!(deliveries.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_patch_rejected_before_persistence() {
    let (store, storage) = memory_store().await;

    let patch = SettingsPatch {
        arrival_radius_meters: Some(-5),
        ..Default::default()
    };
    let result = store.update(patch).await;

    assert!(matches!(result, Err(StorageError::Validation(_))));
    assert_eq!(storage.save_count(), 0);
}

#[tokio::test]
async fn test_subscribers_notified_in_subscription_order() {
    let (store, _storage) = memory_store().await;

    let order = Arc::new(Mutex::new(Vec::new()));
    let mut subs = Vec::new();
    for label in ["a", "b", "c"] {
        let order_clone = order.clone();
        subs.push(store.subscribe(move |_: &UserSettings| {
            order_clone.lock().unwrap().push(label);
        }));
    }
    order.lock().unwrap().clear();

    let patch = SettingsPatch {
        theme: Some("dark".to_string()),
        ..Default::default()
    };
    store.update(patch).await.unwrap();

    assert_eq!(order.lock().unwrap().as_slice(), ["a", "b", "c"]);
}

#[tokio::test]
async fn test_subscriber_may_subscribe_from_within_callback() {
    let storage = Arc::new(MemorySettingsStorage::default());
    let store = Arc::new(SettingsStore::load(storage).await.unwrap());

    let inner_deliveries = Arc::new(AtomicUsize::new(0));
    let registered = Arc::new(AtomicBool::new(false));

    let store_clone = store.clone();
    let inner_clone = inner_deliveries.clone();
    let registered_clone = registered.clone();
    let _sub = store.subscribe(move |_: &UserSettings| {
        // Registering another subscriber mid-delivery must not deadlock
        if !registered_clone.swap(true, Ordering::SeqCst) {
            let counter = inner_clone.clone();
            store_clone.subscribe(move |_: &UserSettings| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
    });

    assert_eq!(store.subscriber_count(), 2);
    // The nested subscriber got its immediate delivery
    assert_eq!(inner_deliveries.load(Ordering::SeqCst), 1);

    let patch = SettingsPatch {
        theme: Some("dark".to_string()),
        ..Default::default()
    };
    store.update(patch).await.unwrap();

    assert_eq!(inner_deliveries.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_subscriber_may_unsubscribe_another_from_within_callback() {
    let storage = Arc::new(MemorySettingsStorage::default());
    let store = SettingsStore::load(storage).await.unwrap();

    let second_deliveries = Arc::new(AtomicUsize::new(0));
    let second_slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));

    let slot_clone = second_slot.clone();
    let _sub_a = store.subscribe(move |_: &UserSettings| {
        // Removing another subscriber mid-delivery must not deadlock
        if let Some(sub) = slot_clone.lock().unwrap().take() {
            sub.unsubscribe();
        }
    });

    let second_clone = second_deliveries.clone();
    let sub_b = store.subscribe(move |_: &UserSettings| {
        second_clone.fetch_add(1, Ordering::SeqCst);
    });
    *second_slot.lock().unwrap() = Some(sub_b);

    let patch = SettingsPatch {
        theme: Some("dark".to_string()),
        ..Default::default()
    };
    store.update(patch).await.unwrap();

    // The second subscriber was still in this round's delivery list, but
    // is gone afterwards
    assert_eq!(second_deliveries.load(Ordering::SeqCst), 2);
    assert_eq!(store.subscriber_count(), 1);

    let patch = SettingsPatch {
        theme: Some("system".to_string()),
        ..Default::default()
    };
    store.update(patch).await.unwrap();
    assert_eq!(second_deliveries.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_published_snapshot_carries_backend_timestamp() {
    let pool = huddle_storage::connect_memory().await.unwrap();
    let storage = Arc::new(SqliteSettingsStorage::new(pool));
    let store = SettingsStore::load(storage.clone()).await.unwrap();

    let patch = SettingsPatch {
        theme: Some("dark".to_string()),
        ..Default::default()
    };
    store.update(patch).await.unwrap();

    // The published snapshot is the record as the backend persisted it
    let reloaded = storage.load().await.unwrap();
    let published = store.most_recently_published();
    assert_eq!(
        published.updated_at.timestamp_millis(),
        reloaded.updated_at.timestamp_millis()
    );
    assert_eq!(published.theme, reloaded.theme);
}

#[tokio::test]
async fn test_store_over_sqlite_backend() {
    let pool = huddle_storage::connect_memory().await.unwrap();
    let storage = Arc::new(SqliteSettingsStorage::new(pool));
    let store = SettingsStore::load(storage.clone()).await.unwrap();

    let patch = SettingsPatch {
        theme: Some("dark".to_string()),
        quiet_hours_start: Some(21),
        ..Default::default()
    };
    store.update(patch).await.unwrap();

    // The committed update is durable: a fresh load sees it
    let reloaded = storage.load().await.unwrap();
    assert_eq!(reloaded.theme, "dark");
    assert_eq!(reloaded.quiet_hours_start, 21);
    assert_eq!(store.most_recently_published().theme, "dark");
}
