// ABOUTME: Integration tests for the background-location permission gate
// ABOUTME: Denied permission blocks reads and writes; granted passes through

use huddle_arrivals::{
    ArrivalError, EventArrival, GatedArrivalStore, LocationPermissions, SqliteArrivalStorage,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct TogglePermissions {
    granted: AtomicBool,
}

impl TogglePermissions {
    fn new(granted: bool) -> Self {
        Self {
            granted: AtomicBool::new(granted),
        }
    }

    fn set(&self, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
    }
}

impl LocationPermissions for TogglePermissions {
    fn background_granted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }
}

async fn setup_gated(granted: bool) -> (GatedArrivalStore, Arc<TogglePermissions>) {
    let pool = huddle_storage::connect_memory().await.unwrap();
    let permissions = Arc::new(TogglePermissions::new(granted));
    let store = GatedArrivalStore::new(
        permissions.clone(),
        Arc::new(SqliteArrivalStorage::new(pool)),
    );
    (store, permissions)
}

#[tokio::test]
async fn test_denied_permission_blocks_writes() {
    let (store, _permissions) = setup_gated(false).await;

    let result = store.record_arrival(&EventArrival::new("evt-1", "alice")).await;
    assert!(matches!(result, Err(ArrivalError::PermissionDenied)));
}

#[tokio::test]
async fn test_denied_permission_blocks_reads() {
    let (store, permissions) = setup_gated(true).await;

    store
        .record_arrival(&EventArrival::new("evt-1", "alice"))
        .await
        .unwrap();

    permissions.set(false);
    let result = store.arrivals_for_event("evt-1").await;
    assert!(matches!(result, Err(ArrivalError::PermissionDenied)));
}

#[tokio::test]
async fn test_granted_permission_passes_through_to_storage() {
    let (store, _permissions) = setup_gated(true).await;

    store
        .record_arrival(&EventArrival::new("evt-1", "alice"))
        .await
        .unwrap();

    let arrivals = store.arrivals_for_event("evt-1").await.unwrap();
    assert_eq!(arrivals.len(), 1);
    assert_eq!(arrivals[0].user_id, "alice");

    store.clear_event("evt-1").await.unwrap();
    assert!(store.arrivals_for_event("evt-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_regranting_permission_restores_access() {
    let (store, permissions) = setup_gated(false).await;

    assert!(store.arrivals_for_event("evt-1").await.is_err());

    permissions.set(true);
    assert!(store.arrivals_for_event("evt-1").await.unwrap().is_empty());
}
