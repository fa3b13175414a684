// ABOUTME: Background-location permission gate over arrival storage
// ABOUTME: Every read and write first consults the platform permission seam

use std::sync::Arc;
use tracing::warn;

use crate::storage::ArrivalStorage;
use crate::types::EventArrival;
use crate::ArrivalError;

/// Platform location-permission seam, injected at construction so tests
/// can substitute it
pub trait LocationPermissions: Send + Sync {
    /// Whether background location access is currently granted
    fn background_granted(&self) -> bool;
}

/// Arrival storage gated on background location permission.
///
/// Arrival tracking is meaningless without background location, so both
/// reads and writes fail with `PermissionDenied` until it is granted.
pub struct GatedArrivalStore {
    permissions: Arc<dyn LocationPermissions>,
    storage: Arc<dyn ArrivalStorage>,
}

impl GatedArrivalStore {
    pub fn new(permissions: Arc<dyn LocationPermissions>, storage: Arc<dyn ArrivalStorage>) -> Self {
        Self {
            permissions,
            storage,
        }
    }

    fn check_permission(&self) -> Result<(), ArrivalError> {
        if self.permissions.background_granted() {
            Ok(())
        } else {
            warn!("Arrival tracking blocked: background location not granted");
            Err(ArrivalError::PermissionDenied)
        }
    }

    pub async fn record_arrival(&self, arrival: &EventArrival) -> Result<(), ArrivalError> {
        self.check_permission()?;
        self.storage.record_arrival(arrival).await?;
        Ok(())
    }

    pub async fn arrivals_for_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<EventArrival>, ArrivalError> {
        self.check_permission()?;
        Ok(self.storage.arrivals_for_event(event_id).await?)
    }

    pub async fn clear_event(&self, event_id: &str) -> Result<(), ArrivalError> {
        self.check_permission()?;
        self.storage.clear_event(event_id).await?;
        Ok(())
    }
}
