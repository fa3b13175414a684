// ABOUTME: Event arrival tracking for Huddle
// ABOUTME: Upcoming-event refresh throttling and background-location gating

use thiserror::Error;

pub mod permissions;
pub mod refresher;
pub mod storage;
pub mod types;

pub use permissions::{GatedArrivalStore, LocationPermissions};
pub use refresher::{ArrivalRefresher, EventsApi};
pub use storage::{ArrivalStorage, SqliteArrivalStorage};
pub use types::{EventArrival, UpcomingEvent};

use huddle_storage::StorageError;

/// Arrival-tracking errors
#[derive(Error, Debug)]
pub enum ArrivalError {
    #[error("Background location permission not granted")]
    PermissionDenied,
    #[error("Events API error: {0}")]
    Api(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
