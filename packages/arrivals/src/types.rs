// ABOUTME: Type definitions for arrival tracking
// ABOUTME: Upcoming events from the platform API and recorded arrivals

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An event the user may arrive at, as reported by the platform API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpcomingEvent {
    pub id: String,
    pub name: String,
    pub starts_at: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

/// A recorded arrival of a user at an event venue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventArrival {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub arrived_at: DateTime<Utc>,
}

impl EventArrival {
    /// Build a new arrival record stamped with the current time
    pub fn new(event_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: huddle_core::generate_short_id(),
            event_id: event_id.into(),
            user_id: user_id.into(),
            arrived_at: Utc::now(),
        }
    }
}
