// ABOUTME: Upcoming-event cache with a time-gated refresh throttle
// ABOUTME: Refresh-if-needed skips the API inside the configured window

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::types::UpcomingEvent;
use crate::ArrivalError;

/// The platform events API, injected at construction
#[async_trait]
pub trait EventsApi: Send + Sync {
    /// Fetch the events the user may arrive at soon
    async fn upcoming_events(&self) -> Result<Vec<UpcomingEvent>, ArrivalError>;
}

struct RefreshState {
    events: Vec<UpcomingEvent>,
    last_refresh: Option<Instant>,
}

/// Caches the upcoming-event list behind a minimum refresh interval.
///
/// `refresh_if_needed` only hits the API when the last successful refresh
/// is older than the interval; `force_refresh` always does. A failed fetch
/// propagates and leaves both the cache and the last-refresh time
/// unchanged, so the next call retries.
pub struct ArrivalRefresher {
    api: Arc<dyn EventsApi>,
    min_interval: Duration,
    state: Mutex<RefreshState>,
}

impl ArrivalRefresher {
    pub fn new(api: Arc<dyn EventsApi>, min_interval: Duration) -> Self {
        Self {
            api,
            min_interval,
            state: Mutex::new(RefreshState {
                events: Vec::new(),
                last_refresh: None,
            }),
        }
    }

    /// Construct with the default refresh interval
    pub fn with_default_interval(api: Arc<dyn EventsApi>) -> Self {
        Self::new(
            api,
            Duration::from_secs(huddle_core::DEFAULT_REFRESH_INTERVAL_SECS),
        )
    }

    /// The cached list, without touching the API
    pub fn cached(&self) -> Vec<UpcomingEvent> {
        self.state
            .lock()
            .expect("refresher lock poisoned")
            .events
            .clone()
    }

    /// Refresh only when the throttle window has elapsed
    pub async fn refresh_if_needed(&self) -> Result<Vec<UpcomingEvent>, ArrivalError> {
        {
            let state = self.state.lock().expect("refresher lock poisoned");
            if let Some(last) = state.last_refresh {
                if last.elapsed() < self.min_interval {
                    debug!("Skipping event refresh, within throttle window");
                    return Ok(state.events.clone());
                }
            }
        }
        self.force_refresh().await
    }

    /// Refresh unconditionally
    pub async fn force_refresh(&self) -> Result<Vec<UpcomingEvent>, ArrivalError> {
        let events = self.api.upcoming_events().await?;
        debug!("Refreshed {} upcoming event(s)", events.len());

        let mut state = self.state.lock().expect("refresher lock poisoned");
        state.events = events.clone();
        state.last_refresh = Some(Instant::now());
        Ok(events)
    }
}
