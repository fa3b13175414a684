// ABOUTME: Shared constants and path resolution for Huddle
// ABOUTME: App data directory, database location, arrival-tracking bounds

use std::env;
use std::path::PathBuf;

/// Minimum seconds between automatic upcoming-event refreshes
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60;

/// Default arrival-detection radius around an event venue
pub const DEFAULT_ARRIVAL_RADIUS_METERS: i64 = 150;

/// Smallest radius a user may configure for arrival alerts
pub const ARRIVAL_RADIUS_MIN_METERS: i64 = 50;

/// Largest radius a user may configure for arrival alerts
pub const ARRIVAL_RADIUS_MAX_METERS: i64 = 2_000;

/// Get the path to the Huddle directory (~/.huddle)
pub fn huddle_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".huddle")
    } else {
        // Fall back to dirs crate for normal usage
        dirs::home_dir()
            .expect("Unable to get home directory")
            .join(".huddle")
    }
}

/// Get the path to the local database file (~/.huddle/huddle.db)
pub fn huddle_db_file() -> PathBuf {
    huddle_dir().join("huddle.db")
}
