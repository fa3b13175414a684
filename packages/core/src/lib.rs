// ABOUTME: Core constants and utilities for Huddle
// ABOUTME: Foundational package providing shared functionality across all Huddle packages

pub mod constants;
pub mod utils;

// Re-export constants
pub use constants::{
    huddle_db_file, huddle_dir, ARRIVAL_RADIUS_MAX_METERS, ARRIVAL_RADIUS_MIN_METERS,
    DEFAULT_ARRIVAL_RADIUS_METERS, DEFAULT_REFRESH_INTERVAL_SECS,
};

// Re-export utilities
pub use utils::generate_short_id;
