// ABOUTME: Input validation for settings patches
// ABOUTME: Semantic range and enum checks applied before persistence

use huddle_core::{ARRIVAL_RADIUS_MAX_METERS, ARRIVAL_RADIUS_MIN_METERS};
use huddle_storage::StorageError;
use thiserror::Error;

use crate::types::SettingsPatch;

const ALLOWED_THEMES: &[&str] = &["light", "dark", "system"];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid theme: {0}. Must be one of: light, dark, system")]
    InvalidTheme(String),

    #[error("Invalid arrival radius: {0}. Must be between 50 and 2000 meters")]
    InvalidArrivalRadius(i64),

    #[error("Invalid quiet hour: {0}. Must be between 0 and 23")]
    InvalidQuietHour(i64),
}

impl From<ValidationError> for StorageError {
    fn from(err: ValidationError) -> Self {
        StorageError::Validation(err.to_string())
    }
}

/// Validate a settings patch before it reaches any backend
pub fn validate_patch(patch: &SettingsPatch) -> Result<(), ValidationError> {
    if let Some(theme) = &patch.theme {
        if !ALLOWED_THEMES.contains(&theme.as_str()) {
            return Err(ValidationError::InvalidTheme(theme.clone()));
        }
    }

    if let Some(radius) = patch.arrival_radius_meters {
        if !(ARRIVAL_RADIUS_MIN_METERS..=ARRIVAL_RADIUS_MAX_METERS).contains(&radius) {
            return Err(ValidationError::InvalidArrivalRadius(radius));
        }
    }

    for hour in [patch.quiet_hours_start, patch.quiet_hours_end]
        .into_iter()
        .flatten()
    {
        if !(0..=23).contains(&hour) {
            return Err(ValidationError::InvalidQuietHour(hour));
        }
    }

    Ok(())
}
