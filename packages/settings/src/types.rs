// ABOUTME: Type definitions for user settings
// ABOUTME: Full settings record, partial-update patch, and structural equality

use chrono::{DateTime, Utc};
use huddle_core::DEFAULT_ARRIVAL_RADIUS_METERS;
use serde::{Deserialize, Serialize};

/// Measurement units shown throughout the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "metric" => Some(Units::Metric),
            "imperial" => Some(Units::Imperial),
            _ => None,
        }
    }
}

/// Who can see an event a user creates by default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventVisibility {
    Public,
    #[default]
    Friends,
    InviteOnly,
}

impl EventVisibility {
    pub fn as_str(&self) -> &str {
        match self {
            EventVisibility::Public => "public",
            EventVisibility::Friends => "friends",
            EventVisibility::InviteOnly => "invite_only",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "public" => Some(EventVisibility::Public),
            "friends" => Some(EventVisibility::Friends),
            "invite_only" => Some(EventVisibility::InviteOnly),
            _ => None,
        }
    }
}

/// The full user settings record.
///
/// One record per user, created with defaults on first run and mutated in
/// place through `SettingsPatch` for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    // Appearance
    pub theme: String,
    pub units: Units,

    // Events
    pub default_event_visibility: EventVisibility,

    // Notifications
    pub push_notifications_enabled: bool,
    pub arrival_alerts_enabled: bool,
    pub arrival_radius_meters: i64,
    pub quiet_hours_start: i64,
    pub quiet_hours_end: i64,

    // Permission prompts
    pub last_location_prompt_at: Option<DateTime<Utc>>,

    // Metadata
    pub updated_at: DateTime<Utc>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            units: Units::Metric,
            default_event_visibility: EventVisibility::Friends,
            push_notifications_enabled: true,
            arrival_alerts_enabled: true,
            arrival_radius_meters: DEFAULT_ARRIVAL_RADIUS_METERS,
            quiet_hours_start: 22,
            quiet_hours_end: 7,
            last_location_prompt_at: None,
            updated_at: Utc::now(),
        }
    }
}

/// Partial settings update: only present fields are applied.
///
/// `last_location_prompt_at` is doubly optional so a patch can distinguish
/// "leave alone" (outer None) from "clear" (Some(None)).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_event_visibility: Option<EventVisibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_notifications_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_alerts_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_radius_meters: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet_hours_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet_hours_end: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_location_prompt_at: Option<Option<DateTime<Utc>>>,
}

impl SettingsPatch {
    /// True when the patch carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.theme.is_none()
            && self.units.is_none()
            && self.default_event_visibility.is_none()
            && self.push_notifications_enabled.is_none()
            && self.arrival_alerts_enabled.is_none()
            && self.arrival_radius_meters.is_none()
            && self.quiet_hours_start.is_none()
            && self.quiet_hours_end.is_none()
            && self.last_location_prompt_at.is_none()
    }
}

impl UserSettings {
    /// Apply a patch in place: shallow overwrite of the present fields only.
    /// `updated_at` is stamped by whoever commits the record, not here.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(theme) = &patch.theme {
            self.theme = theme.clone();
        }
        if let Some(units) = patch.units {
            self.units = units;
        }
        if let Some(visibility) = patch.default_event_visibility {
            self.default_event_visibility = visibility;
        }
        if let Some(enabled) = patch.push_notifications_enabled {
            self.push_notifications_enabled = enabled;
        }
        if let Some(enabled) = patch.arrival_alerts_enabled {
            self.arrival_alerts_enabled = enabled;
        }
        if let Some(radius) = patch.arrival_radius_meters {
            self.arrival_radius_meters = radius;
        }
        if let Some(hour) = patch.quiet_hours_start {
            self.quiet_hours_start = hour;
        }
        if let Some(hour) = patch.quiet_hours_end {
            self.quiet_hours_end = hour;
        }
        if let Some(prompt_at) = patch.last_location_prompt_at {
            self.last_location_prompt_at = prompt_at;
        }
    }

    /// Returns a copy of the record with the patch applied
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        let mut merged = self.clone();
        merged.apply(patch);
        merged
    }
}

/// Structural equality of two settings records.
///
/// Timestamp fields compare by their underlying instant (epoch
/// milliseconds), never by representation, so two distinct values denoting
/// the same moment are equal.
pub fn settings_equal(a: &UserSettings, b: &UserSettings) -> bool {
    fn instant_eq(a: &DateTime<Utc>, b: &DateTime<Utc>) -> bool {
        a.timestamp_millis() == b.timestamp_millis()
    }

    let prompt_eq = match (&a.last_location_prompt_at, &b.last_location_prompt_at) {
        (Some(a), Some(b)) => instant_eq(a, b),
        (None, None) => true,
        _ => false,
    };

    a.theme == b.theme
        && a.units == b.units
        && a.default_event_visibility == b.default_event_visibility
        && a.push_notifications_enabled == b.push_notifications_enabled
        && a.arrival_alerts_enabled == b.arrival_alerts_enabled
        && a.arrival_radius_meters == b.arrival_radius_meters
        && a.quiet_hours_start == b.quiet_hours_start
        && a.quiet_hours_end == b.quiet_hours_end
        && prompt_eq
        && instant_eq(&a.updated_at, &b.updated_at)
}
