// ABOUTME: User settings management for Huddle
// ABOUTME: Subscribable in-memory store over pluggable durable backends

pub mod storage;
pub mod store;
pub mod types;
pub mod validation;

// Re-export main types
pub use storage::{
    KeystoreSettingsStorage, MemorySettingsStorage, SettingsStorage, SqliteSettingsStorage,
};
pub use store::{SettingsStore, Subscription};
pub use types::{settings_equal, EventVisibility, SettingsPatch, Units, UserSettings};
pub use validation::{validate_patch, ValidationError};
