//! Persistence layer
//!
//! Local file storage for user preferences.

mod preferences_store;

pub use preferences_store::{JsonFilePreferencesStore, PREFERENCES_FILE};
