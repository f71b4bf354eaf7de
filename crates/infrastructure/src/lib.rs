//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of OpenWeatherMap, IP-based
//! geolocation and a JSON preferences file, and loads the layered
//! configuration the composition root is built from.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, GeolocationAppConfig, GeolocationMode, LoggingConfig, PreferencesConfig,
};
pub use persistence::{JsonFilePreferencesStore, PREFERENCES_FILE};
pub use telemetry::{TelemetryError, init_logging};
