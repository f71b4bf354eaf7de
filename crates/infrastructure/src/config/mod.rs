//! Application configuration
//!
//! Split into focused sub-modules:
//! - `geolocation`: position source and retry tuning
//! - `local`: logging and the preferences directory
//!
//! Provider and controller settings reuse the structs of the crates that
//! consume them.

mod geolocation;
mod local;

use std::path::Path;

use application::ControllerConfig;
use integration_weather::OpenWeatherConfig;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use geolocation::{GeolocationAppConfig, GeolocationMode};
pub use local::{LoggingConfig, PreferencesConfig};

/// Base name of the optional configuration file (`weathervane.toml`)
pub const CONFIG_FILE: &str = "weathervane";

/// Prefix for environment overrides, e.g. `WEATHERVANE_PROVIDER__API_KEY`
pub const ENV_PREFIX: &str = "WEATHERVANE";

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// OpenWeatherMap settings
    #[serde(default)]
    pub provider: OpenWeatherConfig,

    /// Cache, retry and debounce tuning
    #[serde(default)]
    pub controller: ControllerConfig,

    #[serde(default)]
    pub geolocation: GeolocationAppConfig,

    #[serde(default)]
    pub preferences: PreferencesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Location shown when nothing else is requested
    #[serde(default)]
    pub default_location: Option<String>,
}

impl AppConfig {
    /// Load configuration from `weathervane.toml` (if present) and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file, falling back to `weathervane.toml`
    ///
    /// An explicit file must exist. Environment variables override both.
    pub fn load_from(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let file_source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(CONFIG_FILE).required(false),
        };

        let config = config::Config::builder()
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: Self = config.try_deserialize()?;
        app_config.warn_on_gaps();
        Ok(app_config)
    }

    /// Whether an API key has been configured
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.provider.api_key.trim().is_empty()
    }

    fn warn_on_gaps(&self) {
        if !self.has_api_key() {
            warn!("No provider API key configured; set WEATHERVANE_PROVIDER__API_KEY");
        }
        if self.geolocation.mode == GeolocationMode::Fixed
            && self.geolocation.fixed_location().is_none()
        {
            warn!("Fixed geolocation mode without valid latitude/longitude");
        }
    }
}
