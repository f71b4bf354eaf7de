//! User preferences entity
//!
//! Preferences are persisted as a versioned JSON document. Older or foreign
//! shapes are coerced into the current shape by [`UserPreferences::migrate`],
//! which never fails: anything it cannot make sense of yields the defaults
//! plus an error flag for the UI.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::value_objects::TemperatureUnit;

/// Current preferences document version
pub const PREFERENCES_VERSION: u32 = 2;

/// Maximum number of favorite locations kept
pub const MAX_FAVORITES: usize = 3;

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    System,
}

impl Theme {
    /// Switch between light and dark; `System` resolves to light
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark | Self::System => Self::Light,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
            Self::System => write!(f, "system"),
        }
    }
}

/// User-adjustable display preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub version: u32,
    pub theme: Theme,
    pub temperature_unit: TemperatureUnit,
    favorite_locations: Vec<String>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION,
            theme: Theme::default(),
            temperature_unit: TemperatureUnit::default(),
            favorite_locations: Vec::new(),
        }
    }
}

/// Result of coercing a stored document into the current shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationOutcome {
    pub preferences: UserPreferences,
    /// Version found in the stored document (0 for unversioned)
    pub source_version: u32,
    /// Set when the document was unusable and defaults were substituted
    pub error: Option<String>,
}

impl MigrationOutcome {
    /// Whether defaults replaced an unusable document
    #[must_use]
    pub const fn recovered_from_error(&self) -> bool {
        self.error.is_some()
    }

    fn fallback(source_version: u32, reason: impl Into<String>) -> Self {
        Self {
            preferences: UserPreferences::default(),
            source_version,
            error: Some(reason.into()),
        }
    }
}

impl UserPreferences {
    /// Favorite locations, most recent first
    #[must_use]
    pub fn favorite_locations(&self) -> &[String] {
        &self.favorite_locations
    }

    #[must_use]
    pub fn is_favorite(&self, location: &str) -> bool {
        self.favorite_locations.iter().any(|f| f == location)
    }

    /// Add a favorite at the front
    ///
    /// An existing entry moves to the front; the oldest entry is dropped
    /// once more than [`MAX_FAVORITES`] are stored. Blank names are ignored.
    pub fn add_favorite(&mut self, location: &str) {
        let location = location.trim();
        if location.is_empty() {
            return;
        }
        self.favorite_locations.retain(|f| f != location);
        self.favorite_locations.insert(0, location.to_string());
        self.favorite_locations.truncate(MAX_FAVORITES);
    }

    /// Remove a favorite; returns whether it was present
    pub fn remove_favorite(&mut self, location: &str) -> bool {
        let before = self.favorite_locations.len();
        self.favorite_locations.retain(|f| f != location);
        before != self.favorite_locations.len()
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn toggle_temperature_unit(&mut self) {
        self.temperature_unit = self.temperature_unit.toggled();
    }

    /// Coerce a stored document into the current shape
    ///
    /// Accepted inputs are the current versioned document and the legacy
    /// unversioned document (`tempUnit` or `temperatureUnit`,
    /// `favoriteLocations`, `theme`). Missing fields take their defaults.
    /// Wrong field types or an unknown future version produce the defaults
    /// with `error` set.
    #[must_use]
    pub fn migrate(value: &Value) -> MigrationOutcome {
        let Some(object) = value.as_object() else {
            return MigrationOutcome::fallback(0, "preferences document is not an object");
        };

        let source_version = match object.get("version") {
            None | Some(Value::Null) => 0,
            Some(Value::Number(n)) => match n.as_u64().and_then(|v| u32::try_from(v).ok()) {
                Some(v) => v,
                None => return MigrationOutcome::fallback(0, format!("invalid version {n}")),
            },
            Some(other) => {
                return MigrationOutcome::fallback(0, format!("invalid version {other}"));
            },
        };

        if source_version > PREFERENCES_VERSION {
            return MigrationOutcome::fallback(
                source_version,
                format!("unsupported preferences version {source_version}"),
            );
        }

        match Self::coerce(object) {
            Ok(preferences) => MigrationOutcome {
                preferences,
                source_version,
                error: None,
            },
            Err(reason) => MigrationOutcome::fallback(source_version, reason),
        }
    }

    fn coerce(object: &Map<String, Value>) -> Result<Self, String> {
        let mut preferences = Self::default();

        match object.get("theme") {
            None | Some(Value::Null) => {},
            Some(Value::String(s)) => {
                preferences.theme =
                    Theme::parse(s).ok_or_else(|| format!("unknown theme {s:?}"))?;
            },
            Some(other) => return Err(format!("theme must be a string, got {other}")),
        }

        // Legacy documents used `tempUnit`
        let unit = object
            .get("temperatureUnit")
            .or_else(|| object.get("tempUnit"));
        match unit {
            None | Some(Value::Null) => {},
            Some(Value::String(s)) => {
                preferences.temperature_unit = match s.as_str() {
                    "celsius" => TemperatureUnit::Celsius,
                    "fahrenheit" => TemperatureUnit::Fahrenheit,
                    _ => return Err(format!("unknown temperature unit {s:?}")),
                };
            },
            Some(other) => return Err(format!("temperature unit must be a string, got {other}")),
        }

        match object.get("favoriteLocations") {
            None | Some(Value::Null) => {},
            Some(Value::Array(items)) => {
                // Stored order is most recent first; insert oldest first
                for item in items.iter().rev() {
                    let Value::String(name) = item else {
                        return Err(format!("favorite location must be a string, got {item}"));
                    };
                    preferences.add_favorite(name);
                }
            },
            Some(other) => return Err(format!("favoriteLocations must be an array, got {other}")),
        }

        Ok(preferences)
    }
}
