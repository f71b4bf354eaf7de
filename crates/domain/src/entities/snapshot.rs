//! Weather snapshot entity
//!
//! A snapshot is the result of one successful fetch: the resolved location,
//! current conditions and up to five days of forecast. It is built in one
//! step and replaced wholesale on the next successful fetch.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{ConditionCategory, GeoLocation, Speed, Temperature, WeatherIcon};

/// Maximum number of forecast days a snapshot carries
pub const MAX_FORECAST_DAYS: usize = 5;

/// Top-level sections every snapshot document must contain
const REQUIRED_SECTIONS: [&str; 3] = ["location", "current", "forecast"];

/// Condition as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Condition {
    /// Provider description, e.g. "light rain"
    pub text: String,
    /// Provider icon id, e.g. "10d"
    pub icon: String,
    /// Provider condition code
    pub code: u16,
}

impl Condition {
    /// Icon identifier for this condition's code
    #[must_use]
    pub const fn weather_icon(&self) -> WeatherIcon {
        WeatherIcon::from_code(self.code)
    }

    /// Category for this condition's code
    #[must_use]
    pub const fn category(&self) -> ConditionCategory {
        ConditionCategory::from_code(self.code)
    }
}

/// Resolved place the snapshot belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotLocation {
    pub name: String,
    pub region: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Provider-local time of the first sample (`YYYY-MM-DD HH:MM`)
    pub localtime: String,
}

impl SnapshotLocation {
    /// Name with region and country appended when present
    #[must_use]
    pub fn display_name(&self) -> String {
        [&self.name, &self.region, &self.country]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Current conditions, taken from the nearest sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: Temperature,
    pub feels_like: Temperature,
    pub condition: Condition,
    pub wind: Speed,
    pub gust: Speed,
    /// 16-point compass direction
    pub wind_direction: String,
    /// Relative humidity (0-100)
    pub humidity: u8,
    pub pressure_mb: f64,
    pub visibility_km: f64,
    /// Cloud cover (0-100)
    pub cloud: u8,
    pub precip_mm: f64,
}

/// One 3-hour sample within a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourForecast {
    pub time: DateTime<Utc>,
    pub temperature: Temperature,
    pub condition: Condition,
    /// Rain probability (0-100)
    pub chance_of_rain: u8,
}

/// Aggregated forecast for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub max_temperature: Temperature,
    pub min_temperature: Temperature,
    pub avg_temperature: Temperature,
    /// Text and icon come from the sample nearest noon, the code is the
    /// day's most frequent code
    pub condition: Condition,
    pub chance_of_rain: u8,
    pub chance_of_snow: u8,
    pub hours: Vec<HourForecast>,
}

/// One fetched-and-transformed weather result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    location: SnapshotLocation,
    current: CurrentConditions,
    forecast: Vec<DayForecast>,
}

impl WeatherSnapshot {
    /// Assemble a snapshot from its three sections
    #[must_use]
    pub const fn new(
        location: SnapshotLocation,
        current: CurrentConditions,
        forecast: Vec<DayForecast>,
    ) -> Self {
        Self {
            location,
            current,
            forecast,
        }
    }

    #[must_use]
    pub const fn location(&self) -> &SnapshotLocation {
        &self.location
    }

    #[must_use]
    pub const fn current(&self) -> &CurrentConditions {
        &self.current
    }

    #[must_use]
    pub fn forecast(&self) -> &[DayForecast] {
        &self.forecast
    }

    /// First forecast day, if any
    #[must_use]
    pub fn today(&self) -> Option<&DayForecast> {
        self.forecast.first()
    }

    /// Check that all three sections are present and usable
    ///
    /// # Errors
    ///
    /// Returns `DomainError::IncompleteSnapshot` naming the first missing
    /// section, or `DomainError::ValidationError` if the forecast is longer
    /// than five days.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.location.name.trim().is_empty() {
            return Err(DomainError::incomplete("location name is empty"));
        }
        if !GeoLocation::in_range(self.location.latitude, self.location.longitude) {
            return Err(DomainError::incomplete("location coordinates are invalid"));
        }
        if !self.current.temperature.is_finite() {
            return Err(DomainError::incomplete("current temperature is missing"));
        }
        if self.forecast.is_empty() {
            return Err(DomainError::incomplete("forecast is empty"));
        }
        if self.forecast.len() > MAX_FORECAST_DAYS {
            return Err(DomainError::ValidationError(format!(
                "forecast has {} days, at most {MAX_FORECAST_DAYS} allowed",
                self.forecast.len()
            )));
        }
        if let Some(day) = self.forecast.iter().find(|day| day.hours.is_empty()) {
            return Err(DomainError::incomplete(format!(
                "forecast day {} has no samples",
                day.date
            )));
        }
        Ok(())
    }

    /// Parse an untrusted JSON document into a validated snapshot
    ///
    /// # Errors
    ///
    /// Returns an error if a top-level section is missing, the document
    /// does not match the snapshot shape, or validation fails.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, DomainError> {
        let Some(object) = value.as_object() else {
            return Err(DomainError::incomplete("document is not an object"));
        };
        if let Some(missing) = REQUIRED_SECTIONS
            .iter()
            .find(|section| !object.contains_key(**section))
        {
            return Err(DomainError::incomplete(format!("missing {missing} section")));
        }

        let snapshot: Self = serde_json::from_value(value)
            .map_err(|e| DomainError::Serialization(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// File name for a downloadable export on the given date
    ///
    /// Path separators in the location name are replaced so the result is
    /// always a single file name.
    #[must_use]
    pub fn export_file_name(&self, date: NaiveDate) -> String {
        let name: String = self
            .location
            .name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
            .collect();
        format!("weather-data-{name}-{}.json", date.format("%Y-%m-%d"))
    }

    /// Serialize the snapshot verbatim as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Serialization` if encoding fails.
    pub fn to_export_json(&self) -> Result<String, DomainError> {
        serde_json::to_string_pretty(self).map_err(|e| DomainError::Serialization(e.to_string()))
    }
}
