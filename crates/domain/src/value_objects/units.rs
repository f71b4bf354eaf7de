//! Unit conversion value objects
//!
//! Every converted pair is derived from a single metric reading at
//! construction time, so the two representations can never disagree.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::{Temperature, TemperatureUnit};
//!
//! let t = Temperature::from_celsius(100.0);
//! assert!((t.fahrenheit() - 212.0).abs() < f64::EPSILON);
//! assert_eq!(TemperatureUnit::Fahrenheit.format(&t), "212°F");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kilometres per hour in one metre per second
pub const KPH_PER_MPS: f64 = 3.6;

/// Miles per hour in one metre per second
pub const MPH_PER_MPS: f64 = 2.237;

/// Convert Celsius to Fahrenheit (`c * 9/5 + 32`)
#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// A temperature carried in both unit systems
///
/// Only the Celsius field is read back when deserializing; Fahrenheit is
/// always recomputed from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "CelsiusReading")]
pub struct Temperature {
    celsius: f64,
    fahrenheit: f64,
}

impl Temperature {
    /// Build from the authoritative Celsius reading
    #[must_use]
    pub fn from_celsius(celsius: f64) -> Self {
        Self {
            celsius,
            fahrenheit: celsius_to_fahrenheit(celsius),
        }
    }

    /// Temperature in degrees Celsius
    #[must_use]
    pub const fn celsius(&self) -> f64 {
        self.celsius
    }

    /// Temperature in degrees Fahrenheit
    #[must_use]
    pub const fn fahrenheit(&self) -> f64 {
        self.fahrenheit
    }

    /// Whether both representations are finite numbers
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.celsius.is_finite() && self.fahrenheit.is_finite()
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self::from_celsius(0.0)
    }
}

#[derive(Deserialize)]
struct CelsiusReading {
    celsius: f64,
}

impl From<CelsiusReading> for Temperature {
    fn from(reading: CelsiusReading) -> Self {
        Self::from_celsius(reading.celsius)
    }
}

/// A speed carried in km/h and mph
///
/// Deserialization reads km/h only and recomputes mph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "KphReading")]
pub struct Speed {
    kph: f64,
    mph: f64,
}

impl Speed {
    /// Build from a reading in metres per second (the provider's metric unit)
    #[must_use]
    pub fn from_meters_per_second(mps: f64) -> Self {
        Self::from_kph(mps * KPH_PER_MPS)
    }

    /// Build from a reading in km/h
    #[must_use]
    pub fn from_kph(kph: f64) -> Self {
        Self {
            kph,
            mph: kph / KPH_PER_MPS * MPH_PER_MPS,
        }
    }

    /// Speed in km/h
    #[must_use]
    pub const fn kph(&self) -> f64 {
        self.kph
    }

    /// Speed in mph
    #[must_use]
    pub const fn mph(&self) -> f64 {
        self.mph
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::from_meters_per_second(0.0)
    }
}

#[derive(Deserialize)]
struct KphReading {
    kph: f64,
}

impl From<KphReading> for Speed {
    fn from(reading: KphReading) -> Self {
        Self::from_kph(reading.kph)
    }
}

/// Display unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    /// Metric display (°C, km/h)
    #[default]
    Celsius,
    /// Imperial display (°F, mph)
    Fahrenheit,
}

impl TemperatureUnit {
    /// The other unit
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }

    /// Pick the value for this unit
    #[must_use]
    pub const fn temperature(self, temperature: &Temperature) -> f64 {
        match self {
            Self::Celsius => temperature.celsius(),
            Self::Fahrenheit => temperature.fahrenheit(),
        }
    }

    /// Pick the speed paired with this unit system
    #[must_use]
    pub const fn speed(self, speed: &Speed) -> f64 {
        match self {
            Self::Celsius => speed.kph(),
            Self::Fahrenheit => speed.mph(),
        }
    }

    /// Temperature symbol
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    /// Speed unit label
    #[must_use]
    pub const fn speed_label(self) -> &'static str {
        match self {
            Self::Celsius => "km/h",
            Self::Fahrenheit => "mph",
        }
    }

    /// Format a temperature rounded to whole degrees
    #[must_use]
    pub fn format(self, temperature: &Temperature) -> String {
        format!("{:.0}{}", self.temperature(temperature), self.symbol())
    }

    /// Parse a user-supplied unit name
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "celsius" | "c" | "metric" => Some(Self::Celsius),
            "fahrenheit" | "f" | "imperial" => Some(Self::Fahrenheit),
            _ => None,
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Celsius => write!(f, "celsius"),
            Self::Fahrenheit => write!(f, "fahrenheit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freezing_and_boiling_points() {
        assert!((Temperature::from_celsius(0.0).fahrenheit() - 32.0).abs() < f64::EPSILON);
        assert!((Temperature::from_celsius(100.0).fahrenheit() - 212.0).abs() < f64::EPSILON);
        assert!((Temperature::from_celsius(-40.0).fahrenheit() - -40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn speed_conversion() {
        let speed = Speed::from_meters_per_second(10.0);
        assert!((speed.kph() - 36.0).abs() < 1e-9);
        assert!((speed.mph() - 22.37).abs() < 1e-9);
    }

    #[test]
    fn unit_selects_matching_values() {
        let t = Temperature::from_celsius(20.0);
        assert!((TemperatureUnit::Celsius.temperature(&t) - 20.0).abs() < f64::EPSILON);
        assert!((TemperatureUnit::Fahrenheit.temperature(&t) - 68.0).abs() < f64::EPSILON);

        let s = Speed::from_meters_per_second(1.0);
        assert!((TemperatureUnit::Fahrenheit.speed(&s) - MPH_PER_MPS).abs() < f64::EPSILON);
        assert_eq!(TemperatureUnit::Celsius.speed_label(), "km/h");
    }

    #[test]
    fn toggle_round_trips() {
        assert_eq!(TemperatureUnit::Celsius.toggled(), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::Celsius.toggled().toggled(), TemperatureUnit::Celsius);
    }

    #[test]
    fn format_rounds_to_whole_degrees() {
        let t = Temperature::from_celsius(21.6);
        assert_eq!(TemperatureUnit::Celsius.format(&t), "22°C");
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!(TemperatureUnit::parse("F"), Some(TemperatureUnit::Fahrenheit));
        assert_eq!(TemperatureUnit::parse(" metric "), Some(TemperatureUnit::Celsius));
        assert_eq!(TemperatureUnit::parse("kelvin"), None);
    }

    #[test]
    fn deserialized_temperature_recomputes_fahrenheit() {
        let t: Temperature =
            serde_json::from_str(r#"{"celsius":10.0,"fahrenheit":999.0}"#).unwrap();
        assert!((t.celsius() - 10.0).abs() < f64::EPSILON);
        assert!((t.fahrenheit() - 50.0).abs() < f64::EPSILON);
        assert_eq!(t, Temperature::from_celsius(10.0));
    }

    #[test]
    fn deserialized_speed_recomputes_mph() {
        let s: Speed = serde_json::from_str(r#"{"kph":36.0,"mph":500.0}"#).unwrap();
        assert!((s.kph() - 36.0).abs() < f64::EPSILON);
        assert!((s.mph() - 22.37).abs() < 1e-9);
    }

    #[test]
    fn serialized_pairs_read_back_unchanged() {
        let t = Temperature::from_celsius(-3.7);
        let s = Speed::from_meters_per_second(4.1);
        let t_back: Temperature = serde_json::from_str(&serde_json::to_string(&t).unwrap()).unwrap();
        let s_back: Speed = serde_json::from_str(&serde_json::to_string(&s).unwrap()).unwrap();
        assert_eq!(t_back, t);
        assert_eq!(s_back, s);
    }

    #[test]
    fn reading_without_metric_field_is_rejected() {
        assert!(serde_json::from_str::<Temperature>(r#"{"fahrenheit":50.0}"#).is_err());
        assert!(serde_json::from_str::<Speed>(r#"{"mph":5.0}"#).is_err());
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&TemperatureUnit::Fahrenheit).unwrap();
        assert_eq!(json, "\"fahrenheit\"");
    }
}
