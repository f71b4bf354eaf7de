//! Provider wire models
//!
//! Raw shapes of the OpenWeatherMap forecast and geocoding responses. Fields
//! the provider may omit are `Option` or `#[serde(default)]` so a sparse
//! sample still parses; the transformer decides what a missing value means.

use domain::PlaceCandidate;
use serde::{Deserialize, Serialize};

/// 5-day / 3-hour forecast response
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawForecast {
    #[serde(default)]
    pub list: Vec<RawSample>,
    pub city: RawCity,
}

/// One 3-hour forecast sample
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawSample {
    /// Unix timestamp (UTC seconds)
    pub dt: i64,
    pub main: RawMain,
    #[serde(default)]
    pub weather: Vec<RawWeather>,
    #[serde(default)]
    pub clouds: Option<RawClouds>,
    #[serde(default)]
    pub wind: Option<RawWind>,
    /// Visibility in metres
    #[serde(default)]
    pub visibility: Option<f64>,
    /// Probability of precipitation (0.0 - 1.0)
    #[serde(default)]
    pub pop: Option<f64>,
    #[serde(default)]
    pub rain: Option<RawPrecipitation>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawMain {
    /// Temperature in Celsius (`units=metric`)
    pub temp: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_max: Option<f64>,
    /// Pressure in hPa
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawWeather {
    pub id: u16,
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawClouds {
    #[serde(default)]
    pub all: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawWind {
    /// Metres per second
    #[serde(default)]
    pub speed: f64,
    /// Meteorological degrees
    #[serde(default)]
    pub deg: f64,
    #[serde(default)]
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawPrecipitation {
    /// Volume for the last 3 hours, mm
    #[serde(rename = "3h", default)]
    pub three_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawCity {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub country: String,
    pub coord: RawCoord,
    /// Shift in seconds from UTC
    #[serde(default)]
    pub timezone: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RawCoord {
    pub lat: f64,
    pub lon: f64,
}

/// Entry of the direct and reverse geocoding responses
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeocodingResult {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl GeocodingResult {
    /// `name, state, country` or `name, country`
    #[must_use]
    pub fn formatted_name(&self) -> String {
        match self.state.as_deref().filter(|s| !s.is_empty()) {
            Some(state) => format!("{}, {state}, {}", self.name, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }
}

impl From<GeocodingResult> for PlaceCandidate {
    fn from(result: GeocodingResult) -> Self {
        Self {
            name: result.name,
            country: result.country,
            region: result.state.unwrap_or_default(),
            latitude: result.lat,
            longitude: result.lon,
        }
    }
}

/// Postal code lookup response
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ZipResult {
    #[serde(default)]
    pub zip: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub country: String,
}

impl From<ZipResult> for PlaceCandidate {
    fn from(result: ZipResult) -> Self {
        Self {
            name: result.name,
            country: result.country,
            region: String::new(),
            latitude: result.lat,
            longitude: result.lon,
        }
    }
}

/// Error body the provider sends with non-2xx responses
///
/// `cod` arrives as a number on some endpoints and a string on others.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    pub cod: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}
