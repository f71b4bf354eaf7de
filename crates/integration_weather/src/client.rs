//! OpenWeatherMap HTTP client
//!
//! Thin typed wrapper over the forecast and geocoding endpoints. Every
//! request carries the `appid` key; non-2xx responses are turned into
//! [`WeatherError`] using the provider's `message` when the body has one.

use std::time::Duration;

use async_trait::async_trait;
use domain::GeoLocation;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::OpenWeatherConfig;
use crate::error::WeatherError;
use crate::models::{GeocodingResult, ProviderErrorBody, RawForecast, ZipResult};

/// Fallback text when an error response has no usable message
const GENERIC_PROVIDER_ERROR: &str = "Failed to fetch weather data";

/// Provider operations used by the resolver and the weather adapter
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Free-text place search (`/geo/1.0/direct`)
    async fn search_places(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<GeocodingResult>, WeatherError>;

    /// Postal code lookup for one country (`/geo/1.0/zip`)
    async fn lookup_postal_code(
        &self,
        code: &str,
        country_code: &str,
    ) -> Result<ZipResult, WeatherError>;

    /// Places near the given coordinates (`/geo/1.0/reverse`)
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<GeocodingResult>, WeatherError>;

    /// 5-day / 3-hour forecast in metric units (`/data/2.5/forecast`)
    async fn get_forecast(&self, latitude: f64, longitude: f64)
    -> Result<RawForecast, WeatherError>;
}

/// OpenWeatherMap client implementation
#[derive(Debug)]
pub struct OpenWeatherClient {
    client: Client,
    config: OpenWeatherConfig,
}

impl OpenWeatherClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: OpenWeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("weathervane/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub const fn config(&self) -> &OpenWeatherConfig {
        &self.config
    }

    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
        if GeoLocation::in_range(latitude, longitude) {
            Ok(())
        } else {
            Err(WeatherError::InvalidCoordinates)
        }
    }

    /// Build a `WeatherError` from an error status and its body
    fn provider_error(status: StatusCode, body: &str) -> WeatherError {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return WeatherError::RateLimitExceeded;
        }
        let message = serde_json::from_str::<ProviderErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("{GENERIC_PROVIDER_ERROR} (HTTP {})", status.as_u16()));
        WeatherError::Provider {
            status: status.as_u16(),
            message,
        }
    }

    fn map_send_error(&self, e: &reqwest::Error) -> WeatherError {
        if e.is_timeout() {
            WeatherError::Timeout(self.config.timeout_secs)
        } else if e.is_connect() {
            WeatherError::ConnectionFailed(e.to_string())
        } else {
            WeatherError::RequestFailed(e.to_string())
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}{path}", self.config.base_url.trim_end_matches('/'));
        debug!(url = %url, "Requesting provider");

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("appid", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        if !status.is_success() {
            let err = Self::provider_error(status, &body);
            warn!(status = status.as_u16(), error = %err, "Provider returned an error");
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| WeatherError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn search_places(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<GeocodingResult>, WeatherError> {
        let params = [("q", query.to_string()), ("limit", limit.to_string())];
        self.get_json("/geo/1.0/direct", &params).await
    }

    #[instrument(skip(self))]
    async fn lookup_postal_code(
        &self,
        code: &str,
        country_code: &str,
    ) -> Result<ZipResult, WeatherError> {
        let params = [("zip", format!("{code},{country_code}"))];
        self.get_json("/geo/1.0/zip", &params).await
    }

    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<GeocodingResult>, WeatherError> {
        Self::validate_coordinates(latitude, longitude)?;
        let params = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("limit", "1".to_string()),
        ];
        self.get_json("/geo/1.0/reverse", &params).await
    }

    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<RawForecast, WeatherError> {
        Self::validate_coordinates(latitude, longitude)?;
        let params = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("units", "metric".to_string()),
        ];
        let forecast: RawForecast = self.get_json("/data/2.5/forecast", &params).await?;
        debug!(samples = forecast.list.len(), "Fetched forecast");
        Ok(forecast)
    }
}
