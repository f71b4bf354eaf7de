//! Geolocation adapters - Implement GeolocationPort
//!
//! `IpGeolocationAdapter` asks an HTTP service for the approximate position
//! of the caller's public address. `FixedGeolocation` reports configured
//! coordinates, or denies access when location is switched off.

use std::sync::Arc;
use std::time::{Duration, Instant};

use application::error::ApplicationError;
use application::ports::{GeolocationError, GeolocationPort, PositionOptions};
use async_trait::async_trait;
use domain::GeoLocation;
use parking_lot::Mutex;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::config::{GeolocationAppConfig, GeolocationMode};

/// Body returned by the lookup endpoint
#[derive(Debug, Deserialize)]
struct IpPosition {
    latitude: f64,
    longitude: f64,
}

/// Position of the public IP address, looked up over HTTP
pub struct IpGeolocationAdapter {
    client: Client,
    endpoint: String,
    last_fix: Mutex<Option<(Instant, GeoLocation)>>,
}

impl std::fmt::Debug for IpGeolocationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpGeolocationAdapter")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl IpGeolocationAdapter {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, ApplicationError> {
        let client = Client::builder()
            .user_agent(concat!("weathervane/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApplicationError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            last_fix: Mutex::new(None),
        })
    }

    fn cached(&self, maximum_age: Duration) -> Option<GeoLocation> {
        if maximum_age.is_zero() {
            return None;
        }
        let last_fix = *self.last_fix.lock();
        last_fix
            .filter(|(at, _)| at.elapsed() <= maximum_age)
            .map(|(_, location)| location)
    }

    fn map_send_error(err: &reqwest::Error) -> GeolocationError {
        if err.is_timeout() {
            GeolocationError::Timeout
        } else {
            GeolocationError::PositionUnavailable(err.to_string())
        }
    }
}

#[async_trait]
impl GeolocationPort for IpGeolocationAdapter {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<GeoLocation, GeolocationError> {
        if let Some(location) = self.cached(options.maximum_age) {
            debug!(%location, "Using recent position");
            return Ok(location);
        }

        let response = self
            .client
            .get(&self.endpoint)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| Self::map_send_error(&e))?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            warn!("Position lookup refused");
            return Err(GeolocationError::PermissionDenied);
        }
        if !status.is_success() {
            return Err(GeolocationError::PositionUnavailable(format!(
                "lookup failed with HTTP {}",
                status.as_u16()
            )));
        }

        let body: IpPosition = response
            .json()
            .await
            .map_err(|e| Self::map_send_error(&e))?;
        let location = GeoLocation::new(body.latitude, body.longitude)
            .map_err(|e| GeolocationError::PositionUnavailable(e.to_string()))?;

        *self.last_fix.lock() = Some((Instant::now(), location));
        debug!(%location, "Position acquired");
        Ok(location)
    }
}

/// Reports configured coordinates
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocation {
    location: Option<GeoLocation>,
}

impl FixedGeolocation {
    #[must_use]
    pub const fn new(location: GeoLocation) -> Self {
        Self {
            location: Some(location),
        }
    }

    /// Location access switched off
    #[must_use]
    pub const fn disabled() -> Self {
        Self { location: None }
    }
}

#[async_trait]
impl GeolocationPort for FixedGeolocation {
    async fn current_position(
        &self,
        _options: PositionOptions,
    ) -> Result<GeoLocation, GeolocationError> {
        self.location.ok_or(GeolocationError::PermissionDenied)
    }
}

/// Build the geolocation source selected in configuration
///
/// # Errors
///
/// Returns `ApplicationError::Configuration` when fixed mode lacks valid
/// coordinates, or an internal error if the HTTP client cannot be built.
pub fn geolocation_from_config(
    config: &GeolocationAppConfig,
) -> Result<Arc<dyn GeolocationPort>, ApplicationError> {
    match config.mode {
        GeolocationMode::Ip => Ok(Arc::new(IpGeolocationAdapter::new(&config.endpoint)?)),
        GeolocationMode::Fixed => config
            .fixed_location()
            .map(|location| Arc::new(FixedGeolocation::new(location)) as Arc<dyn GeolocationPort>)
            .ok_or_else(|| {
                ApplicationError::Configuration(
                    "geolocation.latitude and geolocation.longitude must be valid in fixed mode"
                        .to_string(),
                )
            }),
        GeolocationMode::Disabled => Ok(Arc::new(FixedGeolocation::disabled())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> GeoLocation {
        GeoLocation::new(48.8566, 2.3522).unwrap()
    }

    #[tokio::test]
    async fn fixed_reports_configured_position() {
        let source = FixedGeolocation::new(paris());
        let location = source
            .current_position(PositionOptions::default())
            .await
            .unwrap();
        assert_eq!(location, paris());
    }

    #[tokio::test]
    async fn disabled_denies_permission() {
        let err = FixedGeolocation::disabled()
            .current_position(PositionOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err, GeolocationError::PermissionDenied);
    }

    #[test]
    fn fixed_mode_requires_coordinates() {
        let config = GeolocationAppConfig {
            mode: GeolocationMode::Fixed,
            ..GeolocationAppConfig::default()
        };
        assert!(matches!(
            geolocation_from_config(&config),
            Err(ApplicationError::Configuration(_))
        ));
    }

    #[test]
    fn every_mode_builds() {
        for mode in [GeolocationMode::Ip, GeolocationMode::Disabled] {
            let config = GeolocationAppConfig {
                mode,
                ..GeolocationAppConfig::default()
            };
            assert!(geolocation_from_config(&config).is_ok());
        }
    }

    #[test]
    fn zero_maximum_age_never_uses_cache() {
        let adapter = IpGeolocationAdapter::new("http://localhost:1").unwrap();
        *adapter.last_fix.lock() = Some((Instant::now(), paris()));
        assert!(adapter.cached(Duration::ZERO).is_none());
        assert_eq!(adapter.cached(Duration::from_secs(60)), Some(paris()));
    }
}
