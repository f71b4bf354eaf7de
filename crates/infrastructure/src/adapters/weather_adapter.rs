//! Weather adapter - Implements WeatherFetchPort using integration_weather

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::WeatherFetchPort;
use async_trait::async_trait;
use domain::{GeoLocation, PlaceCandidate, WeatherSnapshot};
use integration_weather::{
    LocationInfo, LocationResolver, OpenWeatherClient, OpenWeatherConfig, WeatherClient,
    WeatherError, transform,
};
use tracing::{debug, instrument};

/// Adapter for the OpenWeatherMap forecast and geocoding APIs
pub struct OpenWeatherAdapter {
    client: Arc<dyn WeatherClient>,
    resolver: LocationResolver,
}

impl std::fmt::Debug for OpenWeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherAdapter")
            .field("client", &"OpenWeatherClient")
            .field("resolver", &self.resolver)
            .finish()
    }
}

impl OpenWeatherAdapter {
    /// Create an adapter talking to the configured provider
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &OpenWeatherConfig) -> Result<Self, ApplicationError> {
        let client = OpenWeatherClient::new(config.clone()).map_err(Self::map_error)?;
        Ok(Self::with_client(Arc::new(client), config))
    }

    /// Create an adapter around any weather client
    #[must_use]
    pub fn with_client(client: Arc<dyn WeatherClient>, config: &OpenWeatherConfig) -> Self {
        let resolver = LocationResolver::new(Arc::clone(&client), config);
        Self { client, resolver }
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::ConnectionFailed(e) | WeatherError::RequestFailed(e) => {
                ApplicationError::ExternalService(e)
            },
            WeatherError::Provider { message, .. } => ApplicationError::ExternalService(message),
            WeatherError::Timeout(_) => ApplicationError::ExternalService(err.to_string()),
            WeatherError::ParseError(e) => ApplicationError::MalformedPayload(e),
            WeatherError::LocationNotFound(query) => ApplicationError::LocationNotFound(query),
            WeatherError::InvalidCoordinates => {
                ApplicationError::InvalidInput("Invalid coordinates".into())
            },
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
        }
    }
}

#[async_trait]
impl WeatherFetchPort for OpenWeatherAdapter {
    #[instrument(skip(self))]
    async fn fetch_by_query(&self, query: &str) -> Result<WeatherSnapshot, ApplicationError> {
        let place = self
            .resolver
            .resolve_one(query)
            .await
            .map_err(Self::map_error)?;
        debug!(place = %place, lat = place.latitude, lon = place.longitude, "Resolved query");

        let raw = self
            .client
            .get_forecast(place.latitude, place.longitude)
            .await
            .map_err(Self::map_error)?;

        let info = LocationInfo::new(place.name, place.region, place.country);
        let snapshot = transform(&raw, &info).map_err(Self::map_error)?;
        debug!(days = snapshot.forecast().len(), "Retrieved forecast");
        Ok(snapshot)
    }

    #[instrument(skip(self), fields(lat = location.latitude(), lon = location.longitude()))]
    async fn fetch_by_coordinates(
        &self,
        location: GeoLocation,
    ) -> Result<WeatherSnapshot, ApplicationError> {
        let (latitude, longitude) = (location.latitude(), location.longitude());
        let (raw, name) = tokio::join!(
            self.client.get_forecast(latitude, longitude),
            self.resolver.place_name(latitude, longitude),
        );
        let raw = raw.map_err(Self::map_error)?;

        let info = LocationInfo::new(name, "", raw.city.country.clone());
        let snapshot = transform(&raw, &info).map_err(Self::map_error)?;
        debug!(name = %snapshot.location().name, "Retrieved forecast for coordinates");
        Ok(snapshot)
    }

    async fn suggest(&self, query: &str) -> Result<Vec<PlaceCandidate>, ApplicationError> {
        Ok(self.resolver.suggest(query).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_is_kept() {
        let err = OpenWeatherAdapter::map_error(WeatherError::Provider {
            status: 401,
            message: "Invalid API key".to_string(),
        });
        assert_eq!(err.to_string(), "Invalid API key");
    }

    #[test]
    fn error_kinds_map_to_application_errors() {
        assert_eq!(
            OpenWeatherAdapter::map_error(WeatherError::RateLimitExceeded),
            ApplicationError::RateLimited
        );
        assert_eq!(
            OpenWeatherAdapter::map_error(WeatherError::LocationNotFound("Atlantis".into())),
            ApplicationError::LocationNotFound("Atlantis".into())
        );
        assert!(matches!(
            OpenWeatherAdapter::map_error(WeatherError::ParseError("eof".into())),
            ApplicationError::MalformedPayload(_)
        ));
        assert!(matches!(
            OpenWeatherAdapter::map_error(WeatherError::Timeout(10)),
            ApplicationError::ExternalService(_)
        ));
        assert!(matches!(
            OpenWeatherAdapter::map_error(WeatherError::InvalidCoordinates),
            ApplicationError::InvalidInput(_)
        ));
    }

    #[test]
    fn adapter_creation_succeeds() {
        let adapter = OpenWeatherAdapter::new(&OpenWeatherConfig::default());
        assert!(adapter.is_ok());
    }
}
