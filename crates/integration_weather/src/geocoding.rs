//! Location resolver
//!
//! Turns user input into coordinates. Numeric-only input is treated as a
//! postal code and tried against each configured format in order; anything
//! else, and any postal lookup that fails, goes to the free-text search.
//! Reverse-geocoded names are cached because the same coordinates are
//! looked up on every refresh of a geolocated session.

use std::sync::Arc;
use std::time::Duration;

use domain::PlaceCandidate;
use moka::future::Cache;
use tracing::{debug, instrument, warn};

use crate::client::WeatherClient;
use crate::config::{OpenWeatherConfig, PostalFormat};
use crate::error::WeatherError;

/// Name used when reverse geocoding yields nothing
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Resolves queries and coordinates to places
pub struct LocationResolver {
    client: Arc<dyn WeatherClient>,
    limit: u8,
    postal_formats: Vec<PostalFormat>,
    place_names: Cache<String, String>,
}

impl std::fmt::Debug for LocationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationResolver")
            .field("limit", &self.limit)
            .field("postal_formats", &self.postal_formats)
            .finish_non_exhaustive()
    }
}

fn is_postal_code(query: &str) -> bool {
    !query.is_empty() && query.chars().all(|c| c.is_ascii_digit())
}

impl LocationResolver {
    #[must_use]
    pub fn new(client: Arc<dyn WeatherClient>, config: &OpenWeatherConfig) -> Self {
        let place_names = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(config.place_name_ttl_secs.max(1)))
            .build();

        Self {
            client,
            limit: config.suggestion_limit,
            postal_formats: config.postal_formats.clone(),
            place_names,
        }
    }

    /// All candidates for a query
    ///
    /// A blank query resolves to no candidates without contacting the
    /// provider.
    ///
    /// # Errors
    ///
    /// Returns the free-text search error; postal lookup errors are only
    /// logged.
    #[instrument(skip(self))]
    pub async fn resolve(&self, query: &str) -> Result<Vec<PlaceCandidate>, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        if is_postal_code(query) {
            for format in self.postal_formats.iter().filter(|f| f.matches(query)) {
                match self
                    .client
                    .lookup_postal_code(query, &format.country_code)
                    .await
                {
                    Ok(place) => {
                        debug!(country = %format.country_code, "Resolved postal code");
                        return Ok(vec![place.into()]);
                    },
                    Err(e) => {
                        debug!(country = %format.country_code, error = %e, "Postal lookup failed");
                    },
                }
            }
        }

        let results = self.client.search_places(query, self.limit).await?;
        debug!(count = results.len(), "Resolved free-text query");
        Ok(results.into_iter().map(PlaceCandidate::from).collect())
    }

    /// Candidates for a suggestion list; errors yield an empty list
    pub async fn suggest(&self, query: &str) -> Vec<PlaceCandidate> {
        match self.resolve(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, "Suggestion lookup failed");
                Vec::new()
            },
        }
    }

    /// The best candidate for a direct search
    ///
    /// # Errors
    ///
    /// Returns `WeatherError::LocationNotFound` when nothing matches, or the
    /// provider error.
    pub async fn resolve_one(&self, query: &str) -> Result<PlaceCandidate, WeatherError> {
        self.resolve(query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::LocationNotFound(query.trim().to_string()))
    }

    /// Human-readable name for coordinates, never failing
    #[instrument(skip(self))]
    pub async fn place_name(&self, latitude: f64, longitude: f64) -> String {
        let key = format!("{latitude:.4},{longitude:.4}");
        if let Some(name) = self.place_names.get(&key).await {
            debug!("Place name cache hit");
            return name;
        }

        match self.client.reverse_geocode(latitude, longitude).await {
            Ok(results) => match results.first() {
                Some(result) => {
                    let name = result.formatted_name();
                    self.place_names.insert(key, name.clone()).await;
                    name
                },
                None => UNKNOWN_LOCATION.to_string(),
            },
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed");
                UNKNOWN_LOCATION.to_string()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockWeatherClient;
    use crate::models::{GeocodingResult, ZipResult};

    fn result(name: &str, state: Option<&str>) -> GeocodingResult {
        GeocodingResult {
            name: name.to_string(),
            country: "US".to_string(),
            state: state.map(str::to_string),
            lat: 40.71,
            lon: -74.01,
        }
    }

    fn zip(name: &str, country: &str) -> ZipResult {
        ZipResult {
            zip: String::new(),
            name: name.to_string(),
            lat: 19.07,
            lon: 72.88,
            country: country.to_string(),
        }
    }

    fn resolver(mock: MockWeatherClient) -> LocationResolver {
        LocationResolver::new(Arc::new(mock), &OpenWeatherConfig::default())
    }

    #[test]
    fn postal_code_detection() {
        assert!(is_postal_code("10001"));
        assert!(!is_postal_code("1000A"));
        assert!(!is_postal_code(""));
        assert!(!is_postal_code("New York"));
    }

    #[tokio::test]
    async fn blank_query_makes_no_calls() {
        let mut mock = MockWeatherClient::new();
        mock.expect_search_places().never();
        mock.expect_lookup_postal_code().never();
        let candidates = resolver(mock).resolve("   ").await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn five_digit_code_uses_us_lookup() {
        let mut mock = MockWeatherClient::new();
        mock.expect_lookup_postal_code()
            .withf(|code: &str, cc: &str| code == "10001" && cc == "US")
            .times(1)
            .returning(|_, _| Ok(zip("New York", "US")));
        mock.expect_search_places().never();

        let candidates = resolver(mock).resolve("10001").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "New York");
    }

    #[tokio::test]
    async fn six_digit_code_uses_india_lookup() {
        let mut mock = MockWeatherClient::new();
        mock.expect_lookup_postal_code()
            .withf(|code: &str, cc: &str| code == "400001" && cc == "IN")
            .times(1)
            .returning(|_, _| Ok(zip("Mumbai", "IN")));

        let candidates = resolver(mock).resolve("400001").await.unwrap();
        assert_eq!(candidates[0].country, "IN");
    }

    #[tokio::test]
    async fn failed_postal_lookup_falls_through_to_search() {
        let mut mock = MockWeatherClient::new();
        mock.expect_lookup_postal_code()
            .times(1)
            .returning(|_, _| {
                Err(WeatherError::Provider {
                    status: 404,
                    message: "not found".to_string(),
                })
            });
        mock.expect_search_places()
            .withf(|q: &str, limit: &u8| q == "99999" && *limit == 5)
            .times(1)
            .returning(|_, _| Ok(vec![result("Somewhere", None)]));

        let candidates = resolver(mock).resolve("99999").await.unwrap();
        assert_eq!(candidates[0].name, "Somewhere");
    }

    #[tokio::test]
    async fn unmatched_digit_count_goes_straight_to_search() {
        let mut mock = MockWeatherClient::new();
        mock.expect_lookup_postal_code().never();
        mock.expect_search_places()
            .times(1)
            .returning(|_, _| Ok(vec![]));
        assert!(resolver(mock).resolve("1234").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn resolve_one_reports_location_not_found() {
        let mut mock = MockWeatherClient::new();
        mock.expect_search_places().returning(|_, _| Ok(vec![]));
        let err = resolver(mock).resolve_one(" Atlantis ").await.unwrap_err();
        assert_eq!(err, WeatherError::LocationNotFound("Atlantis".to_string()));
    }

    #[tokio::test]
    async fn suggest_swallows_errors() {
        let mut mock = MockWeatherClient::new();
        mock.expect_search_places()
            .returning(|_, _| Err(WeatherError::RateLimitExceeded));
        assert!(resolver(mock).suggest("Par").await.is_empty());
    }

    #[tokio::test]
    async fn place_name_is_cached() {
        let mut mock = MockWeatherClient::new();
        mock.expect_reverse_geocode()
            .times(1)
            .returning(|_, _| Ok(vec![result("Manhattan", Some("New York"))]));
        let resolver = resolver(mock);

        assert_eq!(
            resolver.place_name(40.71, -74.01).await,
            "Manhattan, New York, US"
        );
        assert_eq!(
            resolver.place_name(40.71, -74.01).await,
            "Manhattan, New York, US"
        );
    }

    #[tokio::test]
    async fn place_name_falls_back_to_unknown() {
        let mut mock = MockWeatherClient::new();
        mock.expect_reverse_geocode()
            .returning(|_, _| Err(WeatherError::Timeout(10)));
        assert_eq!(resolver(mock).place_name(1.0, 2.0).await, UNKNOWN_LOCATION);
    }
}
