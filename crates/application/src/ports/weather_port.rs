//! Weather fetch port
//!
//! One call yields one complete, transformed snapshot. Retrying, caching and
//! validation are the controller's concern, not the adapter's.

use async_trait::async_trait;
use domain::{GeoLocation, PlaceCandidate, WeatherSnapshot};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for weather retrieval
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherFetchPort: Send + Sync {
    /// Resolve a free-text or postal query and fetch its forecast
    async fn fetch_by_query(&self, query: &str) -> Result<WeatherSnapshot, ApplicationError>;

    /// Fetch the forecast for coordinates, naming the place by reverse lookup
    async fn fetch_by_coordinates(
        &self,
        location: GeoLocation,
    ) -> Result<WeatherSnapshot, ApplicationError>;

    /// Place candidates for a partial query
    async fn suggest(&self, query: &str) -> Result<Vec<PlaceCandidate>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn WeatherFetchPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn WeatherFetchPort>();
    }
}
