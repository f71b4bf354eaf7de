//! Integration tests for the OpenWeatherMap client using wiremock
//!
//! These tests run the real HTTP client against a mock server to check
//! request shapes, error mapping and the resolver's postal fallback.

use std::sync::Arc;

use integration_weather::{
    LocationInfo, LocationResolver, OpenWeatherClient, OpenWeatherConfig, UNKNOWN_LOCATION,
    WeatherClient, WeatherError, transform,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

/// Two days of 3-hour samples starting 2024-01-15 00:00 UTC
fn sample_forecast_response() -> serde_json::Value {
    let start = 1_705_276_800_i64;
    let list: Vec<serde_json::Value> = (0..16)
        .map(|i| {
            serde_json::json!({
                "dt": start + i * 10_800,
                "main": {
                    "temp": 5.0 + f64::from(u8::try_from(i).unwrap()),
                    "feels_like": 2.0,
                    "temp_min": 4.0,
                    "temp_max": 6.0 + f64::from(u8::try_from(i).unwrap()),
                    "pressure": 1013,
                    "humidity": 75
                },
                "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
                "clouds": { "all": 75 },
                "wind": { "speed": 4.1, "deg": 250, "gust": 7.2 },
                "visibility": 10000,
                "pop": 0.3,
                "dt_txt": "ignored"
            })
        })
        .collect();

    serde_json::json!({
        "cod": "200",
        "message": 0,
        "cnt": 16,
        "list": list,
        "city": {
            "id": 2_950_159,
            "name": "Berlin",
            "coord": { "lat": 52.52, "lon": 13.405 },
            "country": "DE",
            "timezone": 3600
        }
    })
}

async fn client_for(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::new(OpenWeatherConfig::for_base_url(server.uri()))
        .expect("client creation should succeed")
}

#[tokio::test]
async fn forecast_request_carries_key_and_metric_units() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "52.52"))
        .and(query_param("lon", "13.405"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let raw = client.get_forecast(52.52, 13.405).await.expect("should fetch");
    assert_eq!(raw.list.len(), 16);
    assert_eq!(raw.city.timezone, Some(3600));

    let snapshot = transform(&raw, &LocationInfo::new("Berlin", "", "DE")).expect("should transform");
    assert_eq!(snapshot.forecast().len(), 2);
    assert_eq!(snapshot.location().localtime, "2024-01-15 01:00");
    assert_eq!(snapshot.current().wind_direction, "WSW");
    assert!(snapshot.validate().is_ok());
}

#[tokio::test]
async fn invalid_coordinates_make_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.get_forecast(95.0, 0.0).await.unwrap_err();
    assert_eq!(err, WeatherError::InvalidCoordinates);
}

#[tokio::test]
async fn provider_message_surfaces_in_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.get_forecast(52.52, 13.405).await.unwrap_err();
    assert_eq!(
        err,
        WeatherError::Provider {
            status: 401,
            message: "Invalid API key".to_string()
        }
    );
}

#[tokio::test]
async fn server_error_without_body_uses_generic_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.get_forecast(52.52, 13.405).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(err.to_string(), "Failed to fetch weather data (HTTP 503)");
}

#[tokio::test]
async fn rate_limit_is_detected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.search_places("Berlin", 5).await.unwrap_err();
    assert_eq!(err, WeatherError::RateLimitExceeded);
}

#[tokio::test]
async fn malformed_json_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.get_forecast(52.52, 13.405).await.unwrap_err();
    assert!(matches!(err, WeatherError::ParseError(_)));
}

#[tokio::test]
async fn direct_search_passes_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Springfield"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "Springfield", "country": "US", "state": "Illinois", "lat": 39.78, "lon": -89.65 },
            { "name": "Springfield", "country": "US", "state": "Missouri", "lat": 37.21, "lon": -93.29 }
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let results = client.search_places("Springfield", 5).await.expect("should search");
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].state.as_deref(), Some("Missouri"));
}

#[tokio::test]
async fn resolver_falls_back_from_postal_lookup_to_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/zip"))
        .and(query_param("zip", "12345,US"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "not found"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "12345"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "Schenectady", "country": "US", "lat": 42.81, "lon": -73.94 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server).await);
    let resolver = LocationResolver::new(client, &OpenWeatherConfig::for_base_url(server.uri()));
    let place = resolver.resolve_one("12345").await.expect("should resolve");
    assert_eq!(place.name, "Schenectady");
}

#[tokio::test]
async fn resolver_uses_postal_lookup_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/zip"))
        .and(query_param("zip", "560001,IN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "zip": "560001", "name": "Bengaluru", "lat": 12.97, "lon": 77.59, "country": "IN"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server).await);
    let resolver = LocationResolver::new(client, &OpenWeatherConfig::for_base_url(server.uri()));
    let candidates = resolver.resolve("560001").await.expect("should resolve");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].name, "Bengaluru");
}

#[tokio::test]
async fn resolver_reports_unknown_place() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server).await);
    let resolver = LocationResolver::new(client, &OpenWeatherConfig::for_base_url(server.uri()));
    let err = resolver.resolve_one("Xyzzyville").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Location not found: Xyzzyville. Please check the spelling and try again."
    );
}

#[tokio::test]
async fn reverse_geocoding_formats_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/reverse"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "Mitte", "country": "DE", "state": "Berlin", "lat": 52.52, "lon": 13.40 }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server).await);
    let resolver = LocationResolver::new(client, &OpenWeatherConfig::for_base_url(server.uri()));
    assert_eq!(resolver.place_name(52.52, 13.40).await, "Mitte, Berlin, DE");
    // Second lookup is served from the cache
    assert_eq!(resolver.place_name(52.52, 13.40).await, "Mitte, Berlin, DE");
}

#[tokio::test]
async fn reverse_geocoding_failure_is_unknown_location() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/reverse"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = Arc::new(client_for(&server).await);
    let resolver = LocationResolver::new(client, &OpenWeatherConfig::for_base_url(server.uri()));
    assert_eq!(resolver.place_name(10.0, 10.0).await, UNKNOWN_LOCATION);
}
