//! Shared builders for service tests

use chrono::{NaiveDate, TimeZone, Utc};
use domain::{
    Condition, CurrentConditions, DayForecast, HourForecast, SnapshotLocation, Speed, Temperature,
    WeatherSnapshot,
};

pub fn snapshot(name: &str) -> WeatherSnapshot {
    let condition = Condition {
        text: "clear sky".to_string(),
        icon: "01d".to_string(),
        code: 800,
    };
    let hour = HourForecast {
        time: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        temperature: Temperature::from_celsius(20.0),
        condition: condition.clone(),
        chance_of_rain: 0,
    };
    WeatherSnapshot::new(
        SnapshotLocation {
            name: name.to_string(),
            region: String::new(),
            country: "GB".to_string(),
            latitude: 51.5,
            longitude: -0.12,
            localtime: "2024-06-01 12:00".to_string(),
        },
        CurrentConditions {
            temperature: Temperature::from_celsius(20.0),
            feels_like: Temperature::from_celsius(19.0),
            condition: condition.clone(),
            wind: Speed::from_meters_per_second(2.0),
            gust: Speed::default(),
            wind_direction: "W".to_string(),
            humidity: 50,
            pressure_mb: 1016.0,
            visibility_km: 10.0,
            cloud: 0,
            precip_mm: 0.0,
        },
        vec![DayForecast {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            max_temperature: Temperature::from_celsius(24.0),
            min_temperature: Temperature::from_celsius(14.0),
            avg_temperature: Temperature::from_celsius(19.0),
            condition,
            chance_of_rain: 0,
            chance_of_snow: 0,
            hours: vec![hour],
        }],
    )
}

/// A snapshot that fails the validation gate
pub fn incomplete_snapshot() -> WeatherSnapshot {
    let full = snapshot("Nowhere");
    WeatherSnapshot::new(full.location().clone(), full.current().clone(), Vec::new())
}
