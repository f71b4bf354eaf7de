//! Text rendering of weather state
//!
//! Everything here returns a `String` so `main` decides where it goes.

use chrono::Datelike;
use domain::{
    DayForecast, PlaceCandidate, SessionState, Speed, TemperatureUnit, UserPreferences,
    WeatherSnapshot,
};

fn speed(unit: TemperatureUnit, value: &Speed) -> String {
    format!("{:.0} {}", unit.speed(value), unit.speed_label())
}

fn day_line(day: &DayForecast, unit: TemperatureUnit) -> String {
    let icon = day.condition.weather_icon();
    format!(
        "  {} {:02}  {}  {:<24} {:>6} / {:<6} rain {:>3}%",
        day.date.weekday(),
        day.date.day(),
        icon.emoji(),
        day.condition.text,
        unit.format(&day.max_temperature),
        unit.format(&day.min_temperature),
        day.chance_of_rain,
    )
}

/// Full view of one snapshot
pub fn render_snapshot(snapshot: &WeatherSnapshot, unit: TemperatureUnit) -> String {
    let location = snapshot.location();
    let current = snapshot.current();
    let icon = current.condition.weather_icon();
    let mut out = String::new();

    out.push_str(&format!(
        "{}  {}  (local time {})\n",
        icon.emoji(),
        location.display_name(),
        location.localtime
    ));
    out.push_str(&format!(
        "  {} · {}\n",
        current.condition.text,
        current.condition.category().description()
    ));
    out.push_str(&format!(
        "  {} (feels like {})\n",
        unit.format(&current.temperature),
        unit.format(&current.feels_like)
    ));
    out.push_str(&format!(
        "  Wind {} {}, gusts {} · Humidity {}% · Pressure {:.0} mb\n",
        speed(unit, &current.wind),
        current.wind_direction,
        speed(unit, &current.gust),
        current.humidity,
        current.pressure_mb
    ));
    out.push_str(&format!(
        "  Visibility {:.1} km · Cloud {}% · Precipitation {:.1} mm\n",
        current.visibility_km, current.cloud, current.precip_mm
    ));

    if !snapshot.forecast().is_empty() {
        out.push_str("\nForecast\n");
        for day in snapshot.forecast() {
            out.push_str(&day_line(day, unit));
            out.push('\n');
        }
    }
    out
}

/// Session state: loading marker, error line, and whatever snapshot is shown
pub fn render_state(state: &SessionState, unit: TemperatureUnit) -> String {
    let mut out = String::new();

    if state.is_loading {
        if state.retry_count > 0 {
            out.push_str(&format!(
                "Loading weather for {} (retry {})...\n",
                state.location, state.retry_count
            ));
        } else {
            out.push_str(&format!("Loading weather for {}...\n", state.location));
        }
    }
    if let Some(error) = &state.error {
        out.push_str(&format!("⚠️  {error}\n"));
        if state.snapshot.is_some() {
            out.push_str("Showing the last available data.\n");
        }
    }
    if let Some(snapshot) = &state.snapshot {
        out.push_str(&render_snapshot(snapshot, unit));
    }
    out
}

/// Numbered suggestion list
pub fn render_suggestions(candidates: &[PlaceCandidate]) -> String {
    if candidates.is_empty() {
        return "No matching places\n".to_string();
    }
    candidates
        .iter()
        .enumerate()
        .map(|(i, candidate)| format!("  {}. {candidate}\n", i + 1))
        .collect()
}

pub fn render_preferences(preferences: &UserPreferences) -> String {
    let mut out = format!(
        "Theme: {}\nUnits: {} ({}, {})\n",
        preferences.theme,
        preferences.temperature_unit,
        preferences.temperature_unit.symbol(),
        preferences.temperature_unit.speed_label()
    );
    out.push_str(&render_favorites(preferences));
    out
}

pub fn render_favorites(preferences: &UserPreferences) -> String {
    if preferences.favorite_locations().is_empty() {
        return "Favorites: none\n".to_string();
    }
    let mut out = "Favorites:\n".to_string();
    for favorite in preferences.favorite_locations() {
        out.push_str(&format!("  ★ {favorite}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use domain::{
        Condition, CurrentConditions, HourForecast, SnapshotLocation, Temperature,
    };

    fn rain() -> Condition {
        Condition {
            text: "moderate rain".to_string(),
            icon: "10d".to_string(),
            code: 501,
        }
    }

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot::new(
            SnapshotLocation {
                name: "Bergen".to_string(),
                region: "Vestland".to_string(),
                country: "NO".to_string(),
                latitude: 60.39,
                longitude: 5.32,
                localtime: "2024-10-01 14:00".to_string(),
            },
            CurrentConditions {
                temperature: Temperature::from_celsius(10.0),
                feels_like: Temperature::from_celsius(7.0),
                condition: rain(),
                wind: Speed::from_meters_per_second(10.0),
                gust: Speed::from_meters_per_second(15.0),
                wind_direction: "SW".to_string(),
                humidity: 93,
                pressure_mb: 998.0,
                visibility_km: 6.5,
                cloud: 100,
                precip_mm: 2.3,
            },
            vec![DayForecast {
                date: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
                max_temperature: Temperature::from_celsius(12.0),
                min_temperature: Temperature::from_celsius(8.0),
                avg_temperature: Temperature::from_celsius(10.0),
                condition: rain(),
                chance_of_rain: 90,
                chance_of_snow: 0,
                hours: vec![HourForecast {
                    time: Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap(),
                    temperature: Temperature::from_celsius(10.0),
                    condition: rain(),
                    chance_of_rain: 90,
                }],
            }],
        )
    }

    #[test]
    fn snapshot_in_celsius() {
        let text = render_snapshot(&snapshot(), TemperatureUnit::Celsius);
        assert!(text.contains("🌧️  Bergen, Vestland, NO"));
        assert!(text.contains("10°C (feels like 7°C)"));
        assert!(text.contains("Wind 36 km/h SW, gusts 54 km/h"));
        assert!(text.contains("Tue 01"));
        assert!(text.contains("rain  90%"));
    }

    #[test]
    fn snapshot_in_fahrenheit_uses_mph() {
        let text = render_snapshot(&snapshot(), TemperatureUnit::Fahrenheit);
        assert!(text.contains("50°F (feels like 45°F)"));
        assert!(text.contains("Wind 22 mph"));
        assert!(text.contains("54°F"));
    }

    #[test]
    fn failed_state_keeps_stale_snapshot() {
        let mut state = SessionState::new("Bergen");
        state.fail("offline", Some(snapshot()));
        let text = render_state(&state, TemperatureUnit::Celsius);
        assert!(text.starts_with("⚠️  offline\nShowing the last available data.\n"));
        assert!(text.contains("Bergen"));
    }

    #[test]
    fn loading_state_shows_retry() {
        let mut state = SessionState::new("Bergen");
        state.begin_fetch();
        state.retry_count = 2;
        assert_eq!(
            render_state(&state, TemperatureUnit::Celsius),
            "Loading weather for Bergen (retry 2)...\n"
        );
    }

    #[test]
    fn suggestions_are_numbered() {
        let candidates = vec![
            PlaceCandidate {
                name: "Springfield".to_string(),
                country: "US".to_string(),
                region: "Illinois".to_string(),
                latitude: 39.8,
                longitude: -89.6,
            },
            PlaceCandidate {
                name: "Springfield".to_string(),
                country: "US".to_string(),
                region: "Missouri".to_string(),
                latitude: 37.2,
                longitude: -93.3,
            },
        ];
        let text = render_suggestions(&candidates);
        assert_eq!(
            text,
            "  1. Springfield, Illinois, US\n  2. Springfield, Missouri, US\n"
        );
        assert_eq!(render_suggestions(&[]), "No matching places\n");
    }

    #[test]
    fn preferences_list_favorites() {
        let mut prefs = UserPreferences::default();
        assert!(render_preferences(&prefs).ends_with("Favorites: none\n"));
        prefs.add_favorite("Bergen");
        let text = render_preferences(&prefs);
        assert!(text.starts_with("Theme: dark\nUnits: celsius (°C, km/h)\n"));
        assert!(text.contains("★ Bergen"));
    }
}
