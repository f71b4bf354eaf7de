//! Forecast transformer
//!
//! Turns the provider's flat list of 3-hour samples into a
//! [`WeatherSnapshot`]: samples are grouped by UTC calendar date, the first
//! five days are kept, and each day is summarised. Everything here is pure.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Timelike, Utc};
use domain::{
    Condition, CurrentConditions, DayForecast, HourForecast, MAX_FORECAST_DAYS, SnapshotLocation,
    Speed, Temperature, WeatherSnapshot, compass_direction,
};

use crate::error::WeatherError;
use crate::models::{RawForecast, RawSample};

/// Hour of day (UTC) whose sample represents the day's condition
const REPRESENTATIVE_HOUR: u32 = 12;

/// Resolved place attached to the snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationInfo {
    pub name: String,
    pub region: String,
    pub country: String,
}

impl LocationInfo {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            country: country.into(),
        }
    }
}

/// A sample paired with its parsed timestamp
struct Timed<'a> {
    time: DateTime<Utc>,
    sample: &'a RawSample,
}

/// Build a snapshot from a raw forecast
///
/// Coordinates come from the forecast's `city` section; names from `info`.
///
/// # Errors
///
/// Returns `WeatherError::ParseError` if the forecast has no samples or a
/// sample timestamp is out of range.
pub fn transform(raw: &RawForecast, info: &LocationInfo) -> Result<WeatherSnapshot, WeatherError> {
    let mut samples = raw
        .list
        .iter()
        .map(|sample| {
            DateTime::from_timestamp(sample.dt, 0)
                .map(|time| Timed { time, sample })
                .ok_or_else(|| WeatherError::ParseError(format!("invalid timestamp {}", sample.dt)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    // Stable: equal timestamps keep provider order
    samples.sort_by_key(|t| t.time);

    let first = samples
        .first()
        .ok_or_else(|| WeatherError::ParseError("forecast contains no samples".to_string()))?;

    let location = SnapshotLocation {
        name: info.name.clone(),
        region: info.region.clone(),
        country: info.country.clone(),
        latitude: raw.city.coord.lat,
        longitude: raw.city.coord.lon,
        localtime: local_time(first.time, raw.city.timezone.unwrap_or(0)),
    };
    let current = current_conditions(first.sample);

    let mut buckets: BTreeMap<NaiveDate, Vec<&Timed<'_>>> = BTreeMap::new();
    for timed in &samples {
        buckets.entry(timed.time.date_naive()).or_default().push(timed);
    }

    let forecast = buckets
        .into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(date, day)| summarize_day(date, &day))
        .collect();

    Ok(WeatherSnapshot::new(location, current, forecast))
}

/// `YYYY-MM-DD HH:MM` in the provider's local offset
fn local_time(time: DateTime<Utc>, offset_secs: i32) -> String {
    let offset = FixedOffset::east_opt(offset_secs).unwrap_or_else(|| Utc.fix());
    time.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string()
}

fn condition_of(sample: &RawSample) -> Condition {
    sample
        .weather
        .first()
        .map(|w| Condition {
            text: w.description.clone(),
            icon: w.icon.clone(),
            code: w.id,
        })
        .unwrap_or_default()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn percent(value: f64) -> u8 {
    if value.is_finite() {
        value.round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

fn current_conditions(sample: &RawSample) -> CurrentConditions {
    let main = &sample.main;
    let wind = sample.wind.as_ref();
    CurrentConditions {
        temperature: Temperature::from_celsius(main.temp),
        feels_like: Temperature::from_celsius(main.feels_like.unwrap_or(0.0)),
        condition: condition_of(sample),
        wind: Speed::from_meters_per_second(wind.map_or(0.0, |w| w.speed)),
        gust: Speed::from_meters_per_second(wind.and_then(|w| w.gust).unwrap_or(0.0)),
        wind_direction: compass_direction(wind.map_or(0.0, |w| w.deg)).to_string(),
        humidity: percent(main.humidity.unwrap_or(0.0)),
        pressure_mb: main.pressure.unwrap_or(0.0),
        visibility_km: sample.visibility.unwrap_or(0.0) / 1000.0,
        cloud: percent(sample.clouds.as_ref().map_or(0.0, |c| c.all)),
        precip_mm: sample
            .rain
            .as_ref()
            .and_then(|r| r.three_hours)
            .unwrap_or(0.0),
    }
}

/// Most frequent code; ties go to the code seen first
fn mode_code(day: &[&Timed<'_>]) -> u16 {
    let mut counts: Vec<(u16, usize)> = Vec::new();
    for timed in day {
        let code = condition_of(timed.sample).code;
        match counts.iter_mut().find(|(c, _)| *c == code) {
            Some((_, n)) => *n += 1,
            None => counts.push((code, 1)),
        }
    }
    let mut best = (0, 0);
    for (code, n) in counts {
        if n > best.1 {
            best = (code, n);
        }
    }
    best.0
}

#[allow(clippy::cast_precision_loss)]
fn summarize_day(date: NaiveDate, day: &[&Timed<'_>]) -> DayForecast {
    let count = day.len() as f64;
    let max = day
        .iter()
        .map(|t| t.sample.main.temp_max.unwrap_or(t.sample.main.temp))
        .fold(f64::NEG_INFINITY, f64::max);
    let min = day
        .iter()
        .map(|t| t.sample.main.temp_min.unwrap_or(t.sample.main.temp))
        .fold(f64::INFINITY, f64::min);
    let avg = day.iter().map(|t| t.sample.main.temp).sum::<f64>() / count;
    let rain = day
        .iter()
        .map(|t| t.sample.pop.unwrap_or(0.0) * 100.0)
        .sum::<f64>()
        / count;

    // min_by_key keeps the first of equally close samples
    let representative = day
        .iter()
        .min_by_key(|t| t.time.hour().abs_diff(REPRESENTATIVE_HOUR))
        .map(|t| condition_of(t.sample))
        .unwrap_or_default();

    let hours = day
        .iter()
        .map(|t| HourForecast {
            time: t.time,
            temperature: Temperature::from_celsius(t.sample.main.temp),
            condition: condition_of(t.sample),
            chance_of_rain: percent(t.sample.pop.unwrap_or(0.0) * 100.0),
        })
        .collect();

    DayForecast {
        date,
        max_temperature: Temperature::from_celsius(max),
        min_temperature: Temperature::from_celsius(min),
        avg_temperature: Temperature::from_celsius(avg),
        condition: Condition {
            code: mode_code(day),
            ..representative
        },
        chance_of_rain: percent(rain),
        chance_of_snow: 0,
        hours,
    }
}
