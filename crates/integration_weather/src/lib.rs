//! OpenWeatherMap integration
//!
//! Client for the OpenWeatherMap 5-day/3-hour forecast and geocoding APIs
//! (<https://openweathermap.org/api>), the location resolver built on it, and
//! the transformer that turns raw forecast samples into a
//! [`domain::WeatherSnapshot`].

pub mod client;
mod config;
mod error;
mod geocoding;
pub mod models;
pub mod transform;

pub use client::{OpenWeatherClient, WeatherClient};
pub use config::{OpenWeatherConfig, PostalFormat};
pub use error::WeatherError;
pub use geocoding::{LocationResolver, UNKNOWN_LOCATION};
pub use transform::{LocationInfo, transform};
