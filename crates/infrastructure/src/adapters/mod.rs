//! Adapters implementing application ports

mod geolocation_adapter;
mod weather_adapter;

pub use geolocation_adapter::{FixedGeolocation, IpGeolocationAdapter, geolocation_from_config};
pub use weather_adapter::OpenWeatherAdapter;
