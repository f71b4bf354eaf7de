//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod geolocation_port;
mod preferences_port;
mod weather_port;

#[cfg(test)]
pub use geolocation_port::MockGeolocationPort;
pub use geolocation_port::{GeolocationError, GeolocationPort, PositionOptions};
#[cfg(test)]
pub use preferences_port::MockPreferencesStore;
pub use preferences_port::PreferencesStore;
#[cfg(test)]
pub use weather_port::MockWeatherFetchPort;
pub use weather_port::WeatherFetchPort;
