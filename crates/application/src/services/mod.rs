//! Application services - Use case implementations

mod debouncer;
mod export;
mod geolocation_service;
mod preferences_service;
mod snapshot_cache;
#[cfg(test)]
mod test_support;
mod weather_controller;

pub use debouncer::Debouncer;
pub use export::SnapshotExport;
pub use geolocation_service::{GeolocationConfig, GeolocationService, PositionUpdate, WatchHandle};
pub use preferences_service::PreferencesService;
pub use snapshot_cache::{SnapshotCache, coordinates_key, text_key};
pub use weather_controller::{ControllerConfig, WeatherController};
