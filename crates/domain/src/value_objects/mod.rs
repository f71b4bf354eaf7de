//! Value Objects - Immutable, identity-less domain primitives

mod compass;
mod condition;
mod geo_location;
mod place;
mod units;

pub use compass::compass_direction;
pub use condition::{ConditionCategory, WeatherIcon};
pub use geo_location::{GeoLocation, InvalidCoordinates};
pub use place::PlaceCandidate;
pub use units::{
    KPH_PER_MPS, MPH_PER_MPS, Speed, Temperature, TemperatureUnit, celsius_to_fahrenheit,
};
