//! Domain entities - Objects with identity and lifecycle

mod preferences;
mod session;
mod snapshot;

pub use preferences::{
    MAX_FAVORITES, MigrationOutcome, PREFERENCES_VERSION, Theme, UserPreferences,
};
pub use session::{FetchPhase, SessionState};
pub use snapshot::{
    Condition, CurrentConditions, DayForecast, HourForecast, MAX_FORECAST_DAYS, SnapshotLocation,
    WeatherSnapshot,
};
