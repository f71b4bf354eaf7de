//! Place candidate value object

use serde::{Deserialize, Serialize};
use std::fmt;

use super::GeoLocation;

/// A place returned by location lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub country: String,
    /// State or region, empty when the provider has none
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PlaceCandidate {
    /// Coordinates of the place, if they are in range
    #[must_use]
    pub fn location(&self) -> Option<GeoLocation> {
        GeoLocation::new(self.latitude, self.longitude).ok()
    }

    /// Query string that selects this place again (`name, region`)
    #[must_use]
    pub fn search_text(&self) -> String {
        if self.region.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.region)
        }
    }
}

impl fmt::Display for PlaceCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.region.is_empty() {
            write!(f, ", {}", self.region)?;
        }
        if !self.country.is_empty() {
            write!(f, ", {}", self.country)?;
        }
        Ok(())
    }
}
