//! Geolocation source settings

use std::fmt;

use application::GeolocationConfig;
use domain::GeoLocation;
use serde::{Deserialize, Serialize};

/// Where the user's position comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeolocationMode {
    /// Look the position up from the public IP address (default)
    #[default]
    Ip,
    /// Always report the configured coordinates
    Fixed,
    /// Location access is off; every lookup is denied
    Disabled,
}

impl fmt::Display for GeolocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip => write!(f, "ip"),
            Self::Fixed => write!(f, "fixed"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

impl std::str::FromStr for GeolocationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ip" => Ok(Self::Ip),
            "fixed" => Ok(Self::Fixed),
            "disabled" | "off" => Ok(Self::Disabled),
            _ => Err(format!(
                "Invalid geolocation mode: {s}. Use 'ip', 'fixed' or 'disabled'"
            )),
        }
    }
}

/// `[geolocation]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeolocationAppConfig {
    #[serde(default)]
    pub mode: GeolocationMode,

    /// JSON endpoint answering `{latitude, longitude}` (ip mode)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Latitude reported in fixed mode
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Longitude reported in fixed mode
    #[serde(default)]
    pub longitude: Option<f64>,

    /// Accuracy, timeout and retry tuning
    #[serde(default)]
    pub options: GeolocationConfig,
}

fn default_endpoint() -> String {
    "https://ipapi.co/json/".to_string()
}

impl Default for GeolocationAppConfig {
    fn default() -> Self {
        Self {
            mode: GeolocationMode::default(),
            endpoint: default_endpoint(),
            latitude: None,
            longitude: None,
            options: GeolocationConfig::default(),
        }
    }
}

impl GeolocationAppConfig {
    /// Fixed coordinates as a domain value
    ///
    /// Returns `None` when either coordinate is missing or out of range.
    #[must_use]
    pub fn fixed_location(&self) -> Option<GeoLocation> {
        GeoLocation::new(self.latitude?, self.longitude?).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("IP".parse::<GeolocationMode>().unwrap(), GeolocationMode::Ip);
        assert_eq!(
            "Fixed".parse::<GeolocationMode>().unwrap(),
            GeolocationMode::Fixed
        );
        assert_eq!(
            "off".parse::<GeolocationMode>().unwrap(),
            GeolocationMode::Disabled
        );
        assert!("gps".parse::<GeolocationMode>().is_err());
    }

    #[test]
    fn mode_display_matches_serde_name() {
        for mode in [
            GeolocationMode::Ip,
            GeolocationMode::Fixed,
            GeolocationMode::Disabled,
        ] {
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{mode}\""));
        }
    }

    #[test]
    fn fixed_location_requires_both_valid_coordinates() {
        let mut config = GeolocationAppConfig {
            latitude: Some(48.85),
            ..GeolocationAppConfig::default()
        };
        assert!(config.fixed_location().is_none());

        config.longitude = Some(2.35);
        let location = config.fixed_location().unwrap();
        assert!((location.latitude() - 48.85).abs() < f64::EPSILON);

        config.latitude = Some(123.0);
        assert!(config.fixed_location().is_none());
    }
}
