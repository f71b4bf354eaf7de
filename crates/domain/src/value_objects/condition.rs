//! Condition mapping
//!
//! Maps provider condition codes (OpenWeatherMap condition ids) to a closed
//! set of icon identifiers and presentation categories. Both mappings are
//! static tables; unknown codes fall back to a fixed variant.
//!
//! See: <https://openweathermap.org/weather-conditions>

use serde::{Deserialize, Serialize};
use std::fmt;

/// Icon identifier shown for a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherIcon {
    Sun,
    CloudSun,
    Cloud,
    CloudFog,
    CloudDrizzle,
    CloudRain,
    CloudSnow,
    CloudLightning,
    /// Fallback for codes outside the table
    CloudQuestion,
}

impl WeatherIcon {
    /// Resolve the icon for a provider condition code
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            800 => Self::Sun,
            801 | 802 => Self::CloudSun,
            803 | 804 => Self::Cloud,
            701 | 711 | 721 | 731 | 741 | 751 | 761 | 762 | 771 | 781 => Self::CloudFog,
            300..=302 | 310..=314 | 321 | 500 | 520 => Self::CloudDrizzle,
            501..=504 | 521 | 522 | 531 => Self::CloudRain,
            511 | 600..=602 | 611..=613 | 615 | 616 | 620..=622 => Self::CloudSnow,
            200..=202 | 210..=212 | 221 | 230..=232 => Self::CloudLightning,
            _ => Self::CloudQuestion,
        }
    }

    /// Stable identifier (kebab-case)
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::CloudSun => "cloud-sun",
            Self::Cloud => "cloud",
            Self::CloudFog => "cloud-fog",
            Self::CloudDrizzle => "cloud-drizzle",
            Self::CloudRain => "cloud-rain",
            Self::CloudSnow => "cloud-snow",
            Self::CloudLightning => "cloud-lightning",
            Self::CloudQuestion => "cloud-question",
        }
    }

    /// Terminal-friendly glyph
    #[must_use]
    pub const fn emoji(&self) -> &'static str {
        match self {
            Self::Sun => "☀️",
            Self::CloudSun => "⛅",
            Self::Cloud => "☁️",
            Self::CloudFog => "🌫️",
            Self::CloudDrizzle => "🌦️",
            Self::CloudRain => "🌧️",
            Self::CloudSnow => "❄️",
            Self::CloudLightning => "⛈️",
            Self::CloudQuestion => "❓",
        }
    }
}

impl fmt::Display for WeatherIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad condition category, used for backgrounds and grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionCategory {
    Clear,
    PartlyCloudy,
    Cloudy,
    Rain,
    Snow,
    Thunderstorm,
    /// Mist, smoke, haze, dust, fog, sand, ash, squall, tornado
    Atmosphere,
    Unknown,
}

impl ConditionCategory {
    /// Categorize a provider condition code
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            800 => Self::Clear,
            801 | 802 => Self::PartlyCloudy,
            803 | 804 => Self::Cloudy,
            300..=302 | 310..=314 | 321 | 500..=504 | 511 | 520..=522 | 531 => Self::Rain,
            600..=602 | 611..=613 | 615 | 616 | 620..=622 => Self::Snow,
            200..=202 | 210..=212 | 221 | 230..=232 => Self::Thunderstorm,
            701 | 711 | 721 | 731 | 741 | 751 | 761 | 762 | 771 | 781 => Self::Atmosphere,
            _ => Self::Unknown,
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Cloudy => "Cloudy",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Atmosphere => "Low visibility",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_and_clouds() {
        assert_eq!(WeatherIcon::from_code(800), WeatherIcon::Sun);
        assert_eq!(WeatherIcon::from_code(801), WeatherIcon::CloudSun);
        assert_eq!(WeatherIcon::from_code(804), WeatherIcon::Cloud);
    }

    #[test]
    fn light_rain_uses_drizzle_icon_but_rain_category() {
        assert_eq!(WeatherIcon::from_code(500), WeatherIcon::CloudDrizzle);
        assert_eq!(ConditionCategory::from_code(500), ConditionCategory::Rain);
        assert_eq!(WeatherIcon::from_code(501), WeatherIcon::CloudRain);
    }

    #[test]
    fn freezing_rain_shows_snow_icon() {
        assert_eq!(WeatherIcon::from_code(511), WeatherIcon::CloudSnow);
        assert_eq!(ConditionCategory::from_code(511), ConditionCategory::Rain);
    }

    #[test]
    fn thunderstorm_and_atmosphere() {
        assert_eq!(WeatherIcon::from_code(211), WeatherIcon::CloudLightning);
        assert_eq!(ConditionCategory::from_code(232), ConditionCategory::Thunderstorm);
        assert_eq!(WeatherIcon::from_code(741), WeatherIcon::CloudFog);
        assert_eq!(ConditionCategory::from_code(781), ConditionCategory::Atmosphere);
    }

    #[test]
    fn unknown_codes_fall_back() {
        assert_eq!(WeatherIcon::from_code(0), WeatherIcon::CloudQuestion);
        assert_eq!(WeatherIcon::from_code(203), WeatherIcon::CloudQuestion);
        assert_eq!(ConditionCategory::from_code(999), ConditionCategory::Unknown);
    }

    #[test]
    fn icon_identifiers_are_kebab_case() {
        assert_eq!(WeatherIcon::CloudLightning.as_str(), "cloud-lightning");
        let json = serde_json::to_string(&WeatherIcon::CloudSun).unwrap();
        assert_eq!(json, "\"cloud-sun\"");
    }
}
