//! Provider configuration

use serde::{Deserialize, Serialize};

/// A postal code shape tried for numeric-only queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalFormat {
    /// Exact number of digits the code has
    pub digits: usize,
    /// ISO 3166 country code sent with the lookup
    pub country_code: String,
}

impl PostalFormat {
    #[must_use]
    pub fn new(digits: usize, country_code: impl Into<String>) -> Self {
        Self {
            digits,
            country_code: country_code.into(),
        }
    }

    /// Whether `code` has this format's digit count
    #[must_use]
    pub const fn matches(&self, code: &str) -> bool {
        code.len() == self.digits
    }
}

/// OpenWeatherMap client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenWeatherConfig {
    /// API base URL (default: <https://api.openweathermap.org>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as the `appid` query parameter
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum candidates returned by free-text search (default: 5)
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: u8,

    /// Postal formats tried in order for numeric-only queries
    #[serde(default = "default_postal_formats")]
    pub postal_formats: Vec<PostalFormat>,

    /// How long reverse-geocoded place names are kept (default: 1 hour)
    #[serde(default = "default_place_name_ttl")]
    pub place_name_ttl_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

const fn default_timeout() -> u64 {
    10
}

const fn default_suggestion_limit() -> u8 {
    5
}

fn default_postal_formats() -> Vec<PostalFormat> {
    vec![PostalFormat::new(5, "US"), PostalFormat::new(6, "IN")]
}

const fn default_place_name_ttl() -> u64 {
    3600
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout(),
            suggestion_limit: default_suggestion_limit(),
            postal_formats: default_postal_formats(),
            place_name_ttl_secs: default_place_name_ttl(),
        }
    }
}

impl OpenWeatherConfig {
    /// Configuration pointing at a local server, for tests
    #[must_use]
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: "test-key".to_string(),
            timeout_secs: 5,
            ..Self::default()
        }
    }
}
