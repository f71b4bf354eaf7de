//! Weather integration errors

use thiserror::Error;

/// Errors from the provider client, resolver and transformer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The provider answered with an error status
    ///
    /// `message` is the provider's own message when the body carried one.
    #[error("{message}")]
    Provider { status: u16, message: String },

    /// Failed to parse or interpret a provider payload
    #[error("Parse error: {0}")]
    ParseError(String),

    /// No place matched the query
    #[error("Location not found: {0}. Please check the spelling and try again.")]
    LocationNotFound(String),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Request timed out
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),
}

impl WeatherError {
    /// Whether repeating the same request could succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::ConnectionFailed(_) | Self::RateLimitExceeded | Self::Timeout(_) => true,
            Self::Provider { status, .. } => *status >= 500,
            Self::RequestFailed(_)
            | Self::ParseError(_)
            | Self::LocationNotFound(_)
            | Self::InvalidCoordinates => false,
        }
    }
}
