//! Application-level errors

use domain::DomainError;
use thiserror::Error;

use crate::ports::GeolocationError;

/// Errors that can occur in the application layer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// No place matched the user's query
    #[error("Location not found: {0}. Please check the spelling and try again.")]
    LocationNotFound(String),

    /// External service error, carrying the service's own message
    #[error("{0}")]
    ExternalService(String),

    /// Provider payload could not be interpreted
    #[error("Malformed weather data: {0}")]
    MalformedPayload(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Please wait a moment and try again.")]
    RateLimited,

    /// Input rejected before any request was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The user has not granted location access
    #[error("Please allow location access to see weather for your area")]
    PermissionDenied,

    /// Position could not be determined
    #[error(transparent)]
    Geolocation(GeolocationError),

    /// Preferences could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited | Self::ExternalService(_) => true,
            Self::Geolocation(e) => e.is_transient(),
            _ => false,
        }
    }
}

impl From<GeolocationError> for ApplicationError {
    fn from(err: GeolocationError) -> Self {
        match err {
            GeolocationError::PermissionDenied => Self::PermissionDenied,
            other => Self::Geolocation(other),
        }
    }
}
